//! wallcraft CLI
//!
//! Generate phone wallpapers from a text prompt and a style preset.
//! With no subcommand, starts the interactive TUI.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use wallcraft::credentials::{CredentialStore, KEY_ENV_VARS};
use wallcraft::export;
use wallcraft::gemini::GeminiClient;
use wallcraft::generator::{generate_record, GenerationError};
use wallcraft::history::HistoryCache;
use wallcraft::logging;
use wallcraft::report::{format_history, format_styles};
use wallcraft::styles::{find_style, CATALOG};
use wallcraft::tui::run::{run, RunContext};
use wallcraft::types::{GeneratorConfig, OutputFormat, StorageConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "wallcraft")]
#[command(about = "Generate phone wallpapers from a prompt and a style")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Image model
    #[arg(long, global = true, env = "WALLCRAFT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Generation service base URL
    #[arg(long, global = true, env = "WALLCRAFT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// History file (default: user data directory)
    #[arg(long, global = true)]
    history: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive interface (default)
    Tui,

    /// Generate one wallpaper
    Generate {
        /// What the wallpaper should show
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Style preset id (see `wallcraft styles`)
        #[arg(long, default_value = "photorealistic")]
        style: String,

        /// Also save the image to this directory
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List recent wallpapers
    History {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// List style presets
    Styles {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Save a wallpaper from history to disk
    Export {
        /// Record id (see `wallcraft history`)
        id: String,

        /// Destination directory (default: Downloads)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Store an API key read from stdin
    Key,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let generator_config = GeneratorConfig {
        endpoint: cli.endpoint,
        model: cli.model,
        timeout: cli.timeout.map(Duration::from_secs),
        ..Default::default()
    };

    let mut storage = StorageConfig::default();
    if let Some(path) = cli.history {
        storage.history_path = path;
    }

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if !interactive {
        logging::init_stderr();
    }

    let result = match cli.command {
        None | Some(Commands::Tui) => cmd_tui(generator_config, storage),
        Some(Commands::Generate { prompt, style, output }) => {
            cmd_generate(generator_config, storage, prompt.join(" "), &style, output)
        }
        Some(Commands::History { format }) => cmd_history(storage, format.into()),
        Some(Commands::Styles { format }) => cmd_styles(format.into()),
        Some(Commands::Export { id, output }) => cmd_export(storage, &id, output),
        Some(Commands::Key) => cmd_key(storage),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// PROGRESS HELPERS
// ============================================================================

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn missing_key_hint() -> String {
    format!(
        "No API key selected.\n\
         \n\
         Either:\n\
         - Set {} in the environment\n\
         - Store one: echo <key> | wallcraft key",
        KEY_ENV_VARS[0]
    )
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_tui(config: GeneratorConfig, storage: StorageConfig) -> Result<(), String> {
    let log_path = logging::default_log_path();
    if let Err(e) = logging::init_file(&log_path) {
        eprintln!("Note: logging disabled ({}: {})", log_path.display(), e);
    }

    let client = GeminiClient::new(config).map_err(|e| e.to_string())?;
    let history = HistoryCache::load(&storage.history_path);

    let ctx = RunContext {
        generator: Arc::new(client),
        credentials: CredentialStore::from_env(storage.key_path),
        download_dir: storage.download_dir,
    };

    run(ctx, history).map_err(|e| e.to_string())
}

fn cmd_generate(
    config: GeneratorConfig,
    storage: StorageConfig,
    prompt: String,
    style_id: &str,
    output: Option<PathBuf>,
) -> Result<(), String> {
    if wallcraft::prompt::is_blank(&prompt) {
        return Err("Prompt is empty".to_string());
    }

    let (_, style) = find_style(style_id).ok_or_else(|| {
        let ids: Vec<&str> = CATALOG.iter().map(|s| s.id).collect();
        format!("Unknown style: {} (expected one of: {})", style_id, ids.join(", "))
    })?;

    let credentials = CredentialStore::from_env(storage.key_path);
    let client = GeminiClient::new(config).map_err(|e| e.to_string())?;

    eprintln!("Model: {}", client.config().model);
    eprintln!("Style: {} {}", style.icon, style.name);
    eprintln!();

    let sp = spinner("Painting your wallpaper...");
    let api_key = credentials.api_key();
    let record = match generate_record(&client, api_key.as_deref(), &prompt, style.prompt) {
        Ok(record) => {
            sp.finish_with_message("Wallpaper ready");
            record
        }
        Err(GenerationError::AuthenticationRequired) => {
            sp.finish_and_clear();
            return Err(missing_key_hint());
        }
        Err(e) => {
            sp.finish_and_clear();
            return Err(e.to_string());
        }
    };

    let mut history = HistoryCache::load(&storage.history_path);
    if let Err(e) = history.record(record.clone()) {
        eprintln!(
            "Note: history could not be saved ({}: {})",
            history.path().display(),
            e
        );
    }

    println!("[{}] {}", record.id, record.prompt);

    match output {
        Some(dir) => {
            let path = export::download(&record, &dir).map_err(|e| e.to_string())?;
            println!("Saved to {}", path.display());
        }
        None => {
            println!();
            println!("To save: wallcraft export {}", record.id);
        }
    }

    Ok(())
}

fn cmd_history(storage: StorageConfig, format: OutputFormat) -> Result<(), String> {
    let history = HistoryCache::load(&storage.history_path);
    print!("{}", format_history(history.entries(), format));
    Ok(())
}

fn cmd_styles(format: OutputFormat) -> Result<(), String> {
    print!("{}", format_styles(CATALOG, format));
    Ok(())
}

fn cmd_export(storage: StorageConfig, id: &str, output: Option<PathBuf>) -> Result<(), String> {
    let history = HistoryCache::load(&storage.history_path);
    let record = history
        .find(id)
        .ok_or_else(|| format!("No wallpaper with id {} in history", id))?;

    let dir = output.unwrap_or(storage.download_dir);
    let path = export::download(record, &dir).map_err(|e| e.to_string())?;
    println!("Saved to {}", path.display());
    Ok(())
}

fn cmd_key(storage: StorageConfig) -> Result<(), String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| e.to_string())?;

    let credentials = CredentialStore::from_env(storage.key_path);
    credentials.select_key(&input).map_err(|e| e.to_string())?;
    println!("API key stored.");

    if credentials.is_env_override() {
        eprintln!(
            "Note: a key in the environment ({}) still takes precedence.",
            KEY_ENV_VARS.join(" or ")
        );
    }
    Ok(())
}
