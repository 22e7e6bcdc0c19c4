//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui.
//!
//! Architecture: producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key and paste events
//! - Ticker thread: drives the spinner and the preview clock
//! - Generation worker: one per request, sends the outcome
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::credentials::CredentialStore;
use crate::export;
use crate::generator::{generate_record, ImageGenerator};
use crate::history::HistoryCache;

use super::state::{Action, App, AppEvent, Effect, Screen, Transition};
use super::update::{handle_background_event, update};
use super::view::render;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// KEY MAPPING
// ============================================================================

/// How plain characters are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A text field has focus: characters are typed.
    Text,
    /// No text field: characters are shortcuts.
    Navigate,
}

impl InputMode {
    /// The Generator prompt and the key entry modal take text.
    pub fn for_app(app: &App) -> Self {
        if app.session.key_entry.is_some() || app.screen == Screen::Generator {
            InputMode::Text
        } else {
            InputMode::Navigate
        }
    }
}

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(mode: InputMode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Text => match key.code {
            KeyCode::Char('u') if ctrl => Some(Action::ClearPrompt),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(Action::Input(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Enter => Some(Action::Enter),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Right => Some(Action::NextStyle),
            KeyCode::Left => Some(Action::PrevStyle),
            KeyCode::Tab => Some(Action::OpenHistory),
            _ => None,
        },
        InputMode::Navigate => match key.code {
            // Navigation
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Enter => Some(Action::Enter),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),

            // Actions
            KeyCode::Char('d') => Some(Action::Download),
            KeyCode::Char('s') => Some(Action::Share),
            KeyCode::Char('q') => Some(Action::Quit),

            _ => None,
        },
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(DisableBracketedPaste)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards keys and pastes.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Paste(text)) => AppEvent::Paste(text),
                Ok(_) => continue, // ignore mouse, resize, key release
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

/// Spawn a thread that sends a Tick at a fixed interval.
fn spawn_ticker(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            thread::sleep(TICK_INTERVAL);
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

/// Spawn a worker for one generation request.
///
/// The key is read when the request starts, so a key entered after a
/// rejection is picked up by the next attempt.
fn spawn_generation(
    ctx: &RunContext,
    prompt: String,
    style_modifier: &'static str,
    tx: mpsc::Sender<AppEvent>,
) {
    let generator = Arc::clone(&ctx.generator);
    let credentials = ctx.credentials.clone();
    thread::spawn(move || {
        let api_key = credentials.api_key();
        let outcome = generate_record(
            generator.as_ref(),
            api_key.as_deref(),
            &prompt,
            style_modifier,
        );
        let _ = tx.send(AppEvent::GenerationFinished(outcome));
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Collaborators the TUI needs from the outside world.
pub struct RunContext {
    pub generator: Arc<dyn ImageGenerator>,
    pub credentials: CredentialStore,
    pub download_dir: PathBuf,
}

/// Run the TUI event loop.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// spawns the producer threads, and runs the event loop until the user quits.
pub fn run(ctx: RunContext, history: HistoryCache) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(history);

    let (tx, rx) = mpsc::channel::<AppEvent>();

    // Spawn producer threads
    spawn_key_reader(tx.clone());
    spawn_ticker(tx.clone());

    tracing::info!(entries = app.history.len(), "tui started");

    loop {
        // Render
        terminal.draw(|frame| render(&app, frame))?;

        // Check quit flag
        if app.should_quit {
            break;
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // all senders dropped
        };

        let action = match event {
            AppEvent::Key(key) => map_key(InputMode::for_app(&app), key),
            AppEvent::Paste(text) => Some(Action::Paste(text)),
            background_event => {
                handle_background_event(&mut app, background_event);
                None
            }
        };

        if let Some(action) = action {
            apply_action(&mut app, &action, &ctx, &tx);
        }
    }

    restore_terminal()?;
    tracing::info!("tui stopped");
    Ok(())
}

/// Run one action through the pure transition and interpret the result.
fn apply_action(app: &mut App, action: &Action, ctx: &RunContext, tx: &mpsc::Sender<AppEvent>) {
    let screen = std::mem::take(&mut app.screen);
    let transition = update(screen, &mut app.session, action, app.history.entries());

    match transition {
        Transition::Screen(new_screen) => {
            app.screen = new_screen;
        }
        Transition::Quit => {
            app.should_quit = true;
        }
        Transition::Effect { next, effect } => {
            app.screen = next;
            handle_effect(effect, app, ctx, tx);
        }
    }
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Handle a side effect requested by a pure transition.
fn handle_effect(effect: Effect, app: &mut App, ctx: &RunContext, tx: &mpsc::Sender<AppEvent>) {
    match effect {
        Effect::CheckCredential => {
            let outcome = ctx
                .credentials
                .has_selected_key()
                .map_err(|e| e.to_string());
            handle_background_event(app, AppEvent::CredentialChecked(outcome));
        }
        Effect::Generate {
            prompt,
            style_modifier,
        } => {
            spawn_generation(ctx, prompt, style_modifier, tx.clone());
        }
        Effect::SaveKey(key) => {
            // The new key is assumed usable; the next request will tell.
            app.session.notice = Some(match ctx.credentials.select_key(&key) {
                Ok(()) if ctx.credentials.is_env_override() => {
                    tracing::warn!("key stored, but the environment key takes precedence");
                    "Key saved, but the key from the environment is still used".to_string()
                }
                Ok(()) => "API key saved".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "API key not stored");
                    format!("Could not save API key: {}", e)
                }
            });
        }
        Effect::Download(record) => {
            app.session.notice = Some(match export::download(&record, &ctx.download_dir) {
                Ok(path) => format!("Saved to {}", path.display()),
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "download failed");
                    format!("Download failed: {}", e)
                }
            });
        }
        Effect::Share(record) => {
            // Share failures are silent to the user.
            if let Err(e) = export::share(&record) {
                tracing::warn!(id = %record.id, error = %e, "share failed");
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
