//! API key selection.
//!
//! The key comes from `GEMINI_API_KEY` / `GOOGLE_API_KEY` or from a key
//! file in the config directory. The environment always wins; selecting a
//! key writes the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variables consulted, in order.
pub const KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Key filename within the config directory.
const KEY_FILENAME: &str = "api_key";

#[derive(Debug, Error)]
pub enum CredentialError {
    /// No config directory to keep the key file in.
    #[error("could not determine a configuration directory for the API key")]
    ConfigDirNotFound,

    #[error("API key is empty")]
    EmptyKey,

    #[error("API key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns the default key file location.
///
/// On Linux: ~/.config/wallcraft/api_key
pub fn default_key_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wallcraft").join(KEY_FILENAME))
}

/// First non-empty key among [`KEY_ENV_VARS`].
pub fn key_from_env() -> Option<String> {
    KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Where the key is looked up and stored.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    key_path: Option<PathBuf>,
    env_key: Option<String>,
}

impl CredentialStore {
    /// Store backed by `key_path`, with an optional key that overrides it.
    pub fn new(key_path: Option<PathBuf>, env_key: Option<String>) -> Self {
        CredentialStore { key_path, env_key }
    }

    /// Store backed by `key_path`, honouring the key environment variables.
    pub fn from_env(key_path: Option<PathBuf>) -> Self {
        Self::new(key_path, key_from_env())
    }

    /// Whether a usable key is currently selected.
    pub fn has_selected_key(&self) -> Result<bool, CredentialError> {
        if self.env_key.is_some() {
            return Ok(true);
        }
        let path = self.key_path()?;
        match read_key(path) {
            Ok(key) => Ok(key.is_some()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CredentialError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// The key to use right now. Re-read on every call.
    pub fn api_key(&self) -> Option<String> {
        if let Some(key) = &self.env_key {
            return Some(key.clone());
        }
        let path = self.key_path.as_deref()?;
        read_key(path).ok().flatten()
    }

    /// Persist a newly selected key.
    pub fn select_key(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        let path = self.key_path()?;
        write_key(path, key).map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "API key stored");
        Ok(())
    }

    /// Whether the environment overrides the key file.
    pub fn is_env_override(&self) -> bool {
        self.env_key.is_some()
    }

    fn key_path(&self) -> Result<&Path, CredentialError> {
        self.key_path
            .as_deref()
            .ok_or(CredentialError::ConfigDirNotFound)
    }
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

fn read_key(path: &Path) -> io::Result<Option<String>> {
    let contents = fs::read_to_string(path)?;
    let key = contents.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

fn write_key(path: &Path, key: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", key))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
