//! Domain types for wallcraft.
//!
//! Records, presets and configuration. Everything here is plain data.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// STYLE PRESETS
// ============================================================================

/// A named style that is appended to the user's prompt.
///
/// Defined at compile time in [`crate::styles::CATALOG`], never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    /// Stable identifier, used on the command line (`--style pixel`).
    pub id: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Modifier text appended to the composed prompt.
    pub prompt: &'static str,
    /// Single glyph shown next to the label.
    pub icon: &'static str,
}

// ============================================================================
// GENERATED IMAGES
// ============================================================================

/// One successful generation.
///
/// Field names match the persisted history format, so a history file
/// written by one version is readable by the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImageRecord {
    /// Creation time in milliseconds, as a decimal string.
    pub id: String,
    /// Image reference: a `data:` URI or a plain URL.
    pub url: String,
    /// The raw user prompt (not the composed one).
    pub prompt: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GeneratedImageRecord {
    /// Create a record stamped with the given creation time.
    pub fn new(url: impl Into<String>, prompt: impl Into<String>, created: DateTime<Utc>) -> Self {
        let millis = created.timestamp_millis();
        GeneratedImageRecord {
            id: millis.to_string(),
            url: url.into(),
            prompt: prompt.into(),
            timestamp: millis,
        }
    }

    /// Create a record stamped with the current time.
    pub fn now(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(url, prompt, Utc::now())
    }

    /// Creation time, if the stored timestamp is representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

/// Default Gemini REST base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";

/// Phone portrait.
pub const DEFAULT_ASPECT_RATIO: &str = "9:16";

/// Resolution tier understood by the image models.
pub const DEFAULT_IMAGE_SIZE: &str = "1K";

/// Configuration for the generation service.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// REST base URL, without a trailing slash.
    pub endpoint: String,
    /// Model name, with or without the `models/` prefix.
    pub model: String,
    /// Requested aspect ratio.
    pub aspect_ratio: String,
    /// Requested resolution tier.
    pub image_size: String,
    /// Request timeout. None leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            timeout: None,
        }
    }
}

/// Where wallcraft keeps its files.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// The single durable slot holding the history list.
    pub history_path: PathBuf,
    /// Destination for downloaded wallpapers.
    pub download_dir: PathBuf,
    /// File holding the selected API key.
    pub key_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_path: crate::history::default_history_path(),
            download_dir: crate::export::default_download_dir(),
            key_path: crate::credentials::default_key_path(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
