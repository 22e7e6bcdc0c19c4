//! wallcraft: Generate phone wallpapers from a text prompt and a style preset.

pub mod credentials;
pub mod export;
pub mod gemini;
pub mod generator;
pub mod history;
pub mod logging;
pub mod prompt;
pub mod report;
pub mod styles;
pub mod tui;
pub mod types;
