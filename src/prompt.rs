//! Prompt composition.
//!
//! Pure string assembly: framing + subject + style.

/// Leading framing: orientation and resolution hints.
pub const FRAMING_PREFIX: &str = "Smartphone wallpaper, high resolution, 9:16 aspect ratio.";

/// Trailing quality hints.
pub const FRAMING_SUFFIX: &str = "Professional lighting, masterpiece, sharp focus, 8k.";

/// Build the prompt sent to the model.
///
/// The user prompt and the style modifier appear verbatim.
pub fn compose_prompt(user_prompt: &str, style_modifier: &str) -> String {
    format!(
        "{} Subject: {}. Style: {}. {}",
        FRAMING_PREFIX, user_prompt, style_modifier, FRAMING_SUFFIX
    )
}

/// Whether a prompt has anything worth sending.
pub fn is_blank(user_prompt: &str) -> bool {
    user_prompt.trim().is_empty()
}
