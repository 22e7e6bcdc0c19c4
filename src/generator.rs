//! Generation request builder.
//!
//! Composes the prompt, calls the image service once, and turns the
//! outcome into a record. The service itself sits behind [`ImageGenerator`]
//! so the flow can be driven without a network.

use thiserror::Error;

use crate::prompt::compose_prompt;
use crate::types::GeneratedImageRecord;

/// Message shown for every failure that is not an authentication problem.
pub const GENERIC_FAILURE_MESSAGE: &str = "Image generation failed. Please try again.";

/// Why a generation attempt produced no image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service answered but the answer held no image.
    #[error("no image was generated")]
    NoImageProduced,

    /// The credential is missing or the service does not recognise it.
    /// Callers prompt for a new key instead of showing an error.
    #[error("a valid API key is required")]
    AuthenticationRequired,

    /// Transport or service failure.
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

impl GenerationError {
    /// Text for the user, or None when the failure is handled by
    /// reselecting credentials instead.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            GenerationError::AuthenticationRequired => None,
            GenerationError::NoImageProduced | GenerationError::GenerationFailed(_) => {
                Some(GENERIC_FAILURE_MESSAGE)
            }
        }
    }
}

/// A service that turns one composed prompt into one image reference.
pub trait ImageGenerator: Send + Sync {
    /// Issue a single request. Returns a displayable image reference.
    fn generate_image(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Compose the prompt and request one wallpaper.
///
/// A missing key is reported as `AuthenticationRequired` without
/// touching the service.
pub fn generate_wallpaper(
    generator: &dyn ImageGenerator,
    api_key: Option<&str>,
    user_prompt: &str,
    style_modifier: &str,
) -> Result<String, GenerationError> {
    let api_key = api_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(GenerationError::AuthenticationRequired)?;

    let prompt = compose_prompt(user_prompt, style_modifier);
    tracing::info!(chars = prompt.len(), "requesting wallpaper");

    match generator.generate_image(api_key, &prompt) {
        Ok(url) => Ok(url),
        Err(e) => {
            tracing::error!(error = %e, "wallpaper generation failed");
            Err(e)
        }
    }
}

/// Run a generation and stamp the result as a history record.
///
/// The record keeps the raw user prompt, not the composed one.
pub fn generate_record(
    generator: &dyn ImageGenerator,
    api_key: Option<&str>,
    user_prompt: &str,
    style_modifier: &str,
) -> Result<GeneratedImageRecord, GenerationError> {
    let url = generate_wallpaper(generator, api_key, user_prompt, style_modifier)?;
    Ok(GeneratedImageRecord::now(url, user_prompt))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Generator that records what it was asked and replies with a fixed outcome.
    pub(crate) struct ScriptedGenerator {
        pub outcome: Result<String, GenerationError>,
        pub seen: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn replying(outcome: Result<String, GenerationError>) -> Self {
            ScriptedGenerator {
                outcome,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ImageGenerator for ScriptedGenerator {
        fn generate_image(&self, _api_key: &str, prompt: &str) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            self.outcome.clone()
        }
    }

    const PIXEL: &str = "retro pixel art, 16-bit style, nostalgic gaming aesthetic";

    #[test]
    fn record_keeps_raw_prompt_while_request_gets_composed_one() {
        let generator = ScriptedGenerator::replying(Ok("data:image/png;base64,AAAA".into()));
        let record = generate_record(&generator, Some("key"), "a lake at sunset", PIXEL).unwrap();

        assert_eq!(record.prompt, "a lake at sunset");
        assert_eq!(record.url, "data:image/png;base64,AAAA");

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("a lake at sunset"));
        assert!(seen[0].contains(PIXEL));
        assert!(seen[0].contains("Smartphone wallpaper"));
    }

    #[test]
    fn missing_key_requires_authentication_without_calling_service() {
        let generator = ScriptedGenerator::replying(Ok("unused".into()));
        let result = generate_wallpaper(&generator, None, "cats", PIXEL);
        assert_eq!(result, Err(GenerationError::AuthenticationRequired));

        let blank = generate_wallpaper(&generator, Some("   "), "cats", PIXEL);
        assert_eq!(blank, Err(GenerationError::AuthenticationRequired));
        assert!(generator.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn service_errors_pass_through() {
        let generator = ScriptedGenerator::replying(Err(GenerationError::NoImageProduced));
        let result = generate_record(&generator, Some("key"), "cats", PIXEL);
        assert_eq!(result, Err(GenerationError::NoImageProduced));
    }

    #[test]
    fn only_auth_failures_have_no_user_message() {
        assert_eq!(GenerationError::AuthenticationRequired.user_message(), None);
        assert_eq!(
            GenerationError::NoImageProduced.user_message(),
            Some(GENERIC_FAILURE_MESSAGE)
        );
        assert_eq!(
            GenerationError::GenerationFailed("boom".into()).user_message(),
            Some(GENERIC_FAILURE_MESSAGE)
        );
    }
}
