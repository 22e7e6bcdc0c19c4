//! TUI state algebra: pure types, zero effects.
//!
//! These types define the whole TUI state space. The transition
//! function and the rendering layer both program against them.
//!
//! Design principle: Screen variants carry only per-screen transient state
//! (cursor positions). Data that outlives a screen (prompt, selected style,
//! current image, error, in-flight flag) lives in [`Session`]. The history
//! list lives in [`App`].

use crossterm::event::KeyEvent;

use crate::generator::GenerationError;
use crate::history::HistoryCache;
use crate::styles;
use crate::types::{GeneratedImageRecord, StylePreset};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Producers feeding the single mpsc channel:
/// - A key reader thread sends `Key` and `Paste`
/// - A ticker thread sends `Tick`
/// - The generation worker sends `GenerationFinished`
///
/// Key events go through `map_key → update`; the rest go through
/// `handle_background_event`.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// Bracketed paste from the terminal.
    Paste(String),
    /// Periodic redraw for the spinner and the lock-screen clock.
    Tick,
    /// Outcome of the startup credential check. Err carries the reason.
    CredentialChecked(Result<bool, String>),
    /// Outcome of the one in-flight generation.
    GenerationFinished(Result<GeneratedImageRecord, GenerationError>),
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    /// Current screen: carries per-screen navigation state.
    pub screen: Screen,

    /// Selections and flags shared across screens.
    pub session: Session,

    /// Last ten generations, newest first.
    pub history: HistoryCache,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

/// Session state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Free-text description typed by the user.
    pub prompt: String,

    /// Index into [`styles::CATALOG`].
    pub style_index: usize,

    /// Image shown on the Preview screen.
    pub current_image: Option<GeneratedImageRecord>,

    /// Last generation failure, shown on the Generator screen.
    pub error: Option<String>,

    /// True while a generation request is in flight. Gates Generate.
    pub generating: bool,

    /// Open key entry modal and its buffer. None when closed.
    pub key_entry: Option<String>,

    /// One-line status message (download saved, history not persisted).
    pub notice: Option<String>,

    /// Ticks since start, drives the spinner.
    pub ticks: u64,
}

impl Session {
    /// The selected preset.
    pub fn style(&self) -> &'static StylePreset {
        styles::style_at(self.style_index)
    }

    /// Whether Generate would do anything right now.
    pub fn can_generate(&self) -> bool {
        !self.generating && !crate::prompt::is_blank(&self.prompt)
    }
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current TUI screen.
///
/// Each variant is a state in the navigation state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    /// Welcome screen. Start runs the credential check.
    #[default]
    Splash,

    /// Prompt input and style picker.
    Generator,

    /// Past generations, newest first.
    History {
        /// Focused row index.
        cursor: usize,
    },

    /// Lock-screen mock showing `Session::current_image`.
    Preview,
}

impl Screen {
    /// History list with the cursor on the newest entry.
    pub fn history() -> Self {
        Screen::History { cursor: 0 }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
///
/// The effects layer maps key presses to Actions.
/// The transition function decides what each Action means per Screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Type a character into the focused text field.
    Input(char),
    /// Paste text into the focused text field.
    Paste(String),
    /// Delete the last character of the focused text field.
    Backspace,
    /// Empty the prompt.
    ClearPrompt,
    /// Select the next style preset.
    NextStyle,
    /// Select the previous style preset.
    PrevStyle,
    /// Move cursor up in a list.
    MoveUp,
    /// Move cursor down in a list.
    MoveDown,
    /// Start / generate / open / submit, depending on the screen.
    Enter,
    /// Dismiss the current screen or modal.
    Back,
    /// Jump to the history list.
    OpenHistory,
    /// Save the previewed image.
    Download,
    /// Hand the previewed image to the system.
    Share,
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// The update function returns this. The effects boundary inspects it
/// to decide what to render and which side effects to execute.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this screen (may be the same or a different screen).
    Screen(Screen),
    /// Quit the application.
    Quit,
    /// Show `next`, then execute a side effect.
    Effect { next: Screen, effect: Effect },
}

/// Side effect requested by a pure transition.
///
/// Pure code never executes these: it only describes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Best-effort check for a selected API key.
    CheckCredential,
    /// Request one wallpaper.
    Generate {
        prompt: String,
        style_modifier: &'static str,
    },
    /// Persist a newly entered API key.
    SaveKey(String),
    /// Save an image to the download directory.
    Download(GeneratedImageRecord),
    /// Offer an image through the platform's default handler.
    Share(GeneratedImageRecord),
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Create an App on the Splash screen with the given history.
    pub fn new(history: HistoryCache) -> Self {
        App {
            screen: Screen::Splash,
            session: Session::default(),
            history,
            should_quit: false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn app_starts_on_splash_with_default_style() {
        let temp = TempDir::new().unwrap();
        let app = App::new(HistoryCache::load(temp.path().join("h.json")));
        assert_eq!(app.screen, Screen::Splash);
        assert_eq!(app.session.style().id, styles::default_style().id);
        assert!(!app.session.generating);
        assert!(app.session.current_image.is_none());
        assert!(app.session.error.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn screen_default_is_splash() {
        assert_eq!(Screen::default(), Screen::Splash);
    }

    #[test]
    fn history_screen_starts_at_top() {
        assert_eq!(Screen::history(), Screen::History { cursor: 0 });
    }

    #[test]
    fn can_generate_needs_text_and_idle() {
        let mut session = Session::default();
        assert!(!session.can_generate());

        session.prompt = "   ".into();
        assert!(!session.can_generate());

        session.prompt = "a lake".into();
        assert!(session.can_generate());

        session.generating = true;
        assert!(!session.can_generate());
    }
}
