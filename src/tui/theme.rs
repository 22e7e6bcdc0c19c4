//! TUI color semantics and style constants.
//!
//! Color semantics:
//! - Blue: primary action, brand (the generate button, selected style)
//! - Green: success (download saved)
//! - Red: failure (generation error box)
//! - Cyan: interactive elements (keybinding hints)
//! - Dim: de-emphasized (placeholders, metadata)
//! - White bold: lock-screen clock

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Success: green.
pub const STYLE_SUCCESS: Style = Style::new().fg(Color::Green);

/// Failure: red.
pub const STYLE_ERROR: Style = Style::new().fg(Color::Red);

/// Interactive element / keybinding hint: cyan.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// De-emphasized metadata: dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

/// Important text: bold.
pub const STYLE_IMPORTANT: Style = Style::new().add_modifier(Modifier::BOLD);

/// Brand accent.
pub const STYLE_ACCENT: Style = Style::new().fg(Color::LightBlue).add_modifier(Modifier::BOLD);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar / header.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Selected style chip.
pub const STYLE_SELECTED: Style = Style::new().fg(Color::White).bg(Color::Blue);

/// Cursor row in a list.
pub const STYLE_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Primary button, enabled.
pub const STYLE_BUTTON: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Blue)
    .add_modifier(Modifier::BOLD);

/// Primary button, disabled or busy.
pub const STYLE_BUTTON_DISABLED: Style = Style::new().fg(Color::DarkGray).bg(Color::Black);

/// Input placeholder text.
pub const STYLE_PLACEHOLDER: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::ITALIC);

/// Lock-screen clock.
pub const STYLE_CLOCK: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// TESTS
// ============================================================================
