//! Pure state transitions: (Screen, Session, Action) → Transition.
//!
//! This is the core logic of the TUI. Fully testable without a terminal.
//! Each screen defines which actions it accepts. Unhandled actions
//! return the current screen unchanged (no-op).

use crate::styles;
use crate::types::GeneratedImageRecord;

use super::state::{Action, App, AppEvent, Effect, Screen, Session, Transition};

/// Pure state transition function.
///
/// Given the current screen, the session, an action and a read-only view
/// of the history list, produces the next transition. Text edits and
/// selections are applied to `session` in place. The effects boundary
/// interprets the result.
pub fn update(
    screen: Screen,
    session: &mut Session,
    action: &Action,
    history: &[GeneratedImageRecord],
) -> Transition {
    session.notice = None;

    if session.key_entry.is_some() {
        return update_key_entry(screen, session, action);
    }

    match screen {
        Screen::Splash => update_splash(action),
        Screen::Generator => update_generator(session, action),
        Screen::History { cursor } => update_history(cursor, session, action, history),
        Screen::Preview => update_preview(session, action),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Splash: Enter starts (after the credential check), quit exits.
fn update_splash(action: &Action) -> Transition {
    match action {
        Action::Enter => Transition::Effect {
            next: Screen::Splash,
            effect: Effect::CheckCredential,
        },
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Splash),
    }
}

/// Generator: prompt editing, style selection, generate, history.
fn update_generator(session: &mut Session, action: &Action) -> Transition {
    match action {
        Action::Input(c) => session.prompt.push(*c),
        Action::Paste(text) => session.prompt.push_str(&single_line(text)),
        Action::Backspace => {
            session.prompt.pop();
        }
        Action::ClearPrompt => session.prompt.clear(),
        Action::NextStyle => session.style_index = styles::next_index(session.style_index),
        Action::PrevStyle => session.style_index = styles::prev_index(session.style_index),
        Action::Enter => {
            if session.can_generate() {
                session.generating = true;
                session.error = None;
                return Transition::Effect {
                    next: Screen::Generator,
                    effect: Effect::Generate {
                        prompt: session.prompt.clone(),
                        style_modifier: session.style().prompt,
                    },
                };
            }
        }
        Action::OpenHistory => return Transition::Screen(Screen::history()),
        Action::Quit => return Transition::Quit,
        _ => {}
    }
    Transition::Screen(Screen::Generator)
}

/// History: cursor movement, open a record, back.
///
/// Opening a record never touches the history list.
fn update_history(
    cursor: usize,
    session: &mut Session,
    action: &Action,
    history: &[GeneratedImageRecord],
) -> Transition {
    let len = history.len();

    match action {
        Action::MoveUp => Transition::Screen(Screen::History {
            cursor: cursor.saturating_sub(1),
        }),
        Action::MoveDown => {
            let new_cursor = if len == 0 { 0 } else { (cursor + 1).min(len - 1) };
            Transition::Screen(Screen::History { cursor: new_cursor })
        }
        Action::Enter => match history.get(cursor) {
            Some(record) => {
                session.current_image = Some(record.clone());
                Transition::Screen(Screen::Preview)
            }
            None => Transition::Screen(Screen::History { cursor }),
        },
        Action::Back => Transition::Screen(Screen::Generator),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::History { cursor }),
    }
}

/// Preview: download, share, dismiss.
fn update_preview(session: &Session, action: &Action) -> Transition {
    let with_image = |make: fn(GeneratedImageRecord) -> Effect| match &session.current_image {
        Some(record) => Transition::Effect {
            next: Screen::Preview,
            effect: make(record.clone()),
        },
        None => Transition::Screen(Screen::Preview),
    };

    match action {
        Action::Download => with_image(Effect::Download),
        Action::Share => with_image(Effect::Share),
        Action::Back => Transition::Screen(Screen::Generator),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Preview),
    }
}

/// Key entry modal: captures all input until submitted or dismissed.
fn update_key_entry(screen: Screen, session: &mut Session, action: &Action) -> Transition {
    let Some(buffer) = session.key_entry.as_mut() else {
        return Transition::Screen(screen);
    };

    match action {
        Action::Input(c) => buffer.push(*c),
        Action::Paste(text) => buffer.push_str(text.trim()),
        Action::Backspace => {
            buffer.pop();
        }
        Action::ClearPrompt => buffer.clear(),
        Action::Enter => {
            let key = buffer.trim().to_string();
            if !key.is_empty() {
                session.key_entry = None;
                return Transition::Effect {
                    next: screen,
                    effect: Effect::SaveKey(key),
                };
            }
        }
        Action::Back => session.key_entry = None,
        Action::Quit => return Transition::Quit,
        _ => {}
    }
    Transition::Screen(screen)
}

/// Prompts are one line; pasted newlines become spaces.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n']).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
}

// ============================================================================
// BACKGROUND EVENTS
// ============================================================================

/// Apply a non-key event to the app.
///
/// Generation outcomes always clear the in-flight flag.
pub fn handle_background_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Tick => {
            app.session.ticks = app.session.ticks.wrapping_add(1);
        }
        AppEvent::CredentialChecked(result) => {
            if app.screen != Screen::Splash {
                return;
            }
            match result {
                Ok(true) => {}
                Ok(false) => app.session.key_entry = Some(String::new()),
                Err(reason) => {
                    // Fail open: a broken check must not lock the user out.
                    tracing::warn!(%reason, "credential check failed, continuing");
                }
            }
            app.screen = Screen::Generator;
        }
        AppEvent::GenerationFinished(result) => {
            app.session.generating = false;
            match result {
                Ok(record) => {
                    tracing::info!(id = %record.id, "wallpaper generated");
                    app.session.current_image = Some(record.clone());
                    if let Err(e) = app.history.record(record) {
                        tracing::warn!(
                            path = %app.history.path().display(),
                            error = %e,
                            "history not persisted"
                        );
                        app.session.notice = Some("History could not be saved to disk".into());
                    }
                    app.screen = Screen::Preview;
                }
                Err(e) => match e.user_message() {
                    None => {
                        tracing::info!("service rejected the API key, asking for a new one");
                        app.session.key_entry = Some(String::new());
                    }
                    Some(message) => {
                        tracing::warn!(error = %e, "generation failed");
                        app.session.error = Some(message.to_string());
                    }
                },
            }
        }
        AppEvent::Key(_) | AppEvent::Paste(_) => {}
    }
}

// ============================================================================
// TESTS
// ============================================================================
