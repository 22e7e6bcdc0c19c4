//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen has a dedicated render function. The main `render()`
//! dispatches based on the current Screen variant. The key entry modal
//! is drawn last, over whatever screen is underneath.

use chrono::Local;
use humansize::{format_size, BINARY};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::export::inspect;
use crate::styles::CATALOG;
use crate::types::GeneratedImageRecord;

use super::state::{App, Screen, Session};
use super::theme;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const PROMPT_PLACEHOLDER: &str = "e.g. cherry blossoms drifting over a Seoul street at night";

/// Phone frame size on the Preview screen.
const PHONE_WIDTH: u16 = 34;
const PHONE_HEIGHT: u16 = 26;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Common layout: title, content, notice, help
    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Min(0),    // content
        Constraint::Length(1), // notice
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(&app.screen), chunks[0]);
    frame.render_widget(render_notice(&app.session), chunks[2]);
    frame.render_widget(render_help(&app.screen, &app.session), chunks[3]);

    let content_area = chunks[1];

    match &app.screen {
        Screen::Splash => render_splash(frame, content_area),
        Screen::Generator => render_generator(&app.session, frame, content_area),
        Screen::History { cursor } => {
            render_history(app.history.entries(), *cursor, frame, content_area)
        }
        Screen::Preview => {
            render_preview(app.session.current_image.as_ref(), frame, content_area)
        }
    }

    if let Some(buffer) = &app.session.key_entry {
        render_key_entry(buffer, frame, area);
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Title bar showing the screen name.
fn render_title(screen: &Screen) -> Paragraph<'static> {
    let title_text = match screen {
        Screen::Splash => "WallCraft AI",
        Screen::Generator => "Create Wallpaper",
        Screen::History { .. } => "Recent Wallpapers",
        Screen::Preview => "Preview",
    };

    Paragraph::new(Line::from(vec![Span::styled(title_text, theme::STYLE_TITLE)]))
}

/// Help line showing available keybindings for the current screen.
fn render_help(screen: &Screen, session: &Session) -> Paragraph<'static> {
    let help_text = if session.key_entry.is_some() {
        "[Enter] save key  [Esc] skip"
    } else {
        match screen {
            Screen::Splash => "[Enter] start  [q] quit",
            Screen::Generator => {
                "[Enter] create  [←/→] style  [Tab] history  [^U] clear  [^C] quit"
            }
            Screen::History { .. } => "[j/k] move  [Enter] preview  [Esc] back  [q] quit",
            Screen::Preview => "[d] save  [s] share  [Esc] close  [q] quit",
        }
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

/// Transient status line.
fn render_notice(session: &Session) -> Paragraph<'static> {
    match &session.notice {
        Some(notice) => Paragraph::new(Span::styled(format!("  {}", notice), theme::STYLE_SUCCESS)),
        None => Paragraph::new(""),
    }
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn spinner_frame(ticks: u64) -> &'static str {
    SPINNER[(ticks % SPINNER.len() as u64) as usize]
}

// ============================================================================
// SCREEN: SPLASH
// ============================================================================

fn render_splash(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("╭───╮", theme::STYLE_ACCENT)),
        Line::from(Span::styled("│ ✦ │", theme::STYLE_ACCENT)),
        Line::from(Span::styled("╰───╯", theme::STYLE_ACCENT)),
        Line::from(""),
        Line::from(Span::styled("WallCraft AI", theme::STYLE_TITLE)),
        Line::from(""),
        Line::from("Turn imagination into wallpaper."),
        Line::from("Make a screen that is yours."),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter] ", theme::STYLE_INTERACTIVE),
            Span::raw("Get started"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "High-quality generation needs a Gemini API key",
            theme::STYLE_DIM,
        )),
        Line::from(Span::styled(
            "from a billing-enabled project.",
            theme::STYLE_DIM,
        )),
    ];

    let height = text.len() as u16;
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, centered(area, area.width, height));
}

// ============================================================================
// SCREEN: GENERATOR
// ============================================================================

fn render_generator(session: &Session, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(5), // prompt box
        Constraint::Length(1), // style header
        Constraint::Length(3), // style chips
        Constraint::Min(0),    // error
        Constraint::Length(3), // button
    ])
    .split(area);

    // Prompt input
    let prompt_lines = if session.prompt.is_empty() {
        vec![Line::from(vec![
            Span::styled("▏", theme::STYLE_INTERACTIVE),
            Span::styled(PROMPT_PLACEHOLDER, theme::STYLE_PLACEHOLDER),
        ])]
    } else {
        vec![Line::from(vec![
            Span::raw(session.prompt.clone()),
            Span::styled("▏", theme::STYLE_INTERACTIVE),
        ])]
    };
    let prompt_box = Paragraph::new(prompt_lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(theme::STYLE_ACCENT)
                .title(" Describe your wallpaper "),
        );
    frame.render_widget(prompt_box, chunks[0]);

    // Style header: label + selected name
    let style = session.style();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Style  ", theme::STYLE_IMPORTANT),
            Span::styled(style.name, theme::STYLE_ACCENT),
        ])),
        chunks[1],
    );

    // Style chips
    let mut chips = Vec::new();
    for (i, preset) in CATALOG.iter().enumerate() {
        let chip = format!(" {} {} ", preset.icon, preset.name);
        let style = if i == session.style_index {
            theme::STYLE_SELECTED
        } else {
            theme::STYLE_DIM
        };
        chips.push(Span::styled(chip, style));
        chips.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(chips)).wrap(Wrap { trim: true }),
        chunks[2],
    );

    // Error
    if let Some(error) = &session.error {
        let error_box = Paragraph::new(Line::from(vec![
            Span::styled("⚠ ", theme::STYLE_ERROR),
            Span::styled(error.clone(), theme::STYLE_ERROR),
        ]))
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(theme::STYLE_ERROR),
        );
        let height = chunks[3].height.min(3);
        frame.render_widget(error_box, Rect { height, ..chunks[3] });
    }

    // Generate button
    let (label, style) = if session.generating {
        (
            format!("{} Painting your wallpaper...", spinner_frame(session.ticks)),
            theme::STYLE_BUTTON_DISABLED,
        )
    } else if session.can_generate() {
        ("✦ Create wallpaper".to_string(), theme::STYLE_BUTTON)
    } else {
        ("✦ Create wallpaper".to_string(), theme::STYLE_BUTTON_DISABLED)
    };
    let button = Paragraph::new(Line::from(Span::styled(label, style)))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_type(BorderType::Rounded).border_style(style));
    frame.render_widget(button, chunks[4]);
}

// ============================================================================
// SCREEN: HISTORY
// ============================================================================

fn render_history(entries: &[GeneratedImageRecord], cursor: usize, frame: &mut Frame, area: Rect) {
    if entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("▢", theme::STYLE_DIM)),
            Line::from(Span::styled("No wallpapers generated yet.", theme::STYLE_DIM)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, record) in entries.iter().enumerate() {
        let when = record
            .created_at()
            .map(|t| t.with_timezone(&Local).format("%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "--".to_string());
        let size = inspect(&record.url)
            .map(|info| format_size(info.bytes, BINARY))
            .unwrap_or_else(|| "remote".to_string());

        let marker = if i == cursor { "> " } else { "  " };
        let spans = vec![
            Span::raw(format!(" {}", marker)),
            Span::styled(format!("{}  ", when), theme::STYLE_DIM),
            Span::styled(record.prompt.clone(), theme::STYLE_IMPORTANT),
            Span::styled(format!("  {}", size), theme::STYLE_DIM),
        ];

        let line = if i == cursor {
            Line::from(spans).style(theme::STYLE_CURSOR)
        } else {
            Line::from(spans)
        };
        lines.push(line);
    }

    // Scroll: if cursor is beyond visible area, offset the view
    let visible_height = area.height as usize;
    let scroll_offset = if visible_height > 0 && cursor >= visible_height {
        cursor - visible_height + 1
    } else {
        0
    };

    let list = Paragraph::new(lines).scroll((scroll_offset as u16, 0));
    frame.render_widget(list, area);
}

// ============================================================================
// SCREEN: PREVIEW
// ============================================================================

fn render_preview(image: Option<&GeneratedImageRecord>, frame: &mut Frame, area: Rect) {
    let Some(record) = image else {
        let empty = Paragraph::new("Nothing to preview").style(theme::STYLE_DIM);
        frame.render_widget(empty, area);
        return;
    };

    let phone = centered(area, PHONE_WIDTH, PHONE_HEIGHT);
    let block = Block::bordered().border_type(BorderType::Rounded);
    let inner = block.inner(phone);
    frame.render_widget(block, phone);

    let rows = Layout::vertical([
        Constraint::Length(1), // status bar
        Constraint::Length(1), // clock
        Constraint::Length(1), // date
        Constraint::Min(0),    // wallpaper
        Constraint::Length(1), // image info
        Constraint::Length(1), // shortcuts
        Constraint::Length(1), // home indicator
    ])
    .split(inner);

    let now = Local::now();
    let centered_line = |text: String, style| {
        Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center)
    };

    frame.render_widget(centered_line(now.format("%H:%M").to_string(), theme::STYLE_CLOCK), rows[1]);
    frame.render_widget(
        centered_line(now.format("%A, %B %-d").to_string(), theme::STYLE_IMPORTANT),
        rows[2],
    );

    let wallpaper = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("“{}”", record.prompt), theme::STYLE_PLACEHOLDER)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(wallpaper, rows[3]);

    frame.render_widget(centered_line(describe_image(record), theme::STYLE_DIM), rows[4]);
    frame.render_widget(centered_line("☎            ◉".to_string(), theme::STYLE_IMPORTANT), rows[5]);
    frame.render_widget(centered_line("────────".to_string(), theme::STYLE_DIM), rows[6]);
}

/// "1080×1920 · 1.2 MiB" for inline images, "remote image" otherwise.
fn describe_image(record: &GeneratedImageRecord) -> String {
    match inspect(&record.url) {
        Some(info) => {
            let size = format_size(info.bytes, BINARY);
            match info.dimensions {
                Some((w, h)) => format!("{}×{} · {}", w, h, size),
                None => format!("{} · {}", info.mime, size),
            }
        }
        None => "remote image".to_string(),
    }
}

// ============================================================================
// MODAL: KEY ENTRY
// ============================================================================

fn render_key_entry(buffer: &str, frame: &mut Frame, area: Rect) {
    let modal = centered(area, 56, 9);
    frame.render_widget(Clear, modal);

    let lines = vec![
        Line::from("Paste a Gemini API key from a billing-enabled"),
        Line::from("project. It is stored in your config directory."),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::STYLE_INTERACTIVE),
            Span::raw(mask_key(buffer)),
            Span::styled("▏", theme::STYLE_INTERACTIVE),
        ]),
    ];

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(theme::STYLE_ACCENT)
            .title(" API key "),
    );
    frame.render_widget(paragraph, modal);
}

/// Hide all but the last four characters.
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "•".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "•".repeat(count - 4), tail)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::tiny_png_uri;
    use crate::history::HistoryCache;
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 30);
        Terminal::new(backend).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn record(n: i64, prompt: &str) -> GeneratedImageRecord {
        GeneratedImageRecord::new(tiny_png_uri(), prompt, Utc.timestamp_millis_opt(n).unwrap())
    }

    fn app(temp: &TempDir) -> App {
        App::new(HistoryCache::load(temp.path().join("history.json")))
    }

    #[test]
    fn splash_shows_app_name() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let app = app(&temp);
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let content = buffer_text(&terminal);
        assert!(content.contains("WallCraft AI"));
        assert!(content.contains("Get started"));
    }

    #[test]
    fn generator_shows_placeholder_then_prompt() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Generator;

        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("cherry blossoms"));

        app.session.prompt = "a lake at sunset".into();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let content = buffer_text(&terminal);
        assert!(content.contains("a lake at sunset"));
        assert!(content.contains("Create wallpaper"));
    }

    #[test]
    fn generator_shows_error_box() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Generator;
        app.session.error = Some("Image generation failed. Please try again.".into());
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Image generation failed"));
    }

    #[test]
    fn generator_shows_busy_label_while_in_flight() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Generator;
        app.session.prompt = "cats".into();
        app.session.generating = true;
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Painting your wallpaper"));
    }

    #[test]
    fn empty_history_message() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::history();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("No wallpapers generated yet."));
    }

    #[test]
    fn history_lists_prompts() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.history.record(record(1, "neon city")).unwrap();
        app.history.record(record(2, "quiet forest")).unwrap();
        app.screen = Screen::History { cursor: 1 };
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let content = buffer_text(&terminal);
        assert!(content.contains("neon city"));
        assert!(content.contains("quiet forest"));
    }

    #[test]
    fn preview_shows_prompt_and_dimensions() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Preview;
        app.session.current_image = Some(record(1, "lake"));
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let content = buffer_text(&terminal);
        assert!(content.contains("lake"));
        assert!(content.contains("1080×1920"));
    }

    #[test]
    fn preview_without_image_renders_placeholder() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Preview;
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Nothing to preview"));
    }

    #[test]
    fn key_entry_modal_masks_input() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Generator;
        app.session.key_entry = Some("AIzaSECRET1234".into());
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let content = buffer_text(&terminal);
        assert!(content.contains("API key"));
        assert!(content.contains("1234"));
        assert!(!content.contains("SECRET"));
    }

    #[test]
    fn notice_is_shown() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app(&temp);
        app.screen = Screen::Preview;
        app.session.notice = Some("Saved to /tmp/wallpaper-1.png".into());
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Saved to"));
    }

    #[test]
    fn all_screens_render_in_a_tiny_terminal() {
        let temp = TempDir::new().unwrap();
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        let mut app = app(&temp);
        app.history.record(record(1, "x")).unwrap();
        app.session.current_image = Some(record(1, "x"));
        app.session.error = Some("boom".into());
        app.session.key_entry = Some("k".into());

        for screen in [Screen::Splash, Screen::Generator, Screen::history(), Screen::Preview] {
            app.screen = screen;
            terminal
                .draw(|frame| render(&app, frame))
                .expect("every screen should render without panic");
        }
    }

    #[test]
    fn mask_key_keeps_last_four() {
        assert_eq!(mask_key(""), "");
        assert_eq!(mask_key("abc"), "•••");
        assert_eq!(mask_key("abcdef"), "••cdef");
    }
}
