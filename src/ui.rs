use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    engine::{CharState, RenderCell},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const TITLE: &str = "sType";
const PLACEHOLDER: &str = "Start typing...";
const FOOTER: &str = "tab + enter - restart test | esc - quit";

/// Test modes shown in the header. Only `time` is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Punctuation,
    Numbers,
    Time,
    Words,
    Quote,
    Zen,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Punctuation,
        Mode::Numbers,
        Mode::Time,
        Mode::Words,
        Mode::Quote,
        Mode::Zen,
    ];

    pub const ACTIVE: Mode = Mode::Time;
}

fn header_line() -> Line<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled(TITLE, bold.fg(Color::Yellow)),
        Span::raw("   "),
    ];
    for mode in Mode::ALL {
        let style = if mode == Mode::ACTIVE {
            bold.fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!("# {mode}"), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// Spans for the reference text, one per character plus the cursor marker.
pub fn text_spans(cells: impl Iterator<Item = RenderCell>) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let correct = bold.fg(Color::Green);
    let incorrect = bold.fg(Color::Red);
    let untyped = bold.add_modifier(Modifier::DIM);
    let cursor = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK);

    let mut spans = Vec::new();
    for cell in cells {
        let span = match cell.state {
            CharState::Correct => Span::styled(cell.char.to_string(), correct),
            CharState::Incorrect => Span::styled(
                match cell.char {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                incorrect,
            ),
            CharState::Untyped => Span::styled(cell.char.to_string(), untyped),
        };
        spans.push(span);
        if cell.cursor {
            spans.push(Span::styled("|", cursor));
        }
    }
    spans
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = self.session.engine();
        let reference = engine.reference().as_str();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        // +1 leaves room for the cursor marker
        let text_width = reference.width() + 1;
        let text_lines = if text_width <= max_chars_per_line as usize {
            1
        } else {
            (text_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),          // header
                Constraint::Min(0),             // padding
                Constraint::Length(1),          // stats
                Constraint::Length(1),          // padding
                Constraint::Length(text_lines), // reference text
                Constraint::Length(1),          // padding
                Constraint::Length(3),          // input
                Constraint::Length(1),          // completion notice
                Constraint::Min(0),             // padding
                Constraint::Length(1),          // footer
            ])
            .split(area);

        Paragraph::new(header_line()).render(chunks[0], buf);

        let stats = Paragraph::new(Line::from(vec![
            Span::styled(format!("Time: {}s", engine.elapsed_seconds()), bold_style),
            Span::raw("   "),
            Span::styled(format!("WPM: {}", engine.words_per_minute()), bold_style),
            Span::raw("   "),
            Span::styled(
                format!("Accuracy: {:.2}%", engine.accuracy_percent()),
                bold_style,
            ),
        ]))
        .alignment(Alignment::Center);
        stats.render(chunks[2], buf);

        let text = Paragraph::new(Line::from(text_spans(engine.cells())))
            .alignment(if text_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true });
        text.render(chunks[4], buf);

        let input_line = if self.input.is_empty() {
            Span::styled(PLACEHOLDER, dim_style.patch(italic_style))
        } else {
            Span::raw(self.input.as_str())
        };
        Paragraph::new(input_line)
            .block(Block::default().borders(Borders::ALL))
            .render(chunks[6], buf);

        if let Some(remaining) = self.session.reset_remaining(self.now) {
            let notice = Paragraph::new(Span::styled(
                format!(
                    "Test completed! Restarting in {}s",
                    remaining.as_secs_f64().ceil() as u64
                ),
                bold_style.fg(Color::Green),
            ))
            .alignment(Alignment::Center);
            notice.render(chunks[7], buf);
        }

        Paragraph::new(Span::styled(FOOTER, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[9], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceText;
    use crate::session::SessionConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Instant;

    fn create_test_app(prompt: &str, typed: &str) -> App {
        let mut app = App::new(
            ReferenceText::new(prompt),
            SessionConfig::default(),
            Instant::now(),
        );
        let now = app.now;
        for c in typed.chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
        }
        app
    }

    fn render(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Punctuation.to_string(), "punctuation");
        assert_eq!(Mode::ACTIVE.to_string(), "time");
        assert_eq!(Mode::ALL.len(), 6);
    }

    #[test]
    fn test_idle_screen() {
        let app = create_test_app("hello world", "");
        let rendered = render(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains(TITLE));
        assert!(rendered.contains("# punctuation"));
        assert!(rendered.contains("hello world"));
        assert!(rendered.contains(PLACEHOLDER));
        assert!(rendered.contains("Time: 0s"));
        assert!(rendered.contains("Accuracy: 100.00%"));
        assert!(rendered.contains(FOOTER));
        assert!(!rendered.contains("Test completed"));
    }

    #[test]
    fn test_typing_screen_shows_cursor_and_input() {
        let app = create_test_app("hello world", "hex");
        let rendered = render(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("hel|lo world"));
        assert!(rendered.contains("Accuracy: 90.91%"));
        assert!(!rendered.contains(PLACEHOLDER));
    }

    #[test]
    fn test_completed_screen_shows_notice() {
        let app = create_test_app("hi", "hi");
        let rendered = render(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("Test completed! Restarting in 5s"));
        // no cursor once the test is over
        assert!(!rendered.contains("h|i"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let app = create_test_app("a considerably longer reference text to wrap", "a c");
        let area = Rect::new(0, 0, 12, 5);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn test_text_spans_styles() {
        let cells = vec![
            RenderCell {
                char: 'a',
                state: CharState::Correct,
                cursor: false,
            },
            RenderCell {
                char: ' ',
                state: CharState::Incorrect,
                cursor: true,
            },
            RenderCell {
                char: 'c',
                state: CharState::Untyped,
                cursor: false,
            },
        ];
        let spans = text_spans(cells.into_iter());

        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert_eq!(spans[1].content, "·");
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        assert_eq!(spans[2].content, "|");
        assert!(spans[3].style.add_modifier.contains(Modifier::DIM));
    }
}
