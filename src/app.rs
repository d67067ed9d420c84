use crate::reference::ReferenceText;
use crate::session::{Session, SessionConfig, SessionEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// The text-input surface in front of a [`Session`].
///
/// Keys edit a local buffer; the full buffer goes to the session after every
/// edit and the buffer is then replaced by what the engine kept, so the
/// engine stays the single source of truth for what was typed.
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub input: String,
    /// Last time seen by the app, used when rendering countdowns.
    pub now: Instant,
    restart_armed: bool,
}

impl App {
    pub fn new(reference: ReferenceText, config: SessionConfig, now: Instant) -> Self {
        Self {
            session: Session::new(reference, config),
            input: String::new(),
            now,
            restart_armed: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        self.now = now;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Tab => {
                self.restart_armed = true;
                return Control::Continue;
            }
            KeyCode::Enter if self.restart_armed => self.restart(),
            KeyCode::Backspace => {
                let mut value = self.input.clone();
                value.pop();
                self.apply(value, now);
            }
            KeyCode::Char('w') if ctrl => {
                let value = delete_word(&self.input).to_string();
                self.apply(value, now);
            }
            KeyCode::Char(c) if !ctrl => {
                let mut value = self.input.clone();
                value.push(c);
                self.apply(value, now);
            }
            _ => {}
        }

        self.restart_armed = false;
        Control::Continue
    }

    pub fn on_tick(&mut self, now: Instant) -> Option<SessionEvent> {
        self.now = now;
        let event = self.session.poll(now);
        if event == Some(SessionEvent::Reset) {
            self.input.clear();
        }
        event
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.input.clear();
    }

    fn apply(&mut self, value: String, now: Instant) {
        if self.session.engine().is_completed() {
            return;
        }
        if let Some(event) = self.session.input_changed(&value, now) {
            debug!(?event, "session event");
        }
        self.input = self.session.engine().current_input().iter().collect();
    }
}

/// Input with the trailing word (and the spaces after it) removed.
fn delete_word(input: &str) -> &str {
    let trimmed = input.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(idx) => &input[..idx + 1],
        None => "",
    }
}
