use crate::metrics;
use crate::reference::ReferenceText;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// How an input change was classified against the previous length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insertion,
    Deletion,
    Unchanged,
    /// The test already ended; the change was not applied.
    Ignored,
}

/// What a single call to [`ScoringEngine::on_input_changed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeReport {
    pub edit: Edit,
    /// The timer should start.
    pub started: bool,
    /// The test just ended. Reported once per session.
    pub completed: bool,
}

impl ChangeReport {
    fn new(edit: Edit) -> Self {
        Self {
            edit,
            started: false,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Untyped,
    Correct,
    Incorrect,
}

/// One reference character as the display layer needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCell {
    pub char: char,
    pub state: CharState,
    pub cursor: bool,
}

/// Read-only view of the session for display and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Stored input. The keystroke that completes the test is scored but not
    /// stored, so after completion this is one edit behind `correct_characters`.
    pub current_input: String,
    pub cursor_index: usize,
    pub is_active: bool,
    pub completed: bool,
    pub elapsed_seconds: u64,
    pub words_per_minute: u32,
    pub accuracy_percent: f64,
    pub error_count: u32,
    pub correct_characters: usize,
    pub accuracy_score: u32,
}

/// Scores one typing test against a fixed reference text.
///
/// Every method takes `&mut self` for mutation, so callers can only feed it
/// one event at a time.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    reference: ReferenceText,
    current_input: Vec<char>,
    cursor_index: usize,
    previous_length: usize,
    elapsed_seconds: u64,
    is_active: bool,
    completed: bool,
    error_count: u32,
    accuracy_score: u32,
    correct_characters: usize,
}

impl ScoringEngine {
    pub fn new(reference: ReferenceText) -> Self {
        Self {
            reference,
            current_input: Vec::new(),
            cursor_index: 0,
            previous_length: 0,
            elapsed_seconds: 0,
            is_active: false,
            completed: false,
            error_count: 0,
            accuracy_score: 0,
            correct_characters: 0,
        }
    }

    /// Back to a fresh session over the same reference.
    pub fn reset(&mut self) {
        let reference = std::mem::replace(&mut self.reference, ReferenceText::new(""));
        *self = Self::new(reference);
    }

    /// Advance the clock by one second. Ignored unless the timer is running.
    pub fn on_session_tick(&mut self) {
        if self.is_active {
            self.elapsed_seconds += 1;
        }
    }

    /// Reconcile the full current value of the input against the reference.
    pub fn on_input_changed(&mut self, new_input: &str) -> ChangeReport {
        if self.completed {
            return ChangeReport::new(Edit::Ignored);
        }

        let new_input: Vec<char> = new_input.chars().collect();
        let mut report = ChangeReport::new(Edit::Unchanged);

        if !self.is_active && !new_input.is_empty() {
            self.is_active = true;
            report.started = true;
            debug!(reference_len = self.reference.len(), "typing started");
        }

        let mut reached_end = false;
        match new_input.len().cmp(&self.previous_length) {
            Ordering::Greater => {
                report.edit = Edit::Insertion;
                self.previous_length = new_input.len();
                self.cursor_index = new_input.len() - 1;

                let typed = new_input.get(self.cursor_index).copied();
                let expected = self.reference.get(self.cursor_index);
                if typed.is_some() && typed == expected {
                    self.accuracy_score += 1;
                } else {
                    self.error_count += 1;
                    debug!(
                        index = self.cursor_index,
                        ?typed,
                        ?expected,
                        errors = self.error_count,
                        "mismatched keystroke"
                    );
                }

                reached_end = self
                    .reference
                    .last_index()
                    .is_some_and(|last| self.cursor_index >= last);
            }
            Ordering::Less => {
                report.edit = Edit::Deletion;
                self.previous_length = new_input.len();
                self.cursor_index = new_input.len().saturating_sub(1);
                self.accuracy_score = self.accuracy_score.saturating_sub(1);
            }
            Ordering::Equal => {}
        }

        self.correct_characters =
            metrics::correct_character_count(&new_input, self.reference.chars());

        let full_match = new_input.as_slice() == self.reference.chars();

        if reached_end {
            self.finish();
            report.completed = true;
        } else {
            self.current_input = new_input;
        }

        if full_match {
            self.is_active = false;
            if !self.completed {
                self.finish();
                report.completed = true;
            }
        }

        report
    }

    fn finish(&mut self) {
        self.is_active = false;
        self.completed = true;
        debug!(
            elapsed = self.elapsed_seconds,
            errors = self.error_count,
            correct = self.correct_characters,
            "test completed"
        );
    }

    pub fn reference(&self) -> &ReferenceText {
        &self.reference
    }

    pub fn current_input(&self) -> &[char] {
        &self.current_input
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn accuracy_score(&self) -> u32 {
        self.accuracy_score
    }

    pub fn correct_characters(&self) -> usize {
        self.correct_characters
    }

    /// Derived from the elapsed time at read time, so late ticks are reflected.
    pub fn words_per_minute(&self) -> u32 {
        metrics::words_per_minute(self.correct_characters, self.elapsed_seconds)
    }

    pub fn accuracy_percent(&self) -> f64 {
        metrics::accuracy_percent(self.reference.len(), self.error_count)
    }

    pub fn char_state(&self, idx: usize) -> CharState {
        match (self.current_input.get(idx), self.reference.get(idx)) {
            (Some(typed), Some(expected)) if idx <= self.cursor_index => {
                if *typed == expected {
                    CharState::Correct
                } else {
                    CharState::Incorrect
                }
            }
            _ => CharState::Untyped,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = RenderCell> + '_ {
        self.reference
            .chars()
            .iter()
            .enumerate()
            .map(|(idx, &c)| RenderCell {
                char: c,
                state: self.char_state(idx),
                cursor: self.is_active && idx == self.cursor_index,
            })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_input: self.current_input.iter().collect(),
            cursor_index: self.cursor_index,
            is_active: self.is_active,
            completed: self.completed,
            elapsed_seconds: self.elapsed_seconds,
            words_per_minute: self.words_per_minute(),
            accuracy_percent: self.accuracy_percent(),
            error_count: self.error_count,
            correct_characters: self.correct_characters,
            accuracy_score: self.accuracy_score,
        }
    }
}
