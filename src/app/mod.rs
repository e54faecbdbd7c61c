//! Application state shared by every front end.
//!
//! [`App`] owns the expression buffer, the last answer, the text input and
//! the history store. Front ends translate clicks and keystrokes into
//! [`Button`] and [`Key`] values and render from the accessors.

mod input;

pub use input::{BUTTON_ROWS, Button, ERASE_LABEL, Key};

use tracing::{info, warn};

use crate::calculator::CalcResult;
use crate::history::{HistoryEntry, HistoryStore};

/// Shown in place of the expression after a failed evaluation.
pub const ERROR_DISPLAY: &str = "Error";

/// Which part of the interface receives Enter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    History,
}

pub struct App {
    /// Keypad buffer and main display.
    expression: String,
    /// Free-text input line.
    input: String,
    /// Secondary line: the evaluated expression or an error message.
    subdisplay: String,
    last_answer: String,
    history: HistoryStore,
    show_history: bool,
    focus: Focus,
}

impl App {
    pub fn new(history: HistoryStore, show_history: bool) -> Self {
        Self {
            expression: String::new(),
            input: String::new(),
            subdisplay: String::new(),
            last_answer: "0".to_string(),
            history,
            show_history,
            focus: Focus::Input,
        }
    }

    /// Main display text.
    pub fn display(&self) -> &str {
        if self.expression.is_empty() {
            "0"
        } else {
            &self.expression
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn subdisplay(&self) -> &str {
        &self.subdisplay
    }

    pub fn last_answer(&self) -> &str {
        &self.last_answer
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Replace the text input. Editing moves focus back to the input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.focus = Focus::Input;
    }

    /// Handle a keypad button.
    ///
    /// `=` evaluates in place but never records history.
    pub fn press(&mut self, button: Button) {
        match button {
            Button::Clear => {
                self.expression.clear();
                self.subdisplay.clear();
            }
            Button::Erase => {
                self.expression.pop();
            }
            Button::Equals => {
                self.evaluate_in_place();
            }
            Button::Answer => self.expression.push_str(&self.last_answer),
            Button::Insert(text) => self.expression.push_str(&text),
        }
    }

    /// Evaluate the text input and record it in history on success.
    pub fn submit(&mut self) -> CalcResult {
        self.expression = self.input.clone();
        let result = self.evaluate_in_place();
        self.input = self.expression.clone();

        if let Some(mut entry) = HistoryEntry::from_calc_result(&result) {
            // Blank input evaluates as `0`; record it that way.
            if entry.expression.trim().is_empty() {
                entry.expression = "0".to_string();
            }
            if let Err(err) = self.history.record(entry.expression, entry.result) {
                warn!("history not saved: {}", err);
            }
        }

        result
    }

    /// Handle a keyboard key. Returns the evaluation when Enter submitted.
    pub fn handle_key(&mut self, key: Key) -> Option<CalcResult> {
        let history_active = self.show_history && !self.history.is_empty();

        match key {
            Key::Escape => {
                self.expression.clear();
                None
            }
            Key::CtrlH => {
                self.toggle_history();
                None
            }
            Key::ArrowDown | Key::ArrowUp if history_active => {
                let delta = if key == Key::ArrowDown { 1 } else { -1 };
                self.history.select(delta);
                self.focus = Focus::History;
                None
            }
            Key::ArrowDown | Key::ArrowUp => None,
            Key::Enter if history_active && self.focus == Focus::History => {
                self.use_history_item(self.history.selected());
                None
            }
            Key::Enter => Some(self.submit()),
        }
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
    }

    /// Load a history entry into the expression and input.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn use_history_item(&mut self, index: usize) -> bool {
        let Ok(entry) = self.history.recall(index) else {
            return false;
        };

        self.expression = entry.expression.clone();
        self.input = entry.expression.clone();
        self.last_answer = entry.result.clone();
        self.focus = Focus::Input;
        true
    }

    pub fn clear_history(&mut self) {
        match self.history.clear() {
            Ok(()) => info!("history cleared"),
            Err(err) => warn!("history cleared in memory only: {}", err),
        }
    }

    fn evaluate_in_place(&mut self) -> CalcResult {
        let result = CalcResult::evaluate(&self.expression);

        match &result {
            CalcResult::Success { display_result, .. } => {
                self.subdisplay = std::mem::replace(&mut self.expression, display_result.clone());
                self.last_answer = display_result.clone();
            }
            CalcResult::Error { message, .. } => {
                self.expression = ERROR_DISPLAY.to_string();
                self.subdisplay = message.clone();
            }
        }

        result
    }
}
