//! Interactive terminal front end.
//!
//! Plain lines are submitted like the text input of the graphical version.
//! Lines starting with `:` stand in for keypad buttons and special keys.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::app::{App, Button, Key};
use crate::calculator::{CalcResult, copy_to_clipboard};

const HELP: &str = "\
Type an expression and press Enter to evaluate it.
  :press <label>   press a keypad button (0-9, +, \u{00d7}, =, ANS, C, sqrt, ...)
  :up / :down      move the history cursor
  :enter           Enter key (recalls the selected entry when history has focus)
  :esc             clear the expression
  :toggle          show or hide history (Ctrl+H)
  :history         list history
  :recall <n>      load history entry n
  :clear-history   delete all history
  :quit            exit";

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Press(Button),
    Key(Key),
    ShowHistory,
    Recall(usize),
    ClearHistory,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return Self::Submit(trimmed.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "press" => Button::from_label(arg)
                .map(Self::Press)
                .unwrap_or_else(|| Self::Invalid(format!("unknown button '{}'", arg))),
            "up" => Self::Key(Key::ArrowUp),
            "down" => Self::Key(Key::ArrowDown),
            "enter" => Self::Key(Key::Enter),
            "esc" => Self::Key(Key::Escape),
            "toggle" => Self::Key(Key::CtrlH),
            "history" => Self::ShowHistory,
            "recall" => arg
                .parse()
                .map(Self::Recall)
                .unwrap_or_else(|_| Self::Invalid(format!("invalid index '{}'", arg))),
            "clear-history" => Self::ClearHistory,
            "help" => Self::Help,
            "q" | "quit" => Self::Quit,
            other => Self::Invalid(format!("unknown command ':{}'", other)),
        }
    }
}

pub struct Repl {
    app: App,
    copy_results: bool,
}

impl Repl {
    pub fn new(app: App, copy_results: bool) -> Self {
        Self { app, copy_results }
    }

    /// Run until EOF, Ctrl-C or `:quit`.
    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        for entry in self.app.history().entries().iter().rev() {
            remember_line(&mut editor, &entry.expression);
        }

        println!("ecalc - type :help for commands");
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    remember_line(&mut editor, &line);
                    if !self.execute(Command::parse(&line)) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// Apply one command. Returns `false` when the loop should stop.
    pub fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Submit(text) => {
                self.app.set_input(text);
                let result = self.app.submit();
                self.report(&result);
            }
            Command::Press(button) => {
                self.app.press(button);
                self.print_display();
            }
            Command::Key(key) => match self.app.handle_key(key) {
                Some(result) => self.report(&result),
                None => self.print_key_effect(key),
            },
            Command::ShowHistory => self.print_history(),
            Command::Recall(index) => {
                if self.app.use_history_item(index) {
                    self.print_display();
                } else {
                    println!("no history entry {}", index);
                }
            }
            Command::ClearHistory => {
                self.app.clear_history();
                println!("history cleared");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
            Command::Invalid(message) => println!("{}", message),
        }
        true
    }

    fn report(&self, result: &CalcResult) {
        match result {
            CalcResult::Success { display_result, .. } => {
                println!("= {}", display_result);
                if self.copy_results
                    && let Err(err) = copy_to_clipboard(display_result)
                {
                    warn!("{}", err);
                }
            }
            CalcResult::Error { message, .. } => println!("Error: {}", message),
        }
    }

    fn print_display(&self) {
        if self.app.subdisplay().is_empty() {
            println!("{}", self.app.display());
        } else {
            println!("{}  ({})", self.app.display(), self.app.subdisplay());
        }
    }

    fn print_key_effect(&self, key: Key) {
        match key {
            Key::CtrlH => {
                let state = if self.app.show_history() { "shown" } else { "hidden" };
                println!("history {}", state);
            }
            Key::ArrowUp | Key::ArrowDown => match self.app.history().selected_entry() {
                Some(entry) if self.app.show_history() => {
                    println!("[{}] {}", self.app.history().selected(), entry.label());
                }
                _ => {}
            },
            Key::Escape | Key::Enter => self.print_display(),
        }
    }

    fn print_history(&self) {
        let history = self.app.history();
        if !self.app.show_history() {
            println!("history hidden (:toggle to show)");
        } else if history.is_empty() {
            println!("history is empty");
        } else {
            for (index, entry) in history.entries().iter().enumerate() {
                let marker = if index == history.selected() { '>' } else { ' ' };
                println!("{} {:3}: {}", marker, index, entry.label());
            }
        }
    }
}

/// Add a line to the editor's recall list. Failures only cost arrow-key
/// recall, so they are logged and skipped.
fn remember_line(editor: &mut DefaultEditor, line: &str) {
    if let Err(err) = editor.add_history_entry(line) {
        debug!("line not added to editor history: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStore;
    use rustyline::history::History;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("  2+2 "),
            Command::Submit("2+2".to_string())
        );
        assert_eq!(Command::parse(":press ="), Command::Press(Button::Equals));
        assert_eq!(
            Command::parse(":press \u{03c0}"),
            Command::Press(Button::Insert("pi".to_string()))
        );
        assert_eq!(Command::parse(":down"), Command::Key(Key::ArrowDown));
        assert_eq!(Command::parse(":toggle"), Command::Key(Key::CtrlH));
        assert_eq!(Command::parse(":recall 3"), Command::Recall(3));
        assert_eq!(Command::parse(":quit"), Command::Quit);
        assert!(matches!(Command::parse(":recall x"), Command::Invalid(_)));
        assert!(matches!(Command::parse(":press ?"), Command::Invalid(_)));
        assert!(matches!(Command::parse(":nope"), Command::Invalid(_)));
    }

    #[test]
    fn test_remember_line_fills_editor_history() {
        let mut editor = DefaultEditor::new().unwrap();
        remember_line(&mut editor, "1+1");
        remember_line(&mut editor, "2+2");
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_execute_drives_app() {
        let mut repl = Repl::new(App::new(HistoryStore::in_memory(), true), false);

        assert!(repl.execute(Command::parse("3+4i")));
        assert_eq!(repl.app.history().len(), 1);

        assert!(repl.execute(Command::parse(":press 2")));
        assert!(repl.execute(Command::parse(":press =")));
        assert_eq!(repl.app.history().len(), 1);

        assert!(repl.execute(Command::parse(":recall 0")));
        assert_eq!(repl.app.expression(), "3+4i");

        assert!(repl.execute(Command::parse(":clear-history")));
        assert!(repl.app.history().is_empty());

        assert!(!repl.execute(Command::Quit));
    }
}
