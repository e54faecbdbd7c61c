//! Keypad buttons and keyboard keys understood by the application state.

use crate::calculator::SYMBOLS;

/// Erase glyph on the keypad.
pub const ERASE_LABEL: &str = "\u{232b}";

/// Keypad layout, row by row.
pub const BUTTON_ROWS: [[&str; 5]; 6] = [
    ["C", ERASE_LABEL, "(", ")", "\u{00f7}"],
    ["7", "8", "9", "\u{00d7}", "^"],
    ["4", "5", "6", "-", "sqrt"],
    ["1", "2", "3", "+", "pi"],
    ["0", ".", "i", "=", "sin"],
    ["cos", "tan", "log", "exp", "ANS"],
];

/// A keypad button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Button {
    /// `C`: clear the expression and the sub-display.
    Clear,
    /// Remove the last character.
    Erase,
    /// `=`: evaluate the expression in place.
    Equals,
    /// `ANS`: append the last answer.
    Answer,
    /// Append text to the expression.
    Insert(String),
}

impl Button {
    /// Parse a keypad label.
    ///
    /// Accepts every label in [`BUTTON_ROWS`] plus the remaining operator
    /// characters and symbol names. `×`, `÷` and `π` insert `*`, `/` and `pi`.
    pub fn from_label(label: &str) -> Option<Self> {
        let button = match label {
            "C" => Self::Clear,
            ERASE_LABEL => Self::Erase,
            "=" => Self::Equals,
            "ANS" => Self::Answer,
            "\u{00d7}" => Self::Insert("*".to_string()),
            "\u{00f7}" => Self::Insert("/".to_string()),
            "\u{03c0}" => Self::Insert("pi".to_string()),
            other if is_insertable(other) => Self::Insert(other.to_string()),
            _ => return None,
        };
        Some(button)
    }
}

fn is_insertable(label: &str) -> bool {
    let mut chars = label.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && "0123456789.+-*/^()ij".contains(c)
    {
        return true;
    }
    SYMBOLS.iter().any(|(name, _)| *name == label)
}

/// Keyboard keys with a meaning beyond text entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Clear the pending expression.
    Escape,
    /// Ctrl+H: toggle history visibility.
    CtrlH,
    /// Move the history cursor towards newer entries.
    ArrowUp,
    /// Move the history cursor towards older entries.
    ArrowDown,
    /// Recall the selected history entry or submit the input.
    Enter,
}
