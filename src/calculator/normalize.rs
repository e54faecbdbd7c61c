//! Input normalization for the calculator.
//!
//! Rewrites calculator-style notation into the canonical form understood by
//! the parser: `^` becomes `**`, the pi glyph becomes `pi`, and the imaginary
//! unit is spelled `I`.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Token the parser resolves to the imaginary unit.
pub const IMAGINARY_UNIT: &str = "I";

lazy_static! {
    /// Maximal runs of identifier characters. A run consisting of exactly `i`
    /// is a standalone imaginary unit; `i` inside `sin` or `pi` is part of a
    /// longer run and left alone.
    static ref WORD_RUN: Regex = Regex::new(r"[A-Za-z0-9_]+").unwrap();
}

/// Normalize raw user input.
///
/// Empty (or all-whitespace) input normalizes to `0`.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }

    let expr = trimmed
        .replace('^', "**")
        .replace('\u{03c0}', "pi")
        .replace('j', IMAGINARY_UNIT);

    replace_standalone_i(&expr).into_owned()
}

fn replace_standalone_i(expr: &str) -> Cow<'_, str> {
    WORD_RUN.replace_all(expr, |caps: &Captures| {
        if &caps[0] == "i" {
            IMAGINARY_UNIT.to_string()
        } else {
            caps[0].to_string()
        }
    })
}
