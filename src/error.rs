//! Error types shared across the calculator, history and clipboard layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn user text into a number.
///
/// Every variant renders as a message suitable for the result display.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Function '{0}' expects an argument")]
    MissingArgument(&'static str),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Math domain error: {0}")]
    Domain(&'static str),

    #[error("Result is not a finite number")]
    NonFinite,
}

/// Failure to write the history file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to write history to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Recalling a history entry that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecallError {
    #[error("History index {index} is out of range (history has {len} entries)")]
    OutOfRange { index: usize, len: usize },
}

/// Failure to place a result on the system clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Access(arboard::Error),

    #[error("Failed to copy to clipboard: {0}")]
    Copy(arboard::Error),
}
