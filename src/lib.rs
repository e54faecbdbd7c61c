//! ecalc: a scientific calculator with complex numbers and persistent history.
//!
//! Expressions are normalized (`^`, `π`, `i`/`j`), parsed against a fixed
//! table of functions and constants, evaluated over complex numbers (exactly
//! where the arithmetic allows) and rendered to 15 significant digits. Successful submissions are kept in a
//! bounded history file.

pub mod app;
pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod repl;
