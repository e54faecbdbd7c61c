//! Calculator module for evaluating mathematical expressions.
//!
//! This module provides functionality to:
//! - Normalize calculator notation (`^`, `π`, `i`/`j`) into canonical form
//! - Parse against a fixed table of functions and constants
//! - Evaluate exactly over complex rationals where possible, in `f64` otherwise
//! - Format to 15 significant digits
//! - Copy results to the clipboard

mod clipboard;
mod evaluation;
mod format;
mod normalize;
mod parser;
mod symbols;
mod value;

pub use clipboard::copy_to_clipboard;
pub use evaluation::{CalcResult, evaluate_expression, evaluate_value};
pub use format::{PRECISION, format_complex, format_rational, format_real, format_value};
pub use normalize::normalize;
pub use parser::{BinaryOp, Expr, parse};
pub use symbols::{Constant, Function, SYMBOLS, Symbol};
pub use value::Value;
