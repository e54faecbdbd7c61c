//! Expression evaluation over complex numbers.
//!
//! Normalizes and parses the input, evaluates the tree exactly where it
//! can (see [`Value`]) and formats the value to 15 significant digits.
//! Transcendental functions are evaluated in `f64` unless the argument is
//! one of their exact special points.

use num_bigint::BigInt;
use num_complex::{Complex, Complex64};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::f64::consts::{E, PI};
use tracing::debug;

use crate::calculator::format::format_value;
use crate::calculator::normalize::normalize;
use crate::calculator::parser::{BinaryOp, Expr, parse};
use crate::calculator::symbols::{Constant, Function};
use crate::calculator::value::Value;
use crate::error::EvaluationError;

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug)]
pub enum CalcResult {
    /// Successful calculation.
    Success {
        /// The expression as entered.
        expression: String,
        /// The numeric value.
        value: Value,
        /// Formatted for display.
        display_result: String,
    },
    /// The expression could not be evaluated.
    Error {
        /// The expression as entered.
        expression: String,
        /// Error message to display.
        message: String,
    },
}

impl CalcResult {
    /// Evaluate `input`, capturing any failure as an error result.
    pub fn evaluate(input: &str) -> Self {
        let expression = input.to_string();
        match evaluate_value(input) {
            Ok(value) => Self::Success {
                expression,
                display_result: format_value(&value),
                value,
            },
            Err(err) => Self::Error {
                expression,
                message: err.to_string(),
            },
        }
    }

    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string (result or error message).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { message, .. } => message,
        }
    }
}

/// Evaluate a mathematical expression and format the result.
pub fn evaluate_expression(input: &str) -> Result<String, EvaluationError> {
    evaluate_value(input).map(|value| format_value(&value))
}

/// Evaluate a mathematical expression to a value.
pub fn evaluate_value(input: &str) -> Result<Value, EvaluationError> {
    let normalized = normalize(input);
    let expr = parse(&normalized)?;
    let value = eval(&expr)?;
    debug!(input, %normalized, ?value, "evaluated expression");

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite)
    }
}

/// Evaluate a parsed tree.
pub fn eval(expr: &Expr) -> Result<Value, EvaluationError> {
    match expr {
        Expr::Number(n) => Ok(Value::rational(n.clone())),
        Expr::Constant(Constant::Pi) => Ok(Value::pi_times(BigRational::one())),
        Expr::Constant(Constant::E) => Ok(Value::Float(Complex64::new(E, 0.0))),
        Expr::Constant(Constant::ImaginaryUnit) => Ok(Value::imaginary_unit()),
        Expr::Negate(inner) => eval(inner).map(|value| -value),
        Expr::Chain { first, rest } => {
            let mut acc = eval(first)?;
            for (op, operand) in rest {
                let rhs = eval(operand)?;
                acc = match op {
                    BinaryOp::Add => acc + rhs,
                    BinaryOp::Subtract => acc - rhs,
                    BinaryOp::Multiply => acc * rhs,
                    BinaryOp::Divide => acc.divide(rhs)?,
                };
            }
            Ok(acc)
        }
        Expr::Power { base, exponent } => eval(base)?.power(eval(exponent)?),
        Expr::Call { function, argument } => apply(*function, eval(argument)?),
    }
}

fn apply(function: Function, value: Value) -> Result<Value, EvaluationError> {
    match apply_exact(function, &value)? {
        Some(exact) => Ok(exact),
        None => Ok(Value::Float(apply_float(function, value.to_complex64()))),
    }
}

/// Results at the exact special points: multiples of pi/2 for the
/// trigonometric functions, 0 and ±1 for their inverses, `exp(0)`,
/// `log(1)` and square roots of perfect squares.
fn apply_exact(function: Function, value: &Value) -> Result<Option<Value>, EvaluationError> {
    let exact = match function {
        Function::Sin => half_pi_steps(value).map(|k| Value::integer([0, 1, 0, -1][k])),
        Function::Cos => half_pi_steps(value).map(|k| Value::integer([1, 0, -1, 0][k])),
        Function::Tan => match half_pi_steps(value) {
            Some(1 | 3) => {
                return Err(EvaluationError::Domain(
                    "tangent is undefined at odd multiples of pi/2",
                ));
            }
            Some(_) => Some(Value::integer(0)),
            None => None,
        },
        // asin(x) = x*pi/2, acos(x) = (1 - x)*pi/2, atan(x) = x*pi/4
        Function::Asin => unit_argument(value).map(|x| pi_fraction(x, 2)),
        Function::Acos => unit_argument(value).map(|x| pi_fraction(1 - x, 2)),
        Function::Atan => unit_argument(value).map(|x| pi_fraction(x, 4)),
        Function::Log if value.is_zero() => {
            return Err(EvaluationError::Domain("logarithm of zero is undefined"));
        }
        Function::Log => value
            .as_rational()
            .is_some_and(|x| x.is_one())
            .then(|| Value::integer(0)),
        Function::Exp => value.is_exact_zero().then(|| Value::integer(1)),
        Function::Sqrt => exact_sqrt(value),
    };

    Ok(exact)
}

/// `k` in `0..4` when the value is exactly `k * pi/2` modulo `2*pi`.
fn half_pi_steps(value: &Value) -> Option<usize> {
    let steps = value.pi_coefficient()? * BigRational::from_integer(2.into());
    if !steps.is_integer() {
        return None;
    }
    let four = BigInt::from(4);
    ((steps.to_integer() % &four + &four) % &four).to_usize()
}

/// The value as `-1`, `0` or `1`, if it is exactly one of them.
fn unit_argument(value: &Value) -> Option<i64> {
    let x = value.as_rational()?;
    if !x.is_integer() {
        return None;
    }
    x.to_integer().to_i64().filter(|x| x.abs() <= 1)
}

fn pi_fraction(numer: i64, denom: i64) -> Value {
    Value::pi_times(BigRational::new(numer.into(), denom.into()))
}

fn exact_sqrt(value: &Value) -> Option<Value> {
    let x = value.as_rational()?;
    let root = BigRational::new(
        perfect_sqrt(&x.numer().abs())?,
        perfect_sqrt(x.denom())?,
    );

    Some(if x.is_negative() {
        Value::Exact(Complex::new(BigRational::zero(), root))
    } else {
        Value::rational(root)
    })
}

fn perfect_sqrt(n: &BigInt) -> Option<BigInt> {
    let root = n.sqrt();
    (&root * &root == *n).then_some(root)
}

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn apply_float(function: Function, z: Complex64) -> Complex64 {
    let x = z.re;
    let on_real = z.im == 0.0;

    match function {
        Function::Sin if on_real => real(x.sin()),
        Function::Sin => z.sin(),
        Function::Cos if on_real => real(x.cos()),
        Function::Cos => z.cos(),
        Function::Tan if on_real => real(x.tan()),
        Function::Tan => z.tan(),
        Function::Asin if on_real && x.abs() <= 1.0 => real(x.asin()),
        Function::Asin => z.asin(),
        Function::Acos if on_real && x.abs() <= 1.0 => real(x.acos()),
        Function::Acos => z.acos(),
        Function::Atan if on_real => real(x.atan()),
        Function::Atan => z.atan(),
        Function::Log if on_real && x > 0.0 => real(x.ln()),
        Function::Log if on_real => Complex64::new((-x).ln(), PI),
        Function::Log => z.ln(),
        Function::Sqrt if on_real && x >= 0.0 => real(x.sqrt()),
        Function::Sqrt if on_real => Complex64::new(0.0, (-x).sqrt()),
        Function::Sqrt => z.sqrt(),
        Function::Exp if on_real => real(x.exp()),
        Function::Exp => z.exp(),
    }
}
