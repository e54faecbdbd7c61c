//! Numeric values.
//!
//! Literals and `+ - * / **` stay exact as complex rationals, and rational
//! multiples of pi are tracked so trigonometric functions land on exact
//! values. Everything else falls back to a complex float.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_complex::{Complex, Complex64};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::EvaluationError;

/// Largest exact power computed, in bits of the result. Bigger powers are
/// evaluated as floats.
const MAX_EXACT_BITS: u64 = 1 << 16;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Exact complex rational.
    Exact(Complex<BigRational>),
    /// `q * pi` for a nonzero rational `q`.
    PiMultiple(BigRational),
    /// Inexact complex float.
    Float(Complex64),
}

impl Value {
    pub fn rational(value: BigRational) -> Self {
        Self::Exact(Complex::new(value, BigRational::zero()))
    }

    pub fn integer(value: i64) -> Self {
        Self::rational(BigRational::from_integer(value.into()))
    }

    pub fn imaginary_unit() -> Self {
        Self::Exact(Complex::new(BigRational::zero(), BigRational::one()))
    }

    /// `q * pi`; a zero coefficient collapses to exact zero.
    pub fn pi_times(q: BigRational) -> Self {
        if q.is_zero() {
            Self::integer(0)
        } else {
            Self::PiMultiple(q)
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(z) => z.is_zero(),
            Self::PiMultiple(_) => false,
            Self::Float(z) => z.re == 0.0 && z.im == 0.0,
        }
    }

    pub fn is_exact_zero(&self) -> bool {
        matches!(self, Self::Exact(z) if z.is_zero())
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(z) => z.re.is_finite() && z.im.is_finite(),
            _ => true,
        }
    }

    /// The value as an exact real rational, if it is one.
    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Self::Exact(z) if z.im.is_zero() => Some(&z.re),
            _ => None,
        }
    }

    /// `q` such that the value is exactly `q * pi`.
    pub fn pi_coefficient(&self) -> Option<BigRational> {
        match self {
            Self::PiMultiple(q) => Some(q.clone()),
            Self::Exact(z) if z.is_zero() => Some(BigRational::zero()),
            _ => None,
        }
    }

    fn has_positive_real_part(&self) -> bool {
        match self {
            Self::Exact(z) => z.re.is_positive(),
            Self::PiMultiple(q) => q.is_positive(),
            Self::Float(z) => z.re > 0.0,
        }
    }

    /// Nearest complex float. Exact values outside `f64` range become
    /// infinite.
    pub fn to_complex64(&self) -> Complex64 {
        match self {
            Self::Exact(z) => Complex64::new(ratio_to_f64(&z.re), ratio_to_f64(&z.im)),
            Self::PiMultiple(q) => Complex64::new(ratio_to_f64(q) * PI, 0.0),
            Self::Float(z) => *z,
        }
    }

    pub fn divide(self, rhs: Value) -> Result<Value, EvaluationError> {
        if rhs.is_zero() {
            return Err(EvaluationError::DivisionByZero);
        }

        Ok(match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a / b),
            (lhs, _) if lhs.is_exact_zero() => Self::integer(0),
            (Self::PiMultiple(q), Self::Exact(z)) if z.im.is_zero() => Self::pi_times(q / z.re),
            (Self::PiMultiple(a), Self::PiMultiple(b)) => Self::rational(a / b),
            (lhs, rhs) => Self::Float(divide_float(lhs.to_complex64(), rhs.to_complex64())),
        })
    }

    pub fn power(self, exponent: Value) -> Result<Value, EvaluationError> {
        if exponent.is_zero() {
            return Ok(Self::integer(1));
        }

        if self.is_zero() {
            return if exponent.has_positive_real_part() {
                Ok(Self::integer(0))
            } else {
                Err(EvaluationError::Domain(
                    "zero cannot be raised to a non-positive power",
                ))
            };
        }

        if let Self::Exact(base) = &self
            && let Some(n) = exponent.as_rational().and_then(|n| exact_exponent(base, n))
        {
            return Ok(Self::Exact(base.powi(n)));
        }

        Ok(Self::Float(power_float(
            self.to_complex64(),
            exponent.to_complex64(),
        )))
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Self::Exact(z) => Self::Exact(-z),
            Self::PiMultiple(q) => Self::PiMultiple(-q),
            Self::Float(z) => Self::Float(-z),
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a + b),
            (Self::PiMultiple(a), Self::PiMultiple(b)) => Self::pi_times(a + b),
            (lhs, rhs) if rhs.is_exact_zero() => lhs,
            (lhs, rhs) if lhs.is_exact_zero() => rhs,
            (lhs, rhs) => Self::Float(lhs.to_complex64() + rhs.to_complex64()),
        }
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        self + (-rhs)
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a * b),
            (lhs, rhs) if lhs.is_exact_zero() || rhs.is_exact_zero() => Self::integer(0),
            (Self::PiMultiple(q), Self::Exact(z)) | (Self::Exact(z), Self::PiMultiple(q))
                if z.im.is_zero() =>
            {
                Self::pi_times(q * z.re)
            }
            (lhs, rhs) => Self::Float(multiply_float(lhs.to_complex64(), rhs.to_complex64())),
        }
    }
}

fn ratio_to_f64(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// `n` as an `i32` when it is an integer and `base**n` stays within
/// [`MAX_EXACT_BITS`].
fn exact_exponent(base: &Complex<BigRational>, n: &BigRational) -> Option<i32> {
    if !n.is_integer() {
        return None;
    }
    let n = n.to_integer().to_i32()?;

    let parts: [&BigInt; 4] = [
        base.re.numer(),
        base.re.denom(),
        base.im.numer(),
        base.im.denom(),
    ];
    let bits = parts.iter().map(|part| part.bits()).max().unwrap_or(0).max(1);

    (u64::from(n.unsigned_abs()).saturating_mul(bits) <= MAX_EXACT_BITS).then_some(n)
}

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn is_real(z: Complex64) -> bool {
    z.im == 0.0
}

fn multiply_float(lhs: Complex64, rhs: Complex64) -> Complex64 {
    // Real operands skip the cross terms, so `inf * 2` stays infinite
    // instead of picking up `inf * 0 = NaN`.
    if is_real(lhs) && is_real(rhs) {
        real(lhs.re * rhs.re)
    } else {
        lhs * rhs
    }
}

fn divide_float(lhs: Complex64, rhs: Complex64) -> Complex64 {
    if is_real(rhs) {
        Complex64::new(lhs.re / rhs.re, lhs.im / rhs.re)
    } else {
        lhs / rhs
    }
}

fn power_float(base: Complex64, exponent: Complex64) -> Complex64 {
    if is_real(exponent) && exponent.re.fract() == 0.0 && exponent.re.abs() <= i32::MAX as f64 {
        let n = exponent.re as i32;
        return if is_real(base) {
            real(base.re.powi(n))
        } else {
            base.powi(n)
        };
    }

    if is_real(base) && is_real(exponent) && base.re > 0.0 {
        return real(base.re.powf(exponent.re));
    }

    base.powc(exponent)
}
