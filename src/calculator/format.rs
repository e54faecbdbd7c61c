//! Fixed-precision rendering of calculator results.

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::calculator::value::Value;

/// Significant decimal digits in every rendered number.
pub const PRECISION: usize = 15;

/// Decimal exponents strictly inside this range use fixed notation.
const MIN_FIXED_EXPONENT: i64 = -5;
const MAX_FIXED_EXPONENT: i64 = PRECISION as i64;

/// A component this small relative to the other one is rounding noise,
/// as in `exp(i*pi)`.
const NOISE_RATIO: f64 = 4.0 * f64::EPSILON;

/// Render a value as `a + b*j`, `a - b*j`, `b*j`, or `a`.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Exact(z) => join_parts(
            (!z.re.is_zero()).then(|| format_rational(&z.re)),
            (!z.im.is_zero()).then(|| format_rational(&z.im)),
        ),
        inexact => format_complex(inexact.to_complex64()),
    }
}

/// Render a complex float, dropping rounding noise in either component.
pub fn format_complex(value: Complex64) -> String {
    let (re, im) = drop_noise(value.re, value.im);
    join_parts(
        (re != 0.0).then(|| format_real(re)),
        (im != 0.0).then(|| format_real(im)),
    )
}

fn join_parts(re: Option<String>, im: Option<String>) -> String {
    match (re, im) {
        (None, None) => "0".to_string(),
        (Some(re), None) => re,
        (None, Some(im)) => format!("{}*j", im),
        (Some(re), Some(im)) => match im.strip_prefix('-') {
            Some(magnitude) => format!("{} - {}*j", re, magnitude),
            None => format!("{} + {}*j", re, im),
        },
    }
}

fn drop_noise(re: f64, im: f64) -> (f64, f64) {
    if im.abs() <= re.abs() * NOISE_RATIO {
        (re, 0.0)
    } else if re.abs() <= im.abs() * NOISE_RATIO {
        (0.0, im)
    } else {
        (re, im)
    }
}

/// Render a real number with exactly [`PRECISION`] significant digits.
///
/// Zero renders as `0`. Values with a decimal exponent in `(-5, 15)` use
/// fixed notation (`0.250000000000000`, `1024.00000000000`); the rest use
/// scientific notation (`1.00000000000000e+20`, `1.00000000000000e-6`).
pub fn format_real(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:e}` rounds correctly and yields e.g. "-1.23450000000000e-7".
    let scientific = format!("{:.*e}", PRECISION - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i64>() else {
        return scientific;
    };

    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    render(negative, &digits, exponent)
}

/// Render an exact rational with [`PRECISION`] significant digits, rounded
/// half away from zero. Magnitude is unbounded.
pub fn format_rational(value: &BigRational) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let magnitude = value.abs();

    // Estimate the decimal exponent from bit lengths, then correct it so
    // that 10^exponent <= magnitude < 10^(exponent + 1).
    let bit_span = magnitude.numer().bits() as f64 - magnitude.denom().bits() as f64;
    let mut exponent = (bit_span * std::f64::consts::LOG10_2).floor() as i64;
    while magnitude < power_of_ten(exponent) {
        exponent -= 1;
    }
    while magnitude >= power_of_ten(exponent + 1) {
        exponent += 1;
    }

    let shift = PRECISION as i64 - 1 - exponent;
    let mut mantissa = (magnitude * power_of_ten(shift)).round().to_integer();
    if mantissa >= *power_of_ten(PRECISION as i64).numer() {
        mantissa /= 10u32;
        exponent += 1;
    }

    render(value.is_negative(), &mantissa.to_string(), exponent)
}

fn power_of_ten(exponent: i64) -> BigRational {
    let magnitude = num_traits::pow(BigInt::from(10u32), exponent.unsigned_abs() as usize);
    if exponent < 0 {
        BigRational::new(BigInt::one(), magnitude)
    } else {
        BigRational::from_integer(magnitude)
    }
}

/// Lay out [`PRECISION`] significant `digits` with decimal `exponent`.
fn render(negative: bool, digits: &str, exponent: i64) -> String {
    let sign = if negative { "-" } else { "" };

    if MIN_FIXED_EXPONENT < exponent && exponent < MAX_FIXED_EXPONENT {
        let (digits, split) = if exponent < 0 {
            let zeros = "0".repeat(exponent.unsigned_abs() as usize);
            (format!("{}{}", zeros, digits), 1)
        } else {
            (digits.to_string(), exponent as usize + 1)
        };
        format!("{}{}.{}", sign, &digits[..split], &digits[split..])
    } else {
        let sign_char = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}{}.{}e{}{}",
            sign,
            &digits[..1],
            &digits[1..],
            sign_char,
            exponent.unsigned_abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_real(4.0), "4.00000000000000");
        assert_eq!(format_real(-2.0), "-2.00000000000000");
        assert_eq!(format_real(0.5), "0.500000000000000");
        assert_eq!(format_real(123.456), "123.456000000000");
        assert_eq!(format_real(0.1 + 0.2), "0.300000000000000");
        assert_eq!(format_real(0.0001), "0.000100000000000000");
        assert_eq!(format_real(1e14), "100000000000000.");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(format_real(1e15), "1.00000000000000e+15");
        assert_eq!(format_real(1e20), "1.00000000000000e+20");
        assert_eq!(format_real(1e-5), "1.00000000000000e-5");
        assert_eq!(format_real(-2.5e-7), "-2.50000000000000e-7");
    }

    #[test]
    fn test_rounding_to_precision() {
        assert_eq!(format_real(std::f64::consts::PI), "3.14159265358979");
        assert_eq!(format_real(2.0 / 3.0), "0.666666666666667");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(-0.0), "0");
        assert_eq!(format_complex(Complex64::new(0.0, 0.0)), "0");
    }

    #[test]
    fn test_complex_layout() {
        assert_eq!(
            format_complex(Complex64::new(3.0, 4.0)),
            "3.00000000000000 + 4.00000000000000*j"
        );
        assert_eq!(
            format_complex(Complex64::new(3.0, -4.0)),
            "3.00000000000000 - 4.00000000000000*j"
        );
        assert_eq!(
            format_complex(Complex64::new(0.0, -1.0)),
            "-1.00000000000000*j"
        );
        assert_eq!(format_complex(Complex64::new(-2.0, 0.0)), "-2.00000000000000");
    }

    #[test]
    fn test_rounding_noise_is_dropped() {
        assert_eq!(
            format_complex(Complex64::new(-1.0, 1.2246467991473532e-16)),
            "-1.00000000000000"
        );
        assert_eq!(
            format_complex(Complex64::new(6.123233995736766e-17, 1.0)),
            "1.00000000000000*j"
        );
    }

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(numer.into(), denom.into())
    }

    #[test]
    fn test_rational_rendering() {
        assert_eq!(format_rational(&ratio(4, 1)), "4.00000000000000");
        assert_eq!(format_rational(&ratio(-1, 4)), "-0.250000000000000");
        assert_eq!(format_rational(&ratio(2, 3)), "0.666666666666667");
        assert_eq!(format_rational(&ratio(1, 10_000)), "0.000100000000000000");
        assert_eq!(format_rational(&ratio(1, 100_000)), "1.00000000000000e-5");
        assert_eq!(format_rational(&ratio(0, 1)), "0");
    }

    #[test]
    fn test_rational_rounding_carries_into_exponent() {
        // 9.999999999999999 rounds up to the next power of ten.
        let value = ratio(9_999_999_999_999_999, 1_000_000_000_000_000);
        assert_eq!(format_rational(&value), "10.0000000000000");
    }

    #[test]
    fn test_rational_beyond_float_range() {
        let big = BigRational::from_integer(num_traits::pow(BigInt::from(10u32), 400));
        assert_eq!(format_rational(&big), "1.00000000000000e+400");
        assert_eq!(
            format_rational(&big.recip()),
            "1.00000000000000e-400"
        );
    }

    #[test]
    fn test_value_layout() {
        let z = Value::Exact(num_complex::Complex::new(ratio(3, 1), ratio(-4, 1)));
        assert_eq!(format_value(&z), "3.00000000000000 - 4.00000000000000*j");
        assert_eq!(format_value(&Value::integer(0)), "0");
        assert_eq!(
            format_value(&Value::PiMultiple(ratio(1, 1))),
            "3.14159265358979"
        );
    }
}
