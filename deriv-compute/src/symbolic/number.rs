//! Exact and approximate numbers used as the leaves of an [`Expr`](super::Expr).

use crate::primitive::{float, rational, PRECISION};
use rug::{ops::Pow, Float, Integer, Rational};
use std::{cmp::Ordering, fmt, hash::{Hash, Hasher}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The largest integer exponent that is folded into an exact number.
const MAX_FOLDED_EXPONENT: i32 = 4096;

/// The largest root index tried when folding rational exponents, as in `8^(1/3)`.
const MAX_ROOT_INDEX: u32 = 16;

/// The largest number of bits a folded power may have.
const MAX_FOLDED_BITS: u32 = 1 << 16;

/// A number: either an exact rational, produced by integer literals and arithmetic on them, or
/// a floating-point approximation, produced by decimal literals.
///
/// Numbers compare **by value**, so `1/2` and `0.5` are equal. This type must never hold a
/// non-finite [`Float`]; every operation that could produce one returns [`None`] instead.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// An exact rational number, such as `3` or `1/2`.
    Rational(Rational),

    /// A floating-point number, such as `0.5`.
    Float(Float),
}

impl Number {
    /// Creates the integer `n`.
    pub fn int(n: i64) -> Self {
        Self::Rational(rational(n))
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Rational(r) => r.cmp0() == Ordering::Equal,
            Self::Float(f) => f.is_zero(),
        }
    }

    /// Returns true if the number is one.
    pub fn is_one(&self) -> bool {
        match self {
            Self::Rational(r) => *r == 1,
            Self::Float(f) => *f == 1,
        }
    }

    /// Returns true if the number is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Rational(r) => r.cmp0() == Ordering::Less,
            Self::Float(f) => f.cmp0() == Some(Ordering::Less),
        }
    }

    /// Returns the exact rational value, if the number is exact.
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Self::Rational(r) => Some(r),
            Self::Float(_) => None,
        }
    }

    /// Returns the integer value, if the number is an exact integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Rational(r) if *r.denom() == 1 => Some(r.numer()),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if the number is an exact integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_integer().and_then(Integer::to_i64)
    }

    /// Returns the value as an `f64`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Rational(r) => r.to_f64(),
            Self::Float(f) => f.to_f64(),
        }
    }

    /// Converts the number to a [`Float`].
    fn to_float(&self) -> Float {
        match self {
            Self::Rational(r) => float(r),
            Self::Float(f) => f.clone(),
        }
    }

    /// Wraps a [`Float`] result, rejecting non-finite values.
    fn finite(f: Float) -> Option<Self> {
        f.is_finite().then_some(Self::Float(f))
    }

    /// Adds two numbers. The result is exact only if both operands are exact.
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(Rational::from(a + b)),
            (a, b) => Self::Float(Float::with_val(PRECISION, &a.to_float() + &b.to_float())),
        }
    }

    /// Multiplies two numbers. The result is exact only if both operands are exact.
    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(Rational::from(a * b)),
            (a, b) => Self::Float(Float::with_val(PRECISION, &a.to_float() * &b.to_float())),
        }
    }

    /// Returns the negation of the number.
    pub fn neg(&self) -> Self {
        match self {
            Self::Rational(r) => Self::Rational(Rational::from(-r)),
            Self::Float(f) => Self::Float(Float::with_val(PRECISION, -f)),
        }
    }

    /// Returns the absolute value of the number.
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Returns `1 / self`, or [`None`] if the number is zero.
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(match self {
            Self::Rational(r) => Self::Rational(r.clone().recip()),
            Self::Float(f) => Self::Float(Float::with_val(PRECISION, f.recip_ref())),
        })
    }

    /// Raises the number to the given power, if the result is a finite number that can be
    /// represented reasonably.
    ///
    /// Exact bases with integer exponents give exact results. Exact bases with rational
    /// exponents give exact results only when the root is exact (`4^(1/2) = 2`), and are left
    /// alone otherwise. Anything involving a float is computed approximately.
    pub fn pow(&self, exponent: &Self) -> Option<Self> {
        match (self, exponent) {
            (Self::Rational(base), Self::Rational(exp)) => {
                let (numer, denom) = (exp.numer().to_i32()?, exp.denom().to_u32()?);
                if numer.abs() > MAX_FOLDED_EXPONENT || denom > MAX_ROOT_INDEX {
                    return None;
                }
                let root = if denom == 1 {
                    base.clone()
                } else {
                    exact_root(base, denom)?
                };
                pow_rational(root, numer).map(Self::Rational)
            },
            (base, exp) => {
                if base.is_zero() && !(exp.is_negative() || exp.is_zero()) {
                    return Some(Self::Float(float(0)));
                }
                if base.is_zero() {
                    return None;
                }
                let result = Float::with_val(PRECISION, base.to_float().pow(&exp.to_float()));
                Self::finite(result)
            },
        }
    }
}

/// Raises an exact rational to an integer power, refusing to divide by zero or to build
/// enormous results.
fn pow_rational(base: Rational, exp: i32) -> Option<Rational> {
    if base.cmp0() == Ordering::Equal && exp < 0 {
        return None;
    }
    let bits = base.numer().significant_bits().max(base.denom().significant_bits());
    if bits.saturating_mul(exp.unsigned_abs()) > MAX_FOLDED_BITS {
        return None;
    }
    Some(base.pow(exp))
}

/// Returns the exact `n`th root of a non-negative rational, if there is one.
fn exact_root(value: &Rational, n: u32) -> Option<Rational> {
    if value.cmp0() == Ordering::Less {
        return None;
    }
    let root_of = |i: &Integer| -> Option<Integer> {
        let root = i.clone().root(n);
        (root.clone().pow(n) == *i).then_some(root)
    };
    let numer = root_of(value.numer())?;
    let denom = root_of(value.denom())?;
    Some(Rational::from((numer, denom)))
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Rational(Rational::from(n))
    }
}

impl From<Rational> for Number {
    fn from(n: Rational) -> Self {
        Self::Rational(n)
    }
}

/// Numbers compare by value, regardless of whether they are exact.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Rational(r), Self::Float(f)) | (Self::Float(f), Self::Rational(r)) => f == r,
        }
    }
}

impl Eq for Number {}

/// Floats are hashed through their exact rational value, so that a float and a rational that
/// compare equal also hash equally.
impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Rational(r) => r.hash(state),
            Self::Float(f) => match f.to_rational() {
                Some(r) => r.hash(state),
                None => f.to_f64().to_bits().hash(state),
            },
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let ordering = match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Rational(a), Self::Float(b)) => b.partial_cmp(a).map(Ordering::reverse),
            (Self::Float(a), Self::Rational(b)) => a.partial_cmp(b),
        };
        ordering.unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(r) if *r.denom() == 1 => write!(f, "{}", r.numer()),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Float(value) => {
                let approx = value.to_f64();
                let text = if approx.is_finite() && (approx != 0.0 || value.is_zero()) {
                    approx.to_string()
                } else {
                    // outside the range of `f64`
                    exponent_form(value)
                };
                if text.contains(['.', 'e', 'i', 'N']) {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            },
        }
    }
}

/// Formats a float as `<mantissa>e<exponent>` with up to 17 significant digits.
fn exponent_form(value: &Float) -> String {
    let text = value.to_string_radix(10, Some(17));
    match text.split_once('e') {
        Some((mantissa, exp)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{}e{}", mantissa, exp)
        },
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn ratio(n: i64, d: i64) -> Number {
        Number::Rational(rational((n, d)))
    }

    #[test]
    fn exact_arithmetic() {
        assert_eq!(ratio(1, 2).add(&ratio(1, 3)), ratio(5, 6));
        assert_eq!(ratio(2, 3).mul(&Number::int(3)), Number::int(2));
        assert_eq!(Number::int(4).recip(), Some(ratio(1, 4)));
        assert_eq!(Number::int(0).recip(), None);
    }

    #[test]
    fn mixed_equality() {
        let half = Number::Float(float(0.5));
        assert_eq!(half, ratio(1, 2));
        assert!(half.add(&ratio(1, 2)).is_one());
    }

    #[test]
    fn powers() {
        assert_eq!(Number::int(2).pow(&Number::int(10)), Some(Number::int(1024)));
        assert_eq!(Number::int(2).pow(&Number::int(-1)), Some(ratio(1, 2)));
        assert_eq!(Number::int(4).pow(&ratio(1, 2)), Some(Number::int(2)));
        assert_eq!(ratio(8, 27).pow(&ratio(2, 3)), Some(ratio(4, 9)));
        assert_eq!(Number::int(2).pow(&ratio(1, 2)), None);
        assert_eq!(Number::int(0).pow(&Number::int(-1)), None);
        assert_eq!(Number::int(-4).pow(&ratio(1, 2)), None);
    }

    #[test]
    fn display() {
        assert_eq!(Number::int(-3).to_string(), "-3");
        assert_eq!(ratio(3, 4).to_string(), "3/4");
        assert_eq!(Number::Float(float(2.5)).to_string(), "2.5");
        assert_eq!(Number::Float(float(2)).to_string(), "2.0");
    }

    #[test]
    fn display_beyond_f64() {
        let huge = Float::with_val(PRECISION, Float::u_pow_u(10, 400));
        assert_eq!(Number::Float(huge.clone()).to_string(), "1e400");
        assert_eq!(Number::Float(-huge.clone()).to_string(), "-1e400");
        assert_eq!(Number::Float(huge.recip()).to_string(), "1e-400");
        assert_eq!(Number::Float(float(0)).to_string(), "0.0");
    }

    #[test]
    fn ordering() {
        assert!(ratio(1, 3) < Number::Float(float(0.5)));
        assert!(Number::int(-1) < Number::int(0));
    }
}
