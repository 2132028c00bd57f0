use std::fmt;
use super::{Callee, Expr};
use crate::symbolic::number::Number;

/// A product split into the factors written above and below a fraction bar.
///
/// A rational coefficient contributes its numerator and denominator separately, and every
/// factor raised to a negative number moves below the bar with the sign of its exponent flipped,
/// so that `(-1/2) * x * y^-2` is written `-x/(2*y^2)`.
pub(crate) struct Fraction {
    /// Whether the product has a negative coefficient.
    pub negative: bool,

    /// The factors above the fraction bar. Empty if the numerator is `1`.
    pub numer: Vec<Expr>,

    /// The factors below the fraction bar. Empty if there is no denominator.
    pub denom: Vec<Expr>,
}

impl Fraction {
    /// Splits the given factors of a product.
    pub fn split(factors: &[Expr]) -> Self {
        let mut fraction = Self { negative: false, numer: Vec::new(), denom: Vec::new() };
        for (i, factor) in factors.iter().enumerate() {
            match factor {
                Expr::Number(num) if i == 0 => {
                    fraction.negative = num.is_negative();
                    let num = num.abs();
                    match num.as_rational() {
                        Some(ratio) if *ratio.denom() != 1 => {
                            if *ratio.numer() != 1 {
                                fraction.numer.push(Expr::Number(Number::from(ratio.numer().clone())));
                            }
                            fraction.denom.push(Expr::Number(Number::from(ratio.denom().clone())));
                        },
                        _ if num.is_one() => {},
                        _ => fraction.numer.push(Expr::Number(num)),
                    }
                },
                Expr::Power(base, exp) if exp.as_number().map_or(false, Number::is_negative) => {
                    fraction.denom.push(Expr::power((**base).clone(), -(**exp).clone()));
                },
                factor => fraction.numer.push(factor.clone()),
            }
        }
        fraction
    }
}

/// If the term would be written with a leading minus sign, returns the term without it.
pub(crate) fn negated_term(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Number(num) if num.is_negative() => Some(Expr::Number(num.neg())),
        Expr::Product(factors) => match factors.first() {
            Some(Expr::Number(num)) if num.is_negative() => Some(Expr::product(
                std::iter::once(Expr::Number(num.neg()))
                    .filter(|coeff| !coeff.is_one())
                    .chain(factors[1..].iter().cloned()),
            )),
            _ => None,
        },
        _ => None,
    }
}

/// Returns true if the expression needs parentheses when used as a factor of a product.
pub(crate) fn needs_parens_as_factor(expr: &Expr) -> bool {
    match expr {
        Expr::Sum(_) => true,
        Expr::Number(num) => num.is_negative(),
        _ => false,
    }
}

/// Returns true if the expression needs parentheses when used as the base of a power.
pub(crate) fn needs_parens_as_base(expr: &Expr) -> bool {
    match expr {
        Expr::Sum(_) | Expr::Product(_) | Expr::Power(_, _) => true,
        Expr::Number(num) => num.is_negative() || num.as_rational().map_or(false, |r| *r.denom() != 1),
        Expr::Symbol(_) | Expr::Call(_, _) => false,
    }
}

/// Returns true if the expression needs parentheses when used as an exponent.
fn needs_parens_as_exponent(expr: &Expr) -> bool {
    match expr {
        Expr::Number(num) => num.is_negative() || num.as_rational().map_or(false, |r| *r.denom() != 1),
        Expr::Symbol(_) | Expr::Call(_, _) => false,
        _ => true,
    }
}

/// Writes the expression, wrapped in parentheses if `parens` is true.
fn write_wrapped(f: &mut fmt::Formatter, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Writes factors separated by `*`.
fn write_factors(f: &mut fmt::Formatter, factors: &[Expr]) -> fmt::Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            write!(f, "*")?;
        }
        write_wrapped(f, factor, needs_parens_as_factor(factor))?;
    }
    Ok(())
}

/// Writes a fraction as `numer/denom`, wrapping the denominator in parentheses unless it is a
/// single atom or power.
fn write_fraction(f: &mut fmt::Formatter, fraction: &Fraction) -> fmt::Result {
    if fraction.negative {
        write!(f, "-")?;
    }
    if fraction.numer.is_empty() {
        write!(f, "1")?;
    } else {
        write_factors(f, &fraction.numer)?;
    }

    match fraction.denom.as_slice() {
        [] => Ok(()),
        [single @ (Expr::Sum(_) | Expr::Product(_))] => write!(f, "/({})", single),
        [single] => write!(f, "/{}", single),
        denom => {
            write!(f, "/(")?;
            write_factors(f, denom)?;
            write!(f, ")")
        },
    }
}

impl fmt::Display for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{}", num),
            Self::Symbol(name) => f.write_str(name),
            Self::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, negated_term(term)) {
                        (0, _) => write!(f, "{}", term)?,
                        (_, Some(positive)) => write!(f, " - {}", positive)?,
                        (_, None) => write!(f, " + {}", term)?,
                    }
                }
                Ok(())
            },
            Self::Product(factors) => write_fraction(f, &Fraction::split(factors)),
            Self::Power(base, exp) => {
                if exp.as_number().map_or(false, Number::is_negative) {
                    return write_fraction(f, &Fraction::split(std::slice::from_ref(self)));
                }
                write_wrapped(f, base, needs_parens_as_base(base))?;
                write!(f, "^")?;
                write_wrapped(f, exp, needs_parens_as_exponent(exp))
            },
            Self::Call(callee, args) => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::super::super::parse;

    fn display(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn subtraction() {
        assert_eq!(display("x - 1"), "x - 1");
        assert_eq!(display("x - 2*y"), "x - 2*y");
        assert_eq!(display("-x + y"), "-x + y");
    }

    #[test]
    fn fractions() {
        assert_eq!(display("1/x"), "1/x");
        assert_eq!(display("x/(y*z)"), "x/(y*z)");
        assert_eq!(display("1/(x + 1)"), "1/(x + 1)");
        assert_eq!(display("x^-2"), "1/x^2");
    }

    #[test]
    fn powers() {
        assert_eq!(display("(x + 1)^2"), "(x + 1)^2");
        assert_eq!(display("x^(y + 1)"), "x^(y + 1)");
        assert_eq!(display("(x^2)^3"), "(x^2)^3");
        assert_eq!(display("sin(x)^2"), "sin(x)^2");
    }

    #[test]
    fn calls() {
        assert_eq!(display("f(x, 2.5)"), "f(x, 2.5)");
        assert_eq!(display("exp(x)*(cos(x) + sin(x))"), "exp(x)*(cos(x) + sin(x))");
    }
}
