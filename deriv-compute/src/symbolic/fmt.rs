//! LaTeX output for expressions.

use deriv_parser::Function;
use std::fmt::{Display, Formatter, Result};
use super::{
    expr::{needs_parens_as_base, needs_parens_as_factor, negated_term, Callee, Expr, Fraction},
    number::Number,
};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_latex(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

impl Latex for Number {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self.as_rational() {
            Some(ratio) if *ratio.denom() != 1 => {
                if self.is_negative() {
                    write!(f, "-")?;
                }
                write!(f, "\\frac{{{}}}{{{}}}", ratio.numer().clone().abs(), ratio.denom())
            },
            _ => write!(f, "{}", self),
        }
    }
}

/// Returns the LaTeX command for a known function, if it has one.
fn command(function: Function) -> Option<&'static str> {
    Some(match function {
        Function::Sin => "\\sin",
        Function::Cos => "\\cos",
        Function::Tan => "\\tan",
        Function::Cot => "\\cot",
        Function::Sec => "\\sec",
        Function::Csc => "\\csc",
        Function::Exp => "\\exp",
        Function::Log => "\\log",
        Function::Ln => "\\ln",
        Function::Asin => "\\arcsin",
        Function::Acos => "\\arccos",
        Function::Atan => "\\arctan",
        Function::Sinh => "\\sinh",
        Function::Cosh => "\\cosh",
        Function::Tanh => "\\tanh",
        Function::Coth => "\\coth",
        Function::Acot | Function::Sqrt => return None,
    })
}

/// Writes the expression wrapped in `\left(` and `\right)` if `parens` is true.
fn fmt_wrapped(f: &mut Formatter, expr: &Expr, parens: bool) -> Result {
    if parens {
        write!(f, "\\left(")?;
        expr.fmt_latex(f)?;
        write!(f, "\\right)")
    } else {
        expr.fmt_latex(f)
    }
}

/// Writes factors separated by `\cdot`.
fn fmt_factors(f: &mut Formatter, factors: &[Expr]) -> Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            write!(f, " \\cdot ")?;
        }
        fmt_wrapped(f, factor, needs_parens_as_factor(factor))?;
    }
    Ok(())
}

/// Writes a fraction with `\frac`, or as a plain product if it has no denominator.
fn fmt_fraction(f: &mut Formatter, fraction: &Fraction) -> Result {
    if fraction.negative {
        write!(f, "-")?;
    }
    if fraction.denom.is_empty() {
        return if fraction.numer.is_empty() {
            write!(f, "1")
        } else {
            fmt_factors(f, &fraction.numer)
        };
    }

    write!(f, "\\frac{{")?;
    if fraction.numer.is_empty() {
        write!(f, "1")?;
    } else {
        fmt_factors(f, &fraction.numer)?;
    }
    write!(f, "}}{{")?;
    fmt_factors(f, &fraction.denom)?;
    write!(f, "}}")
}

impl Latex for Expr {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Number(num) => num.fmt_latex(f),
            Self::Symbol(name) if name.chars().count() == 1 => write!(f, "{}", name),
            Self::Symbol(name) => write!(f, "\\mathrm{{{}}}", name),
            Self::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, negated_term(term)) {
                        (0, _) => term.fmt_latex(f)?,
                        (_, Some(positive)) => {
                            write!(f, " - ")?;
                            positive.fmt_latex(f)?;
                        },
                        (_, None) => {
                            write!(f, " + ")?;
                            term.fmt_latex(f)?;
                        },
                    }
                }
                Ok(())
            },
            Self::Product(factors) => fmt_fraction(f, &Fraction::split(factors)),
            Self::Power(base, exp) => {
                if exp.as_number().map_or(false, Number::is_negative) {
                    return fmt_fraction(f, &Fraction::split(std::slice::from_ref(self)));
                }
                if *exp == Expr::one().sqrt() {
                    write!(f, "\\sqrt{{")?;
                    base.fmt_latex(f)?;
                    return write!(f, "}}");
                }
                fmt_wrapped(f, base, needs_parens_as_base(base))?;
                write!(f, "^{{")?;
                exp.fmt_latex(f)?;
                write!(f, "}}")
            },
            Self::Call(callee, args) => {
                match callee {
                    Callee::Known(Function::Sqrt) => {
                        write!(f, "\\sqrt{{")?;
                        for arg in args {
                            arg.fmt_latex(f)?;
                        }
                        return write!(f, "}}");
                    },
                    Callee::Known(function) => match command(*function) {
                        Some(command) => write!(f, "{}", command)?,
                        None => write!(f, "\\operatorname{{{}}}", function.name())?,
                    },
                    Callee::Unknown(name) => write!(f, "\\mathrm{{{}}}", name)?,
                }
                write!(f, "\\left(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.fmt_latex(f)?;
                }
                write!(f, "\\right)")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::super::{parse, simplify};

    fn latex(input: &str) -> String {
        parse(input).unwrap().as_latex().to_string()
    }

    #[test]
    fn fractions() {
        assert_eq!(latex("1/x + 5/x^2"), "\\frac{1}{x} + \\frac{5}{x^{2}}");
        assert_eq!(latex("-x/2"), "-\\frac{x}{2}");
    }

    #[test]
    fn functions() {
        assert_eq!(latex("sin(x)^2"), "\\sin\\left(x\\right)^{2}");
        assert_eq!(latex("acot(x)"), "\\operatorname{acot}\\left(x\\right)");
        assert_eq!(latex("sqrt(x + 1)"), "\\sqrt{x + 1}");
        assert_eq!(latex("f(x, y)"), "\\mathrm{f}\\left(x, y\\right)");
    }

    #[test]
    fn products() {
        assert_eq!(latex("2*x*(y + 1)"), "2 \\cdot x \\cdot \\left(y + 1\\right)");
        let root = simplify(&parse("x^(1/2)").unwrap());
        assert_eq!(root.as_latex().to_string(), "\\sqrt{x}");
    }
}
