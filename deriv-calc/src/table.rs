//! The reference table of elementary derivatives.

use deriv_compute::symbolic::{differentiate, Expr};
use deriv_parser::Function;
use log::warn;
use once_cell::sync::Lazy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A row of the reference table: a function of `x` and its derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceRow {
    /// The function, such as `sin(x)`.
    pub function: String,

    /// Its derivative with respect to `x`, such as `cos(x)`.
    pub derivative: String,
}

/// Differentiates `expr` with respect to `x` to build a row.
fn row(expr: Expr) -> Option<ReferenceRow> {
    match differentiate(&expr, "x", 1) {
        Ok(derivative) => Some(ReferenceRow {
            function: expr.to_string(),
            derivative: derivative.to_string(),
        }),
        Err(err) => {
            warn!("no reference row for {}: {}", expr, err);
            None
        },
    }
}

static REFERENCE_TABLE: Lazy<Vec<ReferenceRow>> = Lazy::new(|| {
    let x = || Expr::symbol("x");
    let powers = [
        Expr::power(x(), Expr::symbol("n")),
        Expr::power(Expr::symbol("a"), x()),
    ];
    let functions = Function::ALL.iter().map(|&function| Expr::call(function, x()));
    powers.into_iter().chain(functions).filter_map(row).collect()
});

/// Returns the table of elementary derivatives: `x^n`, `a^x`, and every known function applied
/// to `x`.
///
/// The table is generated by the differentiator itself, the first time it is requested.
pub fn reference_table() -> &'static [ReferenceRow] {
    &REFERENCE_TABLE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn lookup(function: &str) -> &'static str {
        reference_table()
            .iter()
            .find(|row| row.function == function)
            .map(|row| row.derivative.as_str())
            .unwrap()
    }

    #[test]
    fn every_function_has_a_row() {
        assert_eq!(reference_table().len(), Function::ALL.len() + 2);
        assert_eq!(reference_table()[0].function, "x^n");
        assert_eq!(reference_table()[1].function, "a^x");
    }

    #[test]
    fn known_rows() {
        assert_eq!(lookup("x^n"), "n*x^(n - 1)");
        assert_eq!(lookup("a^x"), "a^x*ln(a)");
        assert_eq!(lookup("sin(x)"), "cos(x)");
        assert_eq!(lookup("cos(x)"), "-sin(x)");
        assert_eq!(lookup("tan(x)"), "sec(x)^2");
        assert_eq!(lookup("exp(x)"), "exp(x)");
        assert_eq!(lookup("ln(x)"), "1/x");
        assert_eq!(lookup("sinh(x)"), "cosh(x)");
        assert_eq!(lookup("sqrt(x)"), "1/(2*sqrt(x))");
    }
}
