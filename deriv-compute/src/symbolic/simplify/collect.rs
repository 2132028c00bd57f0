//! The fifth pass: collecting like powers of the primary variable.
//!
//! Terms of a sum that hold the same power of the primary variable are grouped together, and the
//! sum is reordered by that power, highest first, with terms free of the variable last:
//!
//! ```text
//! a*x^2 + c + b*x^2 + x  ->  x^2*(a + b) + x + c
//! ```
//!
//! This pass is cosmetic. Its output is not renormalized, since normalization would distribute
//! the grouped terms back out of order.

use crate::symbolic::{expr::Expr, number::Number};
use super::{
    normalize::{split_factors, with_coefficient},
    trigonometry::is_reduced,
};

/// Collects every sum in the given expression by powers of `var`.
pub fn collect(expr: &Expr, var: &str) -> Expr {
    match expr {
        Expr::Sum(terms) => collect_sum(terms.iter().map(|term| collect(term, var)).collect(), var),
        expr => expr.clone().map_children(|child| collect(&child, var)),
    }
}

/// Returns the position of the factor `var` or `var^k` in the list of factors, along with `k`.
fn power_of(factors: &[Expr], var: &str) -> Option<(usize, Number)> {
    factors.iter().enumerate().find_map(|(i, factor)| match factor {
        Expr::Symbol(name) if name == var => Some((i, Number::int(1))),
        Expr::Power(base, exp) if base.as_symbol() == Some(var) => {
            exp.as_number().map(|k| (i, k.clone()))
        },
        _ => None,
    })
}

/// Divides a term by the power of the variable found at `position`.
fn without_factor(coeff: Number, mut factors: Vec<Expr>, position: usize) -> Expr {
    factors.remove(position);
    with_coefficient(coeff, Expr::product(factors))
}

fn collect_sum(terms: Vec<Expr>, var: &str) -> Expr {
    // each group holds the terms with one power of `var`, and those terms divided by it
    let mut groups: Vec<(Number, Vec<Expr>, Vec<Expr>)> = Vec::new();
    let mut free = Vec::new();

    for term in terms {
        let (coeff, factors) = split_factors(&term);
        let Some((position, k)) = power_of(&factors, var) else {
            free.push(term);
            continue;
        };

        let rest = without_factor(coeff, factors, position);
        match groups.iter_mut().find(|(power, _, _)| *power == k) {
            Some((_, members, rests)) => {
                members.push(term);
                rests.push(rest);
            },
            None => groups.push((k, vec![term], vec![rest])),
        }
    }

    groups.sort_by(|(a, _, _), (b, _, _)| b.cmp(a));
    let mut output = Vec::new();
    for (k, members, rests) in groups {
        let inner = Expr::sum(rests);
        // a group whose terms would form an identity is left spread out
        if members.len() == 1 || !is_reduced(&inner) {
            output.extend(members);
        } else {
            let power = Expr::power(Expr::symbol(var), Expr::Number(k));
            output.push(Expr::Product(vec![power, inner]));
        }
    }
    output.extend(free);
    Expr::sum(output)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::{parse, simplify::normalize::normalize};

    fn collected(input: &str, var: &str) -> String {
        collect(&normalize(&parse(input).unwrap()), var).to_string()
    }

    #[test]
    fn groups() {
        assert_eq!(collected("a*x + b*x + y^3", "x"), "x*(a + b) + y^3");
        assert_eq!(collected("a*x^2 + b*x^2 + c*x + d", "x"), "x^2*(a + b) + c*x + d");
        assert_eq!(collected("a*x - b*x", "x"), "x*(a - b)");
    }

    #[test]
    fn order_by_power() {
        assert_eq!(collected("y + x^2*y + x*y", "x"), "x^2*y + x*y + y");
        assert_eq!(collected("y^3 + x", "x"), "x + y^3");
        assert_eq!(collected("(x + y)^3", "x"), "(x + y)^3");
    }

    #[test]
    fn other_variable() {
        assert_eq!(collected("a*t + b*t + x", "t"), "t*(a + b) + x");
        assert_eq!(collected("a*t + b*t + x", "x"), "x + a*t + b*t");
    }

    #[test]
    fn identities_stay_spread_out() {
        let expr = normalize(&parse("x*sin(y)^2 + x*cos(y)^2 + x^2").unwrap());
        assert_eq!(collect(&expr, "x"), expr);
    }

    #[test]
    fn nested() {
        assert_eq!(collected("sin(a*x + b*x)", "x"), "sin(x*(a + b))");
    }
}
