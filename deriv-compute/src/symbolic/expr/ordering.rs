//! The canonical order of terms and factors.
//!
//! Sums and products are compared as multisets, but are still stored as lists, and the
//! simplifier sorts them so that equal expressions are also printed the same way. Products put
//! their numeric coefficient first and then order factors by base; sums put higher-degree terms
//! first and constants last, so that `3 + x^2 + x` is written `x^2 + x + 3`.

use std::cmp::Ordering;
use super::Expr;

/// Returns the position of each kind of expression in the canonical order.
fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(_) => 0,
        Expr::Symbol(_) => 1,
        Expr::Call(_, _) => 2,
        Expr::Power(_, _) => 3,
        Expr::Product(_) => 4,
        Expr::Sum(_) => 5,
    }
}

/// A total order over expressions that agrees with strict equality: two expressions compare
/// [`Ordering::Equal`] exactly when they are strictly equal.
pub fn canonical_cmp(a: &Expr, b: &Expr) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Expr::Number(a), Expr::Number(b)) => a.cmp(b),
        (Expr::Symbol(a), Expr::Symbol(b)) => a.cmp(b),
        (Expr::Call(a_callee, a_args), Expr::Call(b_callee, b_args)) => a_callee.name()
            .cmp(b_callee.name())
            .then_with(|| cmp_lists(a_args.iter(), b_args.iter())),
        (Expr::Power(a_base, a_exp), Expr::Power(b_base, b_exp)) => canonical_cmp(a_base, b_base)
            .then_with(|| canonical_cmp(a_exp, b_exp)),
        (Expr::Sum(a), Expr::Sum(b)) | (Expr::Product(a), Expr::Product(b)) => {
            cmp_lists(sorted(a).into_iter(), sorted(b).into_iter())
        },
        _ => Ordering::Equal,
    })
}

/// Compares two lists of expressions lexicographically.
fn cmp_lists<'a>(
    mut a: impl Iterator<Item = &'a Expr>,
    mut b: impl Iterator<Item = &'a Expr>,
) -> Ordering {
    loop {
        match (a.next(), b.next()) {
            (Some(a), Some(b)) => match canonical_cmp(a, b) {
                Ordering::Equal => continue,
                ordering => return ordering,
            },
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

/// Returns the children in canonical order, without modifying the list.
fn sorted(children: &[Expr]) -> Vec<&Expr> {
    let mut refs = children.iter().collect::<Vec<_>>();
    refs.sort_by(|a, b| canonical_cmp(a, b));
    refs
}

/// Splits a factor into its base and exponent, treating a factor that is not a power as being
/// raised to the first power.
pub(crate) fn base_and_exponent(factor: &Expr) -> (&Expr, Option<&Expr>) {
    match factor {
        Expr::Power(base, exp) => (base, Some(exp)),
        factor => (factor, None),
    }
}

/// Compares two factors of a product, by base and then by exponent.
fn factor_cmp(a: &Expr, b: &Expr) -> Ordering {
    let (a_base, a_exp) = base_and_exponent(a);
    let (b_base, b_exp) = base_and_exponent(b);
    let one = Expr::one();
    canonical_cmp(a_base, b_base)
        .then_with(|| canonical_cmp(a_exp.unwrap_or(&one), b_exp.unwrap_or(&one)))
}

/// Sorts the factors of a product into canonical order.
pub fn sort_factors(factors: &mut [Expr]) {
    factors.sort_by(factor_cmp);
}

/// Returns the total degree of a term in all of its symbols, counting only numeric exponents.
pub fn degree(term: &Expr) -> f64 {
    match term {
        Expr::Symbol(_) => 1.0,
        Expr::Power(base, exp) => match (&**base, exp.as_number()) {
            (Expr::Symbol(_), Some(exp)) => exp.to_f64(),
            _ => 0.0,
        },
        Expr::Product(factors) => factors.iter().map(degree).sum(),
        _ => 0.0,
    }
}

/// Splits a term into its numeric coefficient and the remaining factors.
pub(crate) fn coefficient_and_rest(term: &Expr) -> (Option<&Expr>, Vec<&Expr>) {
    match term {
        Expr::Number(_) => (Some(term), Vec::new()),
        Expr::Product(factors) => match factors.first() {
            Some(first @ Expr::Number(_)) => (Some(first), factors[1..].iter().collect()),
            _ => (None, factors.iter().collect()),
        },
        term => (None, vec![term]),
    }
}

/// Compares two terms of a sum.
fn term_cmp(a: &Expr, b: &Expr) -> Ordering {
    match (a.is_number(), b.is_number()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {},
    }

    let (a_coeff, a_rest) = coefficient_and_rest(a);
    let (b_coeff, b_rest) = coefficient_and_rest(b);
    degree(b).partial_cmp(&degree(a)).unwrap_or(Ordering::Equal)
        .then_with(|| cmp_lists(a_rest.into_iter(), b_rest.into_iter()))
        .then_with(|| match (a_coeff, b_coeff) {
            (Some(a), Some(b)) => canonical_cmp(a, b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Sorts the terms of a sum into canonical order.
pub fn sort_terms(terms: &mut [Expr]) {
    terms.sort_by(term_cmp);
}
