//! The fourth pass: factoring sums.
//!
//! For every sum, bottom-up, except those inside function arguments or under a fractional or
//! symbolic power:
//!
//! 1. The numeric content is pulled out: `2*x + 4 = 2*(x + 2)`. If every term is negative, so is
//!    the content: `-x - 1 = -(x + 1)`.
//! 2. Factors common to every term are pulled out, with the smallest exponent that appears:
//!    `x^3 + x^2*y = x^2*(x + y)`.
//! 3. What remains, if it is a polynomial in the primary variable with rational coefficients
//!    and a degree between 2 and [`SimplifyOptions::max_factor_degree`], is split into linear
//!    factors at its rational roots: `x^2 + 3*x + 2 = (x + 1)*(x + 2)`.

use log::trace;
use rug::{Integer, Rational};
use std::cmp::Ordering;
use crate::symbolic::{
    expr::{base_and_exponent, Expr},
    number::Number,
};
use super::{
    normalize::{
        normalize_power,
        normalize_product,
        normalize_sum,
        split_coefficient,
        split_factors,
    },
    trigonometry::is_reduced,
    SimplifyOptions,
};

/// The largest constant or leading coefficient whose divisors are tried as rational roots.
const MAX_ROOT_SEARCH: u32 = 1_000_000;

/// Factors every sum in the given normalized expression, bottom-up.
///
/// A node whose factored form would hold a sum or product that a trigonometric identity applies
/// to, such as `cos(x)*(sin(x)^2 + cos(x)^2)`, is left as it is.
pub fn factor(expr: &Expr, options: &SimplifyOptions) -> Expr {
    let factored = match expr {
        Expr::Number(_) | Expr::Symbol(_) => return expr.clone(),
        Expr::Sum(terms) => {
            let node = normalize_sum(terms.iter().map(|term| factor(term, options)).collect());
            match &node {
                Expr::Sum(terms) => factor_sum(terms, options).unwrap_or(node),
                _ => node,
            }
        },
        Expr::Product(factors) => {
            normalize_product(factors.iter().map(|f| factor(f, options)).collect())
        },
        // only bases raised to an integer power are factored, where factors can cancel
        Expr::Power(base, exp) if exp.as_integer().is_some() => {
            normalize_power(factor(base, options), (**exp).clone())
        },
        Expr::Power(_, _) | Expr::Call(_, _) => return expr.clone(),
    };

    if !is_reduced(&factored) && is_reduced(expr) {
        trace!("not factoring {}, it would become {}", expr, factored);
        return expr.clone();
    }
    factored
}

/// Returns `gcd(numerators) / lcm(denominators)` of the non-zero values, or one if there are
/// none.
fn rational_content<'a>(values: impl IntoIterator<Item = &'a Rational>) -> Rational {
    let (numer, denom) = values.into_iter()
        .filter(|value| value.cmp0() != Ordering::Equal)
        .fold((Integer::new(), Integer::from(1)), |(numer, denom), value| {
            (numer.gcd(value.numer()), denom.lcm(value.denom()))
        });
    if numer == 0 {
        Rational::from(1)
    } else {
        Rational::from((numer, denom))
    }
}

/// Returns the numeric content of the given term coefficients, negated if every coefficient is
/// negative. Returns one if any coefficient is not exact.
fn numeric_content(coeffs: &[Number]) -> Number {
    let Some(exact) = coeffs.iter().map(Number::as_rational).collect::<Option<Vec<_>>>() else {
        return Number::int(1);
    };
    let content = rational_content(exact.iter().copied());
    if exact.iter().all(|coeff| coeff.cmp0() == Ordering::Less) {
        Number::from(-content)
    } else {
        Number::from(content)
    }
}

/// Returns the smaller of two exponents, or the exponent itself if both are the same.
fn min_exponent(a: &Expr, b: &Expr) -> Option<Expr> {
    if a == b {
        return Some(a.clone());
    }
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => Some(Expr::Number(a.min(b).clone())),
        _ => None,
    }
}

/// Returns the bases that appear in every one of the given lists of factors, along with the
/// smallest exponent each is raised to.
fn common_factors(terms: &[Vec<Expr>]) -> Vec<(Expr, Expr)> {
    let Some((first, rest)) = terms.split_first() else {
        return Vec::new();
    };

    first.iter()
        .filter_map(|factor| {
            let (base, exp) = base_and_exponent(factor);
            let mut shared = exp.cloned().unwrap_or_else(Expr::one);
            for term in rest {
                let other = term.iter().find_map(|other| {
                    let (other_base, other_exp) = base_and_exponent(other);
                    (other_base == base).then(|| other_exp.cloned().unwrap_or_else(Expr::one))
                })?;
                shared = min_exponent(&shared, &other)?;
            }
            Some((base.clone(), shared))
        })
        .collect()
}

/// Factors a single normalized sum, returning [`None`] if nothing could be pulled out.
fn factor_sum(terms: &[Expr], options: &SimplifyOptions) -> Option<Expr> {
    let (coeffs, factor_lists): (Vec<_>, Vec<_>) = terms.iter().map(split_factors).unzip();
    let content = numeric_content(&coeffs);
    let common = common_factors(&factor_lists);

    let mut divisor = vec![Expr::Number(content.recip()?)];
    divisor.extend(common.iter().map(|(base, exp)| {
        normalize_power(base.clone(), normalize_product(vec![Expr::int(-1), exp.clone()]))
    }));
    let inner = normalize_sum(
        terms.iter()
            .map(|term| {
                normalize_product(std::iter::once(term.clone()).chain(divisor.iter().cloned()).collect())
            })
            .collect(),
    );

    let split = split_polynomial(&inner, &options.primary_variable, options.max_factor_degree);
    if content.is_one() && common.is_empty() && split.is_none() {
        return None;
    }

    let mut factors = vec![Expr::Number(content)];
    factors.extend(common.into_iter().map(|(base, exp)| normalize_power(base, exp)));
    match split {
        Some(split) => factors.extend(split),
        None => factors.push(inner),
    }
    let factored = normalize_product(factors);
    trace!("factored: {}", factored);
    Some(factored)
}

/// Returns the degree of `rest` in `var`, if it is `1`, `var`, or `var` raised to a
/// non-negative integer power.
fn degree_in(rest: &Expr, var: &str) -> Option<usize> {
    match rest {
        Expr::Symbol(name) if name == var => Some(1),
        Expr::Power(base, exp) if base.as_symbol() == Some(var) => {
            exp.as_number()?.to_i64().and_then(|k| usize::try_from(k).ok())
        },
        rest if rest.is_one() => Some(0),
        _ => None,
    }
}

/// Evaluates the polynomial with the given coefficients, lowest degree first.
fn evaluate(coeffs: &[Rational], at: &Rational) -> Rational {
    coeffs.iter()
        .rev()
        .fold(Rational::new(), |acc, coeff| acc * at + coeff)
}

/// Returns the positive divisors of `n`.
fn divisors(n: u32) -> Vec<u32> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d * d != n {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// Finds a rational root of the polynomial with the given coefficients, lowest degree first,
/// using the rational root theorem.
fn rational_root(coeffs: &[Rational]) -> Option<Rational> {
    let scale = Rational::from(
        coeffs.iter().fold(Integer::from(1), |acc, coeff| acc.lcm(coeff.denom())),
    );
    let integer = |coeff: &Rational| (coeff.clone() * &scale).into_numer_denom().0;

    let constant = integer(coeffs.first()?).abs();
    if constant == 0 {
        return Some(Rational::new());
    }
    let leading = integer(coeffs.last()?).abs();
    let (constant, leading) = (constant.to_u32()?, leading.to_u32()?);
    if constant > MAX_ROOT_SEARCH || leading > MAX_ROOT_SEARCH {
        return None;
    }

    for p in divisors(constant) {
        for q in divisors(leading) {
            for candidate in [Rational::from((p, q)), -Rational::from((p, q))] {
                if evaluate(coeffs, &candidate).cmp0() == Ordering::Equal {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// Divides the polynomial by `(x - root)`, where `root` is a root of it.
fn divide_by_root(coeffs: &[Rational], root: &Rational) -> Vec<Rational> {
    let degree = coeffs.len() - 1;
    let mut quotient = vec![Rational::new(); degree];
    quotient[degree - 1] = coeffs[degree].clone();
    for k in (1..degree).rev() {
        quotient[k - 1] = coeffs[k].clone() + Rational::from(root * &quotient[k]);
    }
    quotient
}

/// Builds the expression of the polynomial with the given coefficients in `var`.
fn polynomial(coeffs: Vec<Rational>, var: &str) -> Expr {
    normalize_sum(
        coeffs.into_iter()
            .enumerate()
            .filter(|(_, coeff)| coeff.cmp0() != Ordering::Equal)
            .map(|(k, coeff)| {
                normalize_product(vec![
                    Expr::Number(Number::from(coeff)),
                    normalize_power(Expr::symbol(var), Expr::int(k as i64)),
                ])
            })
            .collect(),
    )
}

/// Splits a polynomial in `var` into linear factors at its rational roots. The last factor
/// returned is whatever is left once no more roots are found.
fn split_polynomial(expr: &Expr, var: &str, max_degree: usize) -> Option<Vec<Expr>> {
    let Expr::Sum(terms) = expr else {
        return None;
    };

    let mut coeffs: Vec<Rational> = Vec::new();
    for term in terms {
        let (coeff, rest) = split_coefficient(term);
        let k = degree_in(&rest, var).filter(|&k| k <= max_degree)?;
        if coeffs.len() <= k {
            coeffs.resize(k + 1, Rational::new());
        }
        coeffs[k] += coeff.as_rational()?;
    }
    if coeffs.len() < 3 {
        return None;
    }

    let mut factors = Vec::new();
    while coeffs.len() >= 3 {
        let Some(root) = rational_root(&coeffs) else {
            break;
        };
        trace!("{} has a root at {} = {}", expr, var, root);
        let quotient = divide_by_root(&coeffs, &root);
        let (p, q) = root.into_numer_denom();
        let q = Rational::from(q);
        coeffs = quotient.into_iter().map(|coeff| coeff / &q).collect();
        factors.push(polynomial(vec![Rational::from(-p), q], var));
    }
    if factors.is_empty() {
        return None;
    }

    let mut content = rational_content(&coeffs);
    if coeffs.last().map_or(false, |leading| leading.cmp0() == Ordering::Less) {
        content = -content;
    }
    let rest = coeffs.into_iter().map(|coeff| coeff / &content).collect();
    factors.insert(0, Expr::Number(Number::from(content)));
    factors.push(polynomial(rest, var));
    Some(factors)
}
