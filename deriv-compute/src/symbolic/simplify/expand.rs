//! The third pass: distributing products over sums and expanding integer powers of sums.
//!
//! Both expansions can grow an expression exponentially, so they are capped by
//! [`SimplifyOptions::max_expansion_terms`] and [`SimplifyOptions::max_expansion_exponent`]. A
//! product or power that would exceed either cap is left as it is.
//!
//! The expanded result is passed through [`reduce_fully`], so it never holds a sum or product
//! that a trigonometric identity applies to.

use log::trace;
use rug::Integer;
use crate::symbolic::{expr::Expr, number::Number};
use super::{
    normalize::{normalize_call, normalize_power, normalize_product, normalize_sum},
    trigonometry::reduce_fully,
    SimplifyOptions,
};

/// Expands the given normalized expression, then applies the trigonometric identities to the
/// result until none of them match.
///
/// Distributing a product can line up terms like `sin(x)^2` and `-1` that the trigonometry pass
/// never saw together, so they are combined here.
pub fn expand(expr: &Expr, options: &SimplifyOptions) -> Expr {
    reduce_fully(&expand_node(expr, options))
}

/// Expands the given normalized expression, bottom-up.
fn expand_node(expr: &Expr, options: &SimplifyOptions) -> Expr {
    let node = match expr {
        Expr::Number(_) | Expr::Symbol(_) => return expr.clone(),
        Expr::Sum(terms) => {
            return normalize_sum(terms.iter().map(|term| expand_node(term, options)).collect());
        },
        Expr::Product(factors) => {
            normalize_product(factors.iter().map(|factor| expand_node(factor, options)).collect())
        },
        Expr::Power(base, exp) => {
            normalize_power(expand_node(base, options), expand_node(exp, options))
        },
        Expr::Call(callee, args) => {
            return normalize_call(
                callee.clone(),
                args.iter().map(|arg| expand_node(arg, options)).collect(),
            );
        },
    };

    let expanded = match &node {
        Expr::Product(factors) => distribute(factors, options),
        Expr::Power(base, exp) => match (&**base, exp.as_number().and_then(Number::to_i64)) {
            (Expr::Sum(terms), Some(n)) => expand_power(terms, n, options),
            _ => None,
        },
        _ => None,
    };
    expanded.unwrap_or(node)
}

/// Multiplies out every sum among the factors of a product.
fn distribute(factors: &[Expr], options: &SimplifyOptions) -> Option<Expr> {
    let (sums, others): (Vec<_>, Vec<_>) = factors.iter().partition(|factor| matches!(factor, Expr::Sum(_)));
    if sums.is_empty() {
        return None;
    }

    let count = sums.iter()
        .try_fold(1usize, |count, sum| match sum {
            Expr::Sum(terms) => count.checked_mul(terms.len()),
            _ => Some(count),
        });
    if count.map_or(true, |count| count > options.max_expansion_terms) {
        trace!("not distributing a product with {:?} resulting terms", count);
        return None;
    }

    let mut products = vec![others.into_iter().cloned().collect::<Vec<_>>()];
    for sum in sums {
        let Expr::Sum(terms) = sum else {
            continue;
        };
        products = products.iter()
            .flat_map(|prefix| terms.iter().map(move |term| {
                let mut product = prefix.clone();
                product.push(term.clone());
                product
            }))
            .collect();
    }

    Some(normalize_sum(products.into_iter().map(normalize_product).collect()))
}

/// Returns the number of terms in the expansion of a sum of `parts` terms raised to the `n`th
/// power, `C(n + parts - 1, parts - 1)`, or [`None`] if it does not fit in a [`usize`].
fn multinomial_terms(n: u32, parts: usize) -> Option<usize> {
    let mut count: u128 = 1;
    for i in 1..parts as u128 {
        count = count * (u128::from(n) + i) / i;
        if count > usize::MAX as u128 {
            return None;
        }
    }
    usize::try_from(count).ok()
}

/// Returns every way to write `n` as an ordered sum of `parts` non-negative integers.
fn compositions(n: u32, parts: usize) -> Vec<Vec<u32>> {
    if parts <= 1 {
        return vec![vec![n]];
    }
    (0..=n).rev()
        .flat_map(|first| {
            compositions(n - first, parts - 1)
                .into_iter()
                .map(move |mut rest| {
                    rest.insert(0, first);
                    rest
                })
        })
        .collect()
}

/// Expands `(a + b + ...)^n` with the multinomial theorem, for a positive integer `n`.
fn expand_power(terms: &[Expr], n: i64, options: &SimplifyOptions) -> Option<Expr> {
    let n = u32::try_from(n).ok().filter(|&n| n >= 2)?;
    if n > options.max_expansion_exponent {
        trace!("not expanding a sum raised to the power of {}", n);
        return None;
    }
    let count = multinomial_terms(n, terms.len());
    if count.map_or(true, |count| count > options.max_expansion_terms) {
        trace!("not expanding a power with {:?} resulting terms", count);
        return None;
    }

    let n_factorial = Integer::from(Integer::factorial(n));
    let expanded = compositions(n, terms.len())
        .into_iter()
        .map(|exponents| {
            let divisor = exponents.iter()
                .fold(Integer::from(1), |acc, &k| acc * Integer::from(Integer::factorial(k)));
            let coeff = Number::from(Integer::from(&n_factorial / &divisor));
            let factors = terms.iter()
                .zip(exponents)
                .map(|(term, k)| normalize_power(term.clone(), Expr::int(i64::from(k))));
            normalize_product(std::iter::once(Expr::Number(coeff)).chain(factors).collect())
        })
        .collect();
    Some(normalize_sum(expanded))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::{parse, simplify::normalize::normalize};

    fn expanded(input: &str) -> String {
        expand(&normalize(&parse(input).unwrap()), &SimplifyOptions::default()).to_string()
    }

    #[test]
    fn distribution() {
        assert_eq!(expanded("2*(x + 1)"), "2*x + 2");
        assert_eq!(expanded("(x + 1)*(x + 2)"), "x^2 + 3*x + 2");
        assert_eq!(expanded("(x - y)*(x + y)"), "x^2 - y^2");
        assert_eq!(expanded("exp(x)*(sin(x) + cos(x))"), "cos(x)*exp(x) + exp(x)*sin(x)");
    }

    #[test]
    fn binomial() {
        assert_eq!(expanded("(x + 1)^2"), "x^2 + 2*x + 1");
        assert_eq!(expanded("(x - 1)^3"), "x^3 - 3*x^2 + 3*x - 1");
        assert_eq!(expanded("(2*x + 1)^2"), "4*x^2 + 4*x + 1");
    }

    #[test]
    fn multinomial() {
        assert_eq!(multinomial_terms(2, 3), Some(6));
        assert_eq!(compositions(2, 2), vec![vec![2, 0], vec![1, 1], vec![0, 2]]);
        assert_eq!(expanded("(x + y + 1)^2"), "2*x*y + x^2 + y^2 + 2*x + 2*y + 1");
    }

    #[test]
    fn nested() {
        assert_eq!(expanded("sin((x + 1)^2)"), "sin(x^2 + 2*x + 1)");
        assert_eq!(expanded("x*(x*(x + 1) + 1)"), "x^3 + x^2 + x");
    }

    #[test]
    fn trigonometric_terms() {
        assert_eq!(expanded("(1 - sin(x))*(1 + sin(x))"), "cos(x)^2");
        assert_eq!(expanded("(sin(x) + cos(x))^2"), "sin(2*x) + 1");
        assert_eq!(expanded("(cos(x) - sin(x))*(cos(x) + sin(x))"), "cos(2*x)");
    }

    #[test]
    fn left_alone() {
        assert_eq!(expanded("(x + 1)^-1"), "1/(x + 1)");
        assert_eq!(expanded("(x + 1)^(1/2)"), "(x + 1)^(1/2)");
        assert_eq!(expanded("(x + 1)^n"), "(x + 1)^n");
    }

    #[test]
    fn capped() {
        let options = SimplifyOptions::default()
            .into_builder()
            .max_expansion_exponent(4)
            .max_expansion_terms(3)
            .build();
        let cap = |input: &str| expand(&normalize(&parse(input).unwrap()), &options).to_string();
        assert_eq!(cap("(x + 1)^5"), "(x + 1)^5");
        assert_eq!(cap("(x + 1)^2"), "x^2 + 2*x + 1");
        assert_eq!(cap("(x + y + 1)^2"), "(x + y + 1)^2");
        assert_eq!(cap("(x + 1)*(y + 1)"), "(x + 1)*(y + 1)");
    }
}
