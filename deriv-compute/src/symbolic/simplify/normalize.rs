//! The first pass: algebraic normalization.
//!
//! Normalization brings an expression into the canonical form every later pass expects:
//!
//! - numeric sub-expressions are folded (`2*3 = 6`, `4^(1/2) = 2`, `cos(0) = 1`),
//! - nested sums and products are flattened,
//! - identities are dropped (`x + 0 = x`, `x*1 = x`, `x*0 = 0`, `x^1 = x`, `x^0 = 1`),
//! - like terms are combined by adding their coefficients (`2*x + 3*x = 5*x`),
//! - like factors are combined by adding their exponents (`x*x^2 = x^3`),
//! - integer powers are distributed over products (`(2*x)^2 = 4*x^2`) and nested into powers
//!   (`(x^2)^3 = x^6`),
//! - terms and factors are sorted into canonical order.
//!
//! Normalizing a normalized expression returns it unchanged.

use deriv_parser::Function;
use log::trace;
use std::collections::HashMap;
use crate::primitive::rational;
use crate::symbolic::{
    expr::{sort_factors, sort_terms, Callee, Expr},
    number::Number,
};

/// Normalizes the given expression, bottom-up.
pub fn normalize(expr: &Expr) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Symbol(_) => expr.clone(),
        Expr::Sum(terms) => normalize_sum(terms.iter().map(normalize).collect()),
        Expr::Product(factors) => normalize_product(factors.iter().map(normalize).collect()),
        Expr::Power(base, exp) => normalize_power(normalize(base), normalize(exp)),
        Expr::Call(callee, args) => {
            normalize_call(callee.clone(), args.iter().map(normalize).collect())
        },
    }
}

/// Splits a normalized term into its numeric coefficient and the remaining factors.
///
/// - `5` -> `(5, 1)`
/// - `3*a*b` -> `(3, a*b)`
/// - `a` -> `(1, a)`
pub(crate) fn split_coefficient(term: &Expr) -> (Number, Expr) {
    match term {
        Expr::Number(num) => (num.clone(), Expr::one()),
        Expr::Product(factors) => match factors.split_first() {
            Some((Expr::Number(coeff), rest)) => {
                (coeff.clone(), Expr::product(rest.iter().cloned()))
            },
            _ => (Number::int(1), term.clone()),
        },
        term => (Number::int(1), term.clone()),
    }
}

/// Splits a normalized term into its numeric coefficient and the list of its other factors.
pub(crate) fn split_factors(term: &Expr) -> (Number, Vec<Expr>) {
    let (coeff, rest) = split_coefficient(term);
    let factors = match rest {
        Expr::Product(factors) => factors,
        rest if rest.is_one() => Vec::new(),
        rest => vec![rest],
    };
    (coeff, factors)
}

/// The inverse of [`split_coefficient`]: multiplies the normalized `rest` by `coeff`, keeping the
/// coefficient in front.
pub(crate) fn with_coefficient(coeff: Number, rest: Expr) -> Expr {
    if coeff.is_zero() {
        return Expr::zero();
    }
    if coeff.is_one() {
        return rest;
    }

    match rest {
        Expr::Number(num) => Expr::Number(coeff.mul(&num)),
        Expr::Product(mut factors) => {
            factors.insert(0, Expr::Number(coeff));
            Expr::Product(factors)
        },
        rest => Expr::Product(vec![Expr::Number(coeff), rest]),
    }
}

/// Builds the canonical sum of the given normalized terms.
pub fn normalize_sum(terms: Vec<Expr>) -> Expr {
    let mut constant = Number::int(0);
    let mut like_terms: Vec<(Expr, Number)> = Vec::new();
    let mut index: HashMap<Expr, usize> = HashMap::new();

    let flat = terms.into_iter().flat_map(|term| match term {
        Expr::Sum(inner) => inner,
        term => vec![term],
    });
    for term in flat {
        if let Expr::Number(num) = term {
            constant = constant.add(&num);
            continue;
        }

        let (coeff, rest) = split_coefficient(&term);
        match index.get(&rest) {
            Some(&i) => {
                trace!("combining like terms: {} and {}", with_coefficient(like_terms[i].1.clone(), rest.clone()), term);
                like_terms[i].1 = like_terms[i].1.add(&coeff);
            },
            None => {
                index.insert(rest.clone(), like_terms.len());
                like_terms.push((rest, coeff));
            },
        }
    }

    let mut result = like_terms.into_iter()
        .filter(|(_, coeff)| !coeff.is_zero())
        .map(|(rest, coeff)| with_coefficient(coeff, rest))
        .collect::<Vec<_>>();
    if !constant.is_zero() {
        result.push(Expr::Number(constant));
    }
    sort_terms(&mut result);
    Expr::sum(result)
}

/// Adds the exponent to the list of exponents of the given base, or adds a new base.
fn push_base(bases: &mut Vec<(Expr, Vec<Expr>)>, base: Expr, exp: Expr) {
    match bases.iter_mut().find(|(existing, _)| *existing == base) {
        Some((_, exps)) => exps.push(exp),
        None => bases.push((base, vec![exp])),
    }
}

/// Builds the canonical product of the given normalized factors.
pub fn normalize_product(factors: Vec<Expr>) -> Expr {
    let mut coeff = Number::int(1);
    let mut bases = Vec::new();

    let flat = factors.into_iter().flat_map(|factor| match factor {
        Expr::Product(inner) => inner,
        factor => vec![factor],
    });
    for factor in flat {
        match factor {
            Expr::Number(num) => coeff = coeff.mul(&num),
            Expr::Power(base, exp) => push_base(&mut bases, *base, *exp),
            factor => push_base(&mut bases, factor, Expr::one()),
        }
    }
    if coeff.is_zero() {
        return Expr::zero();
    }

    let mut merged = Vec::new();
    let mut another_round = false;
    for (base, exps) in bases {
        let exp = match <[Expr; 1]>::try_from(exps) {
            Ok([exp]) => exp,
            Err(exps) => normalize_sum(exps),
        };
        match normalize_power(base, exp) {
            Expr::Number(num) => coeff = coeff.mul(&num),
            Expr::Product(inner) => {
                another_round = true;
                merged.extend(inner);
            },
            factor => merged.push(factor),
        }
    }

    // merging exponents can turn a power of a product into a product, whose factors may
    // combine with the others
    if another_round {
        merged.push(Expr::Number(coeff));
        return normalize_product(merged);
    }
    if coeff.is_zero() {
        return Expr::zero();
    }

    sort_factors(&mut merged);
    if !coeff.is_one() {
        merged.insert(0, Expr::Number(coeff));
    }
    Expr::product(merged)
}

/// Returns true if the number is an exact, even integer.
pub(crate) fn is_even_integer(num: &Number) -> bool {
    num.as_integer().map_or(false, |n| n.is_even())
}

/// Builds the canonical form of `base^exp`, given a normalized base and exponent.
pub fn normalize_power(base: Expr, exp: Expr) -> Expr {
    if exp.is_zero() || base.is_one() {
        return Expr::one();
    }
    if exp.is_one() {
        return base;
    }

    match (base, exp) {
        (Expr::Number(base), Expr::Number(exp)) => match base.pow(&exp) {
            Some(result) => Expr::Number(result),
            None => Expr::power(Expr::Number(base), Expr::Number(exp)),
        },
        // (x^a)^n = x^(a*n)
        (Expr::Power(inner_base, inner_exp), Expr::Number(n)) if n.as_integer().is_some() => {
            let exp = normalize_product(vec![*inner_exp, Expr::Number(n)]);
            normalize_power(*inner_base, exp)
        },
        // (a*b)^n = a^n * b^n
        (Expr::Product(factors), Expr::Number(n)) if n.as_integer().is_some() => {
            normalize_product(
                factors.into_iter()
                    .map(|factor| normalize_power(factor, Expr::Number(n.clone())))
                    .collect(),
            )
        },
        // sqrt(u)^(2k) = u^k
        (Expr::Call(Callee::Known(Function::Sqrt), mut args), Expr::Number(n))
            if args.len() == 1 && is_even_integer(&n) =>
        {
            let half = n.mul(&Number::from(rational((1, 2))));
            normalize_power(args.remove(0), Expr::Number(half))
        },
        (base, exp) => Expr::power(base, exp),
    }
}

/// Evaluates a known function at a number, if the result is exact.
fn fold_call(function: Function, num: &Number) -> Option<Number> {
    match function {
        Function::Exp if num.is_zero() => Some(Number::int(1)),
        Function::Log | Function::Ln if num.is_one() => Some(Number::int(0)),
        Function::Sin | Function::Tan | Function::Sinh | Function::Tanh | Function::Asin
            | Function::Atan if num.is_zero() => Some(Number::int(0)),
        Function::Cos | Function::Cosh if num.is_zero() => Some(Number::int(1)),
        Function::Sqrt => num.pow(&Number::from(rational((1, 2)))),
        _ => None,
    }
}

/// Builds the canonical form of a function call, given normalized arguments.
pub fn normalize_call(callee: Callee, args: Vec<Expr>) -> Expr {
    if let (Callee::Known(function), [Expr::Number(num)]) = (&callee, args.as_slice()) {
        if let Some(value) = fold_call(*function, num) {
            return Expr::Number(value);
        }
    }
    Expr::Call(callee, args)
}
