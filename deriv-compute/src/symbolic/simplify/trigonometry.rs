//! The second pass: trigonometric and hyperbolic identities.
//!
//! Within a sum, pairs of terms that differ only by a squared function call are combined:
//!
//! | Terms                | Result       |
//! |----------------------|--------------|
//! | `sin(u)^2 + cos(u)^2` | `1`         |
//! | `1 - sin(u)^2`        | `cos(u)^2`  |
//! | `1 - cos(u)^2`        | `sin(u)^2`  |
//! | `1 + tan(u)^2`        | `sec(u)^2`  |
//! | `1 + cot(u)^2`        | `csc(u)^2`  |
//! | `cos(u)^2 - sin(u)^2` | `cos(2*u)`  |
//! | `cosh(u)^2 - sinh(u)^2` | `1`       |
//! | `1 + sinh(u)^2`       | `cosh(u)^2` |
//! | `cosh(u)^2 - 1`       | `sinh(u)^2` |
//!
//! Both terms may share any common coefficient and factors, so `3*x*sin(u)^2 + 3*x*cos(u)^2` is
//! reduced to `3*x`. Within a product, quotient and reciprocal identities are applied to pairs of
//! circular functions of the same argument, such as `tan(u)*cos(u) = sin(u)`,
//! `sin(u)/cos(u) = tan(u)` and `2*sin(u)*cos(u) = sin(2*u)`.
//!
//! The pass rewrites each sum and product at most once. The expand pass calls [`reduce_fully`]
//! on its own output, since distributing a product can produce new pairs of matching terms.

use deriv_parser::Function;
use log::trace;
use crate::primitive::rational;
use crate::symbolic::{expr::Expr, number::Number};
use super::normalize::{
    is_even_integer,
    normalize,
    normalize_call,
    normalize_power,
    normalize_product,
    normalize_sum,
    split_factors,
};

/// Rebuilds the node from already reduced children, and returns it along with the result of
/// applying the identity table to it once, if any identity matched.
fn reduce_node(expr: &Expr, reduce_child: impl Fn(&Expr) -> Expr) -> (Expr, Option<Expr>) {
    let node = match expr {
        Expr::Number(_) | Expr::Symbol(_) => return (expr.clone(), None),
        Expr::Sum(terms) => normalize_sum(terms.iter().map(&reduce_child).collect()),
        Expr::Product(factors) => normalize_product(factors.iter().map(&reduce_child).collect()),
        Expr::Power(base, exp) => normalize_power(reduce_child(&**base), reduce_child(&**exp)),
        Expr::Call(callee, args) => {
            normalize_call(callee.clone(), args.iter().map(&reduce_child).collect())
        },
    };

    let rewritten = match &node {
        Expr::Sum(terms) => reduce_sum(terms),
        Expr::Product(_) => reduce_product(&node),
        _ => None,
    };
    if let Some(rewritten) = &rewritten {
        trace!("trigonometric identity: {} = {}", node, rewritten);
    }
    (node, rewritten)
}

/// Applies trigonometric identities to the given normalized expression in one bottom-up sweep.
///
/// Every sum and product is rewritten at most once. A rewrite can expose another identity, such
/// as `sin(x)^2 + cos(x)^2 - sin(y)^2 = 1 - sin(y)^2`, which is left for [`reduce_fully`].
pub fn reduce(expr: &Expr) -> Expr {
    match reduce_node(expr, reduce) {
        (_, Some(rewritten)) => normalize(&rewritten),
        (node, None) => node,
    }
}

/// Applies trigonometric identities to the given normalized expression until none of them
/// match anywhere in it.
///
/// Every identity in the table replaces a node with a smaller one, so this always terminates.
pub fn reduce_fully(expr: &Expr) -> Expr {
    match reduce_node(expr, reduce_fully) {
        (_, Some(rewritten)) => reduce_fully(&normalize(&rewritten)),
        (node, None) => node,
    }
}

/// Returns true if no identity matches any sum or product of the given normalized expression.
pub fn is_reduced(expr: &Expr) -> bool {
    let matches = match expr {
        Expr::Sum(terms) => reduce_sum(terms).is_some(),
        Expr::Product(_) => reduce_product(expr).is_some(),
        _ => false,
    };
    !matches && match expr {
        Expr::Number(_) | Expr::Symbol(_) => true,
        Expr::Sum(children) | Expr::Product(children) | Expr::Call(_, children) => {
            children.iter().all(is_reduced)
        },
        Expr::Power(base, exp) => is_reduced(base) && is_reduced(exp),
    }
}

/// Returns `2*arg`, distributing the `2` over the terms of a sum so that the argument is
/// already in expanded form.
fn doubled(arg: &Expr) -> Expr {
    match arg {
        Expr::Sum(terms) => normalize_sum(
            terms.iter()
                .map(|term| normalize_product(vec![Expr::int(2), term.clone()]))
                .collect(),
        ),
        arg => normalize_product(vec![Expr::int(2), arg.clone()]),
    }
}

/// A term of a sum, split into its numeric coefficient and its other factors.
struct Term {
    coeff: Number,
    factors: Vec<Expr>,
}

impl Term {
    fn new(term: &Expr) -> Self {
        let (coeff, factors) = split_factors(term);
        Self { coeff, factors }
    }

    /// Finds the first factor of the term that is a known function squared.
    fn square(&self) -> Option<Square> {
        self.factors.iter().enumerate().find_map(|(i, factor)| {
            let Expr::Power(base, exp) = factor else {
                return None;
            };
            if exp.as_integer().map_or(true, |exp| *exp != 2) {
                return None;
            }
            let (function, arg) = base.as_known_call()?;
            let rest = Expr::product(
                self.factors.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, factor)| factor.clone()),
            );
            Some(Square { function, arg, rest })
        })
    }

    fn into_expr(self) -> Expr {
        Expr::product(std::iter::once(Expr::Number(self.coeff)).chain(self.factors))
    }
}

/// A term of the form `c * rest * f(arg)^2`.
struct Square<'a> {
    function: Function,
    arg: &'a Expr,
    rest: Expr,
}

impl Square<'_> {
    /// Builds `coeff * rest * factor`.
    fn rebuild(&self, coeff: &Number, factor: Expr) -> Expr {
        Expr::product([Expr::Number(coeff.clone()), self.rest.clone(), factor])
    }

    /// Builds `coeff * rest * function(arg)^2`.
    fn rebuild_squared(&self, coeff: &Number, function: Function) -> Expr {
        self.rebuild(coeff, Expr::power(Expr::call(function, self.arg.clone()), Expr::int(2)))
    }
}

/// Combines two terms that each hold a squared function of the same argument.
fn combine_squares(a: &Square, a_coeff: &Number, b: &Square, b_coeff: &Number) -> Option<Expr> {
    use Function::*;

    if a.arg != b.arg || a.rest != b.rest {
        return None;
    }
    let same = a_coeff == b_coeff;
    let opposite = *a_coeff == b_coeff.neg();
    let double_angle = || Expr::call(Cos, doubled(a.arg));

    match (a.function, b.function) {
        (Sin, Cos) | (Cos, Sin) if same => Some(a.rebuild(a_coeff, Expr::one())),
        (Cosh, Sinh) if opposite => Some(a.rebuild(a_coeff, Expr::one())),
        (Sinh, Cosh) if opposite => Some(a.rebuild(b_coeff, Expr::one())),
        (Cos, Sin) if opposite => Some(a.rebuild(a_coeff, double_angle())),
        (Sin, Cos) if opposite => Some(a.rebuild(b_coeff, double_angle())),
        _ => None,
    }
}

/// Combines a term holding a squared function with a term made of the remaining factors only.
fn combine_with_plain(square: &Square, square_coeff: &Number, plain: &Term) -> Option<Expr> {
    use Function::*;

    if Expr::product(plain.factors.iter().cloned()) != square.rest {
        return None;
    }
    let same = plain.coeff == *square_coeff;
    let opposite = plain.coeff == square_coeff.neg();

    let (coeff, function) = match square.function {
        Sin if opposite => (&plain.coeff, Cos),
        Cos if opposite => (&plain.coeff, Sin),
        Tan if same => (&plain.coeff, Sec),
        Cot if same => (&plain.coeff, Csc),
        Sinh if same => (&plain.coeff, Cosh),
        Cosh if opposite => (square_coeff, Sinh),
        _ => return None,
    };
    Some(square.rebuild_squared(coeff, function))
}

/// Applies the Pythagorean identities to the terms of a sum. Each term takes part in at most one
/// identity.
fn reduce_sum(terms: &[Expr]) -> Option<Expr> {
    let terms = terms.iter().map(Term::new).collect::<Vec<_>>();
    let squares = terms.iter().map(Term::square).collect::<Vec<_>>();
    let mut used = vec![false; terms.len()];
    let mut output = Vec::new();

    for i in 0..terms.len() {
        let Some(square) = &squares[i] else {
            continue;
        };
        if used[i] {
            continue;
        }

        let found = (0..terms.len())
            .filter(|&k| k != i && !used[k])
            .find_map(|k| {
                squares[k].as_ref()
                    .and_then(|other| combine_squares(square, &terms[i].coeff, other, &terms[k].coeff))
                    .or_else(|| combine_with_plain(square, &terms[i].coeff, &terms[k]))
                    .map(|result| (k, result))
            });
        if let Some((k, result)) = found {
            used[i] = true;
            used[k] = true;
            output.push(result);
        }
    }

    if output.is_empty() {
        return None;
    }
    output.extend(
        terms.into_iter()
            .zip(used)
            .filter(|(_, used)| !used)
            .map(|(term, _)| term.into_expr()),
    );
    Some(Expr::sum(output))
}

/// If the factor is a circular trigonometric function, or its reciprocal, returns the function,
/// its argument, and whether it is a reciprocal.
fn trig_factor(factor: &Expr) -> Option<(Function, &Expr, bool)> {
    let (call, inverted) = match factor {
        Expr::Power(base, exp) if exp.as_integer().map_or(false, |exp| *exp == -1) => (&**base, true),
        factor => (factor, false),
    };
    let (function, arg) = call.as_known_call()?;
    function.is_trigonometric().then_some((function, arg, inverted))
}

/// Returns the factor that replaces the product of `a` and `b`, along with the number the
/// coefficient must be multiplied by.
fn product_identity(
    a: (Function, bool),
    b: (Function, bool),
    arg: &Expr,
    coeff: &Number,
) -> Option<(Number, Expr)> {
    use Function::*;

    let one = Number::int(1);
    let call = |function| Expr::call(function, arg.clone());
    match (a, b) {
        ((Tan, false), (Cos, false)) => Some((one, call(Sin))),
        ((Cot, false), (Sin, false)) => Some((one, call(Cos))),
        ((Sec, false), (Cos, false))
            | ((Csc, false), (Sin, false))
            | ((Tan, false), (Cot, false)) => Some((one, Expr::one())),
        ((Sin, false), (Cos, true)) => Some((one, call(Tan))),
        ((Cos, false), (Sin, true)) => Some((one, call(Cot))),
        ((Sin, false), (Cos, false)) if is_even_integer(coeff) => {
            Some((Number::from(rational((1, 2))), Expr::call(Sin, doubled(arg))))
        },
        _ => None,
    }
}

/// Applies the first quotient, reciprocal, or double-angle identity that matches a pair of
/// factors of the product.
fn reduce_product(product: &Expr) -> Option<Expr> {
    let (coeff, factors) = split_factors(product);
    let trig = factors.iter()
        .enumerate()
        .filter_map(|(i, factor)| trig_factor(factor).map(|found| (i, found)))
        .collect::<Vec<_>>();

    for (n, &(i, (f_a, arg_a, inv_a))) in trig.iter().enumerate() {
        for &(k, (f_b, arg_b, inv_b)) in &trig[n + 1..] {
            if arg_a != arg_b {
                continue;
            }
            let Some((scale, replacement)) = product_identity((f_a, inv_a), (f_b, inv_b), arg_a, &coeff)
                .or_else(|| product_identity((f_b, inv_b), (f_a, inv_a), arg_a, &coeff))
            else {
                continue;
            };

            let remaining = factors.iter()
                .enumerate()
                .filter(|(j, _)| *j != i && *j != k)
                .map(|(_, factor)| factor.clone());
            return Some(Expr::product(
                [Expr::Number(coeff.mul(&scale)), replacement]
                    .into_iter()
                    .chain(remaining),
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::parse;

    fn reduced(input: &str) -> String {
        reduce(&normalize(&parse(input).unwrap())).to_string()
    }

    #[test]
    fn pythagorean() {
        assert_eq!(reduced("sin(x)^2 + cos(x)^2"), "1");
        assert_eq!(reduced("3*sin(y)^2 + 3*cos(y)^2 + x"), "x + 3");
        assert_eq!(reduced("x*sin(x)^2 + x*cos(x)^2"), "x");
        assert_eq!(reduced("sin(x + 1)^2 + cos(x + 1)^2"), "1");
    }

    #[test]
    fn pythagorean_rearranged() {
        assert_eq!(reduced("1 - sin(x)^2"), "cos(x)^2");
        assert_eq!(reduced("1 - cos(x)^2"), "sin(x)^2");
        assert_eq!(reduced("2 - 2*cos(x)^2"), "2*sin(x)^2");
        assert_eq!(reduced("1 + tan(x)^2"), "sec(x)^2");
        assert_eq!(reduced("1 + cot(x)^2"), "csc(x)^2");
    }

    #[test]
    fn hyperbolic() {
        assert_eq!(reduced("cosh(x)^2 - sinh(x)^2"), "1");
        assert_eq!(reduced("1 + sinh(x)^2"), "cosh(x)^2");
        assert_eq!(reduced("cosh(x)^2 - 1"), "sinh(x)^2");
    }

    #[test]
    fn double_angle() {
        assert_eq!(reduced("cos(x)^2 - sin(x)^2"), "cos(2*x)");
        assert_eq!(reduced("sin(x)^2 - cos(x)^2 + 1"), "-cos(2*x) + 1");
        assert_eq!(reduced("2*sin(x)*cos(x)"), "sin(2*x)");
        assert_eq!(reduced("-4*sin(y)*cos(y)"), "-2*sin(2*y)");
    }

    #[test]
    fn quotients() {
        assert_eq!(reduced("tan(x)*cos(x)"), "sin(x)");
        assert_eq!(reduced("sin(x)/cos(x)"), "tan(x)");
        assert_eq!(reduced("cos(x)/sin(x)"), "cot(x)");
        assert_eq!(reduced("3*sec(x)*cos(x)"), "3");
        assert_eq!(reduced("x*tan(x)*cot(x)"), "x");
    }

    #[test]
    fn nested() {
        assert_eq!(reduced("exp(sin(x)^2 + cos(x)^2)"), "exp(1)");
        assert_eq!(reduced("ln(1 + tan(x)^2)"), "ln(sec(x)^2)");
    }

    #[test]
    fn one_rewrite_per_node() {
        let expr = normalize(&parse("sin(x)^2 + cos(x)^2 - sin(y)^2").unwrap());
        assert_eq!(reduce(&expr).to_string(), "-sin(y)^2 + 1");
        assert!(!is_reduced(&reduce(&expr)));

        assert_eq!(reduce_fully(&expr).to_string(), "cos(y)^2");
        assert!(is_reduced(&reduce_fully(&expr)));
    }

    #[test]
    fn reduced_check() {
        let check = |input: &str| is_reduced(&normalize(&parse(input).unwrap()));
        assert!(check("cos(x)*sin(x)*(y + 1)"));
        assert!(check("sin(2*x) + x^2"));
        assert!(!check("2*cos(x)*sin(x)*(y + 1)"));
        assert!(!check("exp(1 - cos(x)^2)"));
    }

    #[test]
    fn doubled_sum_argument() {
        assert_eq!(
            reduce(&normalize(&parse("2*sin(x + 1)*cos(x + 1)").unwrap())),
            normalize(&parse("sin(2*x + 2)").unwrap()),
        );
    }

    #[test]
    fn no_match() {
        assert_eq!(reduced("sin(x)*cos(x)"), "cos(x)*sin(x)");
        assert_eq!(reduced("sin(x)^2 + cos(y)^2"), "cos(y)^2 + sin(x)^2");
        assert_eq!(reduced("sin(x)^2 + 2*cos(x)^2"), "2*cos(x)^2 + sin(x)^2");
    }
}
