//! Symbolic differentiation.
//!
//! [`derivative`] applies the differentiation rules once, structurally, without simplifying. The
//! [`Differentiator`] builds on it to take derivatives of any order and mixed partial
//! derivatives, simplifying after every application so that intermediate results stay small.

mod error;
mod function;

pub use error::DiffError;
pub use function::outer_derivative;

use log::{debug, trace, warn};
use super::{
    expr::{Callee, Expr},
    simplify::{simplify_with, SimplifyOptions},
    symbols::SymbolTable,
};

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to keep the output
/// of the differentiation rules small and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Number(num) => num.is_zero(),
        Expr::Sum(terms) => terms.iter().all(is_trivially_zero),
        Expr::Product(factors) => factors.iter().any(is_trivially_zero),
        Expr::Power(base, exp) => {
            is_trivially_zero(base) && exp.as_number().map_or(false, |exp| !exp.is_negative() && !exp.is_zero())
        },
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one. This is intended to keep the output of
/// the differentiation rules small and is not mathematically rigorous.
fn is_trivially_unity(e: &Expr) -> bool {
    match e {
        Expr::Number(num) => num.is_one(),
        Expr::Product(factors) => factors.iter().all(is_trivially_unity),
        Expr::Power(base, _) => is_trivially_unity(base),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder {
    factors: Vec<Expr>,
    zero: bool,
}

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        if value.zero {
            Expr::zero()
        } else {
            Expr::product(value.factors)
        }
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Expr) {
        if self.zero || is_trivially_zero(&e) {
            self.zero = true;
            self.factors.clear();
        } else if !is_trivially_unity(&e) {
            self.factors.push(e);
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        Expr::sum(value.0)
    }
}

impl SumBuilder {
    fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e);
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], var: &str) -> Result<Expr, DiffError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, var)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(factors: &[Expr], var: &str) -> Result<Expr, DiffError> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..factors.len() {
        let mut inner_mult = MultBuilder::default();
        for (factor_index, factor) in factors.iter().enumerate() {
            if factor_index == derivative_index {
                inner_mult.mult(derivative(factor, var)?);
            } else {
                inner_mult.mult(factor.clone());
            }
        }
        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// `(f^g)'`, using the power rule when the exponent is constant, the exponential rule when the
/// base is constant, and the general rule `f^g * (g' * ln(f) + g * f' / f)` otherwise.
fn power_rule(base: &Expr, exp: &Expr, var: &str) -> Result<Expr, DiffError> {
    let mut mult = MultBuilder::default();
    let ln = |expr: &Expr| Expr::call(deriv_parser::Function::Ln, expr.clone());

    if !exp.contains_symbol(var) {
        // g * f^(g - 1) * f'
        let reduced = match exp {
            Expr::Number(num) => Expr::Number(num.add(&super::Number::int(-1))),
            exp => exp.clone() - Expr::one(),
        };
        mult.mult(exp.clone());
        mult.mult(Expr::power(base.clone(), reduced));
        mult.mult(derivative(base, var)?);
    } else if !base.contains_symbol(var) {
        // f^g * ln(f) * g'
        mult.mult(Expr::power(base.clone(), exp.clone()));
        mult.mult(ln(base));
        mult.mult(derivative(exp, var)?);
    } else {
        let mut sum = SumBuilder::default();
        let mut exp_term = MultBuilder::default();
        exp_term.mult(derivative(exp, var)?);
        exp_term.mult(ln(base));
        sum.add(exp_term.into());

        let mut base_term = MultBuilder::default();
        base_term.mult(exp.clone());
        base_term.mult(derivative(base, var)?);
        base_term.mult(base.clone().recip());
        sum.add(base_term.into());

        mult.mult(Expr::power(base.clone(), exp.clone()));
        mult.mult(sum.into());
    }

    Ok(mult.into())
}

/// `f(u)' = f'(u) * u'`
fn chain_rule(callee: &Callee, args: &[Expr], var: &str) -> Result<Expr, DiffError> {
    let function = match callee {
        Callee::Known(function) => *function,
        Callee::Unknown(name) => return Err(DiffError::UnknownFunction(name.clone())),
    };
    let [arg] = args else {
        return Err(DiffError::ArgumentCount {
            function: function.name().to_string(),
            given: args.len(),
        });
    };

    let mut mult = MultBuilder::default();
    mult.mult(derivative(arg, var)?);
    if mult.zero {
        return Ok(Expr::zero());
    }
    mult.mult(outer_derivative(function, arg));
    let result = Expr::from(mult);
    trace!("chain rule: d/d{} {}({}) = {}", var, function, arg, result);
    Ok(result)
}

/// Computes the first derivative of the given expression with respect to `var`, without
/// simplifying the result.
///
/// Returns [`Err`] if the expression calls a function with no differentiation rule, even if the
/// call does not depend on `var`.
pub fn derivative(f: &Expr, var: &str) -> Result<Expr, DiffError> {
    if is_trivially_zero(f) {
        return Ok(Expr::zero());
    }

    let expr = match f {
        Expr::Number(_) => Expr::zero(),
        Expr::Symbol(sym) if sym == var => Expr::one(),
        Expr::Symbol(_) => Expr::zero(),
        Expr::Sum(terms) => sum_rule(terms, var)?,
        Expr::Product(factors) => product_rule(factors, var)?,
        Expr::Power(base, exp) => power_rule(base, exp, var)?,
        Expr::Call(Callee::Unknown(name), _) => {
            return Err(DiffError::UnknownFunction(name.clone()));
        },
        Expr::Call(callee, args) => chain_rule(callee, args, var)?,
    };

    if is_trivially_zero(&expr) {
        Ok(Expr::zero())
    } else {
        Ok(expr)
    }
}

/// Differentiates expressions to any order, simplifying between applications.
#[derive(Debug, Clone, Default)]
pub struct Differentiator {
    /// The classification of symbols into variables and constants.
    pub symbols: SymbolTable,

    /// Options for the simplifier that runs after each application.
    pub options: SimplifyOptions,
}

impl Differentiator {
    /// Creates a differentiator with the given symbol table and simplifier options.
    pub fn new(symbols: SymbolTable, options: SimplifyOptions) -> Self {
        Self { symbols, options }
    }

    /// Takes the `order`th derivative of `expr` with respect to `var`.
    ///
    /// The result of every application is simplified before the next one, so the returned
    /// expression is always simplified. Returns [`DiffError::InvalidOrder`] if `order` is not
    /// positive.
    pub fn differentiate(&self, expr: &Expr, var: &str, order: i64) -> Result<Expr, DiffError> {
        if order <= 0 {
            return Err(DiffError::invalid_order(order));
        }
        if self.symbols.is_constant(var) {
            warn!("differentiating with respect to `{}`, which is classified as a constant", var);
        }

        let mut current = expr.clone();
        for step in 1..=order {
            let raw = derivative(&current, var)?;
            current = simplify_with(&raw, &self.options, &mut ());
            debug!("d^{}/d{}^{}: {}", step, var, step, current);

            // every further derivative of a constant is zero
            if current.is_number() {
                if step < order {
                    current = Expr::int(0);
                }
                break;
            }
        }
        Ok(current)
    }

    /// Takes the mixed partial derivative of `expr`, differentiating with respect to each
    /// variable in turn, left to right, as many times as the matching order says.
    ///
    /// The variables are never reordered. Returns [`DiffError::ArityMismatch`] if the lists have
    /// different lengths. If both lists are empty, the expression is only simplified.
    pub fn differentiate_partial<S: AsRef<str>>(
        &self,
        expr: &Expr,
        vars: &[S],
        orders: &[i64],
    ) -> Result<Expr, DiffError> {
        if vars.len() != orders.len() {
            return Err(DiffError::ArityMismatch {
                variables: vars.len(),
                orders: orders.len(),
            });
        }
        if let Some(order) = orders.iter().find(|order| **order <= 0) {
            return Err(DiffError::invalid_order(*order));
        }
        if vars.is_empty() {
            return Ok(simplify_with(expr, &self.options, &mut ()));
        }

        vars.iter()
            .zip(orders)
            .try_fold(expr.clone(), |current, (var, order)| {
                self.differentiate(&current, var.as_ref(), *order)
            })
    }
}

/// Takes the `order`th derivative of `expr` with respect to `var`, using the default symbol
/// table and simplifier options.
///
/// See [`Differentiator::differentiate`].
pub fn differentiate(expr: &Expr, var: &str, order: i64) -> Result<Expr, DiffError> {
    Differentiator::default().differentiate(expr, var, order)
}

/// Takes a mixed partial derivative of `expr`, using the default symbol table and simplifier
/// options.
///
/// See [`Differentiator::differentiate_partial`].
pub fn differentiate_partial<S: AsRef<str>>(
    expr: &Expr,
    vars: &[S],
    orders: &[i64],
) -> Result<Expr, DiffError> {
    Differentiator::default().differentiate_partial(expr, vars, orders)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        assert_float_absolute_eq,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use super::*;
    use crate::symbolic::{parse, simplify};

    /// Differentiates the input once with respect to `x` and prints the result.
    fn d(input: &str) -> String {
        differentiate(&parse(input).unwrap(), "x", 1).unwrap().to_string()
    }

    /// Asserts that the symbolic derivative of the input with respect to `x` agrees with a
    /// central finite difference at each of the given points.
    fn check_numerically(input: &str, points: impl IntoIterator<Item = f64>) {
        const DX: f64 = 1e-6;

        let expr = parse(input).unwrap();
        let symbolic = differentiate(&expr, "x", 1).unwrap();
        let at = |expr: &Expr, x: f64| expr.eval_f64(&HashMap::from([("x", x)])).unwrap();

        for x in points {
            let numeric = (at(&expr, x + DX) - at(&expr, x - DX)) / (2.0 * DX);
            assert_float_absolute_eq!(at(&symbolic, x), numeric, 1e-4);
        }
    }

    #[test]
    fn constant_rule() {
        assert_eq!(d("5"), "0");
        assert_eq!(d("2.5"), "0");
        assert_eq!(d("a"), "0");
    }

    #[test]
    fn identity_rule() {
        assert_eq!(d("x"), "1");
        assert_eq!(d("y"), "0");
    }

    #[test]
    fn power_rule() {
        assert_eq!(d("x^3"), "3*x^2");
        assert_eq!(d("x^n"), "n*x^(n - 1)");
        assert_eq!(d("1/x"), "-1/x^2");
    }

    #[test]
    fn exponential_rule() {
        assert_eq!(d("a^x"), "a^x*ln(a)");
        check_numerically("2^x", [0.0, 1.0, 2.5]);
        check_numerically("x^x", [0.5, 1.0, 2.0]);
    }

    #[test]
    fn linearity() {
        let f = parse("x^2").unwrap();
        let g = parse("sin(x)").unwrap();
        let sum = differentiate(&(f.clone() + g.clone()), "x", 1).unwrap();
        let separately = simplify(&(
            differentiate(&f, "x", 1).unwrap() + differentiate(&g, "x", 1).unwrap()
        ));
        assert_eq!(sum, separately);
    }

    #[test]
    fn product_rule() {
        assert_eq!(d("sin(x)*exp(x)"), "exp(x)*(cos(x) + sin(x))");
    }

    #[test]
    fn chain_rule() {
        assert_eq!(d("sin(x^2)"), "2*x*cos(x^2)");
        check_numerically("ln(x^2 + 1)", [-1.0, 0.0, 3.0]);
        check_numerically("sqrt(1 + x^2)", [-2.0, 0.5, 4.0]);
    }

    #[test]
    fn every_known_function() {
        let points = [0.1, 0.3];
        for function in ["sin", "cos", "tan", "cot", "sec", "csc", "exp", "log", "ln", "asin",
            "acos", "atan", "acot", "sinh", "cosh", "tanh", "coth", "sqrt"] {
            check_numerically(&format!("{}(2*x)", function), points);
        }
    }

    #[test]
    fn higher_order() {
        let expr = parse("x^3 + 3*x").unwrap();
        assert_eq!(differentiate(&expr, "x", 1).unwrap().to_string(), "3*(x^2 + 1)");
        assert_eq!(differentiate(&expr, "x", 2).unwrap().to_string(), "6*x");
        assert_eq!(differentiate(&expr, "x", 4).unwrap().to_string(), "0");
    }

    #[test]
    fn huge_order() {
        let expr = parse("x^2").unwrap();
        assert_eq!(differentiate(&expr, "x", 2).unwrap().to_string(), "2");
        assert_eq!(differentiate(&expr, "x", 3).unwrap().to_string(), "0");
        assert_eq!(differentiate(&expr, "x", i64::MAX).unwrap().to_string(), "0");
        assert_eq!(differentiate(&parse("y").unwrap(), "x", i64::MAX).unwrap().to_string(), "0");
    }

    #[test]
    fn partial() {
        let expr = parse("x^2*y^3").unwrap();
        let result = differentiate_partial(&expr, &["x", "y"], &[1, 1]).unwrap();
        assert_eq!(result.to_string(), "6*x*y^2");

        let result = differentiate_partial(&expr, &["y"], &[2]).unwrap();
        assert_eq!(result.to_string(), "6*x^2*y");
    }

    #[test]
    fn partial_empty_lists() {
        let expr = parse("x + x").unwrap();
        let result = differentiate_partial::<&str>(&expr, &[], &[]).unwrap();
        assert_eq!(result.to_string(), "2*x");
    }

    #[test]
    fn invalid_order() {
        let expr = parse("x").unwrap();
        assert_eq!(differentiate(&expr, "x", 0), Err(DiffError::invalid_order(0)));
        assert_eq!(
            differentiate_partial(&expr, &["x", "y"], &[1, -1]),
            Err(DiffError::invalid_order(-1)),
        );
    }

    #[test]
    fn arity_mismatch() {
        let expr = parse("x*y").unwrap();
        assert_eq!(
            differentiate_partial(&expr, &["x", "y"], &[1]),
            Err(DiffError::ArityMismatch { variables: 2, orders: 1 }),
        );
    }

    #[test]
    fn unknown_function() {
        let expr = parse("f(x) + 1").unwrap();
        assert_eq!(
            differentiate(&expr, "x", 1),
            Err(DiffError::UnknownFunction("f".to_string())),
        );
    }
}
