//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](deriv_parser::parser::ast::Expr) type from `deriv_parser` mirrors the input as it
//! was written, which is convenient for reporting errors but not for algebra. This module defines
//! a separate [`Expr`] that **flattens** chains of additions and multiplications into a single
//! [`Expr::Sum`] / [`Expr::Product`] node, and rewrites subtraction and division in terms of
//! them:
//!
//! - `a - b` becomes `a + (-1)*b`
//! - `a / b` becomes `a * b^-1`
//!
//! # Construction-time normalization
//!
//! The smart constructors [`Expr::sum`], [`Expr::product`] and [`Expr::power`] never build
//! degenerate nodes: a sum with no terms is `0`, a product with no factors is `1`, a single
//! child replaces its parent, and `u^0` / `u^1` become `1` / `u`. Every transformation in this
//! crate goes through them, so no expression ever holds those shapes.
//!
//! # Strict equality
//!
//! The [`PartialEq`] implementation compares **structure**, not mathematical meaning: numbers by
//! value, symbols by name, powers and calls child by child, and sums and products as multisets,
//! so that `x + y` equals `y + x`. It does not see that `(x + 1)^2` and `x^2 + 2*x + 1` are the
//! same function; bringing both sides to a canonical form with
//! [`simplify`](super::simplify::simplify) first is what makes that comparison meaningful.

mod display;
mod iter;
mod ordering;

use crate::primitive::{float, float_from_str, int_from_str, rational};
use deriv_parser::{
    parser::{
        ast::{Expr as AstExpr, Literal},
        token::op::{BinOpKind, UnaryOpKind},
    },
    Function,
};
use rug::Integer;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
};
use super::number::Number;

pub use iter::ExprIter;
pub use ordering::{canonical_cmp, degree, sort_factors, sort_terms};
pub(crate) use display::{negated_term, needs_parens_as_base, needs_parens_as_factor, Fraction};
pub(crate) use ordering::{base_and_exponent, coefficient_and_rest};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The function applied by an [`Expr::Call`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Callee {
    /// A function with a built-in differentiation rule.
    Known(Function),

    /// Any other function, such as `f` in `f(x)`. These can be parsed and simplified, but not
    /// differentiated.
    Unknown(String),
}

impl Callee {
    /// Resolves a function name.
    pub fn from_name(name: String) -> Self {
        match Function::from_name(&name) {
            Some(function) => Self::Known(function),
            None => Self::Unknown(name),
        }
    }

    /// Returns the name the function is written as.
    pub fn name(&self) -> &str {
        match self {
            Self::Known(function) => function.name(),
            Self::Unknown(name) => name,
        }
    }
}

/// A symbolic mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A number, such as `2`, `1/3` or `0.5`.
    Number(Number),

    /// A variable or constant, such as `x` or `a`.
    Symbol(String),

    /// Two or more terms added together.
    Sum(Vec<Expr>),

    /// Two or more factors multiplied together.
    Product(Vec<Expr>),

    /// An expression raised to a power.
    Power(Box<Expr>, Box<Expr>),

    /// A function call, such as `sin(x)` or `f(x, y)`.
    Call(Callee, Vec<Expr>),
}

impl Expr {
    /// Creates the integer `n`.
    pub fn int(n: i64) -> Self {
        Self::Number(Number::int(n))
    }

    /// Creates the number `0`.
    pub fn zero() -> Self {
        Self::int(0)
    }

    /// Creates the number `1`.
    pub fn one() -> Self {
        Self::int(1)
    }

    /// Creates a symbol with the given name.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Applies a known function to a single argument.
    pub fn call(function: Function, arg: Self) -> Self {
        Self::Call(Callee::Known(function), vec![arg])
    }

    /// Adds the given terms together, flattening nested sums. The order of the terms is kept.
    pub fn sum(terms: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for term in terms {
            match term {
                Self::Sum(inner) => flat.extend(inner),
                term => flat.push(term),
            }
        }
        match flat.len() {
            0 => Self::zero(),
            1 => flat.remove(0),
            _ => Self::Sum(flat),
        }
    }

    /// Multiplies the given factors together, flattening nested products. The order of the
    /// factors is kept.
    pub fn product(factors: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for factor in factors {
            match factor {
                Self::Product(inner) => flat.extend(inner),
                factor => flat.push(factor),
            }
        }
        match flat.len() {
            0 => Self::one(),
            1 => flat.remove(0),
            _ => Self::Product(flat),
        }
    }

    /// Raises `base` to the power of `exponent`.
    pub fn power(base: Self, exponent: Self) -> Self {
        if exponent.is_zero() {
            Self::one()
        } else if exponent.is_one() {
            base
        } else {
            Self::Power(Box::new(base), Box::new(exponent))
        }
    }

    /// Returns `1 / self`, written as `self^-1`.
    pub fn recip(self) -> Self {
        Self::power(self, Self::int(-1))
    }

    /// Returns the square root of this expression, written as `self^(1/2)`.
    pub fn sqrt(self) -> Self {
        Self::power(self, Self::Number(Number::from(rational((1, 2)))))
    }

    /// If the expression is a number, returns a reference to it.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    /// If the expression is an exact integer, returns a reference to it.
    pub fn as_integer(&self) -> Option<&Integer> {
        self.as_number().and_then(Number::as_integer)
    }

    /// If the expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// If the expression is a call to a known function with one argument, returns the function
    /// and its argument.
    pub fn as_known_call(&self) -> Option<(Function, &Expr)> {
        match self {
            Self::Call(Callee::Known(function), args) if args.len() == 1 => {
                Some((*function, &args[0]))
            },
            _ => None,
        }
    }

    /// Returns true if the expression is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, Number::is_zero)
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().map_or(false, Number::is_one)
    }

    /// Returns true if the given symbol appears anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(name))
    }

    /// Returns the number of nodes in the expression tree.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns the names of every symbol in the expression, in order of first appearance.
    pub fn symbols(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for name in self.post_order_iter().filter_map(Expr::as_symbol) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Rebuilds the expression by applying `f` to each direct child, going through the smart
    /// constructors so that the result stays normalized.
    pub fn map_children(self, mut f: impl FnMut(Self) -> Self) -> Self {
        match self {
            Self::Number(_) | Self::Symbol(_) => self,
            Self::Sum(terms) => Self::sum(terms.into_iter().map(f)),
            Self::Product(factors) => Self::product(factors.into_iter().map(f)),
            Self::Power(base, exp) => Self::power(f(*base), f(*exp)),
            Self::Call(callee, args) => Self::Call(callee, args.into_iter().map(f).collect()),
        }
    }

    /// Replaces every occurrence of the symbol `name` with `value`.
    pub fn substitute(self, name: &str, value: &Self) -> Self {
        match self {
            Self::Symbol(ref sym) if sym == name => value.clone(),
            expr => expr.map_children(|child| child.substitute(name, value)),
        }
    }
}

/// Divides `numerator` by `denominator`, written as `numerator * denominator^-1`.
pub fn make_fraction(numerator: Expr, denominator: Expr) -> Expr {
    Expr::product([numerator, denominator.recip()])
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => lhs == rhs,
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs == rhs,
            (Self::Sum(lhs), Self::Sum(rhs)) | (Self::Product(lhs), Self::Product(rhs)) => {
                multiset_eq(lhs, rhs)
            },
            (Self::Power(lhs_base, lhs_exp), Self::Power(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            (Self::Call(lhs_callee, lhs_args), Self::Call(rhs_callee, rhs_args)) => {
                lhs_callee == rhs_callee && lhs_args == rhs_args
            },
            _ => false,
        }
    }
}

/// Returns true if both lists hold the same expressions the same number of times, in any order.
fn multiset_eq(lhs: &[Expr], rhs: &[Expr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|item| {
        let found = rhs.iter()
            .enumerate()
            .position(|(i, candidate)| !used[i] && candidate == item);
        match found {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

/// Sums and products are hashed independently of the order of their children, so that the hash
/// agrees with strict equality.
impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Number(num) => num.hash(state),
            Self::Symbol(name) => name.hash(state),
            Self::Sum(children) | Self::Product(children) => {
                let mut hashes = children.iter()
                    .map(|child| {
                        let mut hasher = DefaultHasher::new();
                        child.hash(&mut hasher);
                        hasher.finish()
                    })
                    .collect::<Vec<_>>();
                hashes.sort_unstable();
                hashes.hash(state);
            },
            Self::Power(base, exp) => {
                base.hash(state);
                exp.hash(state);
            },
            Self::Call(callee, args) => {
                callee.hash(state);
                args.hash(state);
            },
        }
    }
}

impl From<Number> for Expr {
    fn from(num: Number) -> Self {
        Self::Number(num)
    }
}

impl From<AstExpr> for Expr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(literal) => match literal {
                // the parser only produces digit strings and finite decimals, so neither
                // fallback is reachable from parsed input
                Literal::Integer(int) => Self::Number(
                    int_from_str(&int.value).map(Number::from).unwrap_or_else(|| Number::int(0)),
                ),
                Literal::Float(lit) => Self::Number(Number::Float(
                    float_from_str(&lit.value)
                        .filter(|value| value.is_finite())
                        .unwrap_or_else(|| float(0)),
                )),
                Literal::Symbol(sym) => Self::Symbol(sym.name),
            },
            AstExpr::Paren(paren) => Self::from(paren.into_innermost()),
            AstExpr::Call(call) => Self::Call(
                Callee::from_name(call.name.name),
                call.args.into_iter().map(Self::from).collect(),
            ),
            AstExpr::Unary(unary) => match unary.op.kind {
                // treat this as -1 * operand
                UnaryOpKind::Neg => -Self::from(*unary.operand),
            },
            AstExpr::Binary(bin) => {
                let lhs = Self::from(*bin.lhs);
                let rhs = Self::from(*bin.rhs);
                match bin.op.kind {
                    BinOpKind::Exp => Self::power(lhs, rhs),
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => make_fraction(lhs, rhs),
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                }
            },
        }
    }
}

/// Adds two expressions, flattening sums. No other simplification is done.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::sum([self, rhs])
    }
}

/// Subtracts two expressions, written as `self + (-1)*rhs`.
impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Multiplies two expressions, flattening products. No other simplification is done.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::product([self, rhs])
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a number, in which case the number is negated.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Number(num) => Self::Number(num.neg()),
            expr => Self::int(-1) * expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::super::parse;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn degenerate_nodes_collapse() {
        assert_eq!(Expr::sum([]), Expr::zero());
        assert_eq!(Expr::product([]), Expr::one());
        assert_eq!(Expr::sum([x()]), x());
        assert_eq!(Expr::power(x(), Expr::zero()), Expr::one());
        assert_eq!(Expr::power(x(), Expr::one()), x());
    }

    #[test]
    fn flattening() {
        let expr = parse("x + (y + z)").unwrap();
        assert_eq!(expr, Expr::Sum(vec![x(), Expr::symbol("y"), Expr::symbol("z")]));

        let expr = parse("2*(x*y)").unwrap();
        assert_eq!(expr, Expr::Product(vec![Expr::int(2), x(), Expr::symbol("y")]));
    }

    #[test]
    fn subtraction_and_division() {
        let expr = parse("x - 1/y").unwrap();
        assert_eq!(expr, Expr::Sum(vec![
            x(),
            Expr::Product(vec![
                Expr::int(-1),
                Expr::int(1),
                Expr::Power(Box::new(Expr::symbol("y")), Box::new(Expr::int(-1))),
            ]),
        ]));
    }

    #[test]
    fn strict_equality() {
        let a = parse("2*(x + (y - 5))").unwrap();
        let b = parse("(y - 5 + x) * 2").unwrap();
        assert_eq!(a, b);

        // semantically equal, but not strictly
        let c = parse("2*x + 2*y - 10").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn multiset_counts_duplicates() {
        let a = Expr::Sum(vec![x(), x(), Expr::symbol("y")]);
        let b = Expr::Sum(vec![x(), Expr::symbol("y"), Expr::symbol("y")]);
        assert_ne!(a, b);
    }

    #[test]
    fn hash_agrees_with_equality() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(parse("x*y + sin(x)").unwrap());
        assert!(set.contains(&parse("sin(x) + y*x").unwrap()));
    }

    #[test]
    fn negated_literal_folds() {
        assert_eq!(parse("-3").unwrap(), Expr::int(-3));
        assert_eq!(parse("-x").unwrap(), Expr::Product(vec![Expr::int(-1), x()]));
    }

    #[test]
    fn substitution() {
        let expr = parse("x^2 + sin(x)").unwrap();
        assert_eq!(expr.substitute("x", &Expr::symbol("t")), parse("t^2 + sin(t)").unwrap());
    }

    #[test]
    fn symbols_in_order() {
        let expr = parse("b*y + a*x + y").unwrap();
        assert_eq!(expr.symbols(), vec!["b", "y", "a", "x"]);
    }
}
