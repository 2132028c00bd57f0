//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are represented as a tree of [`Expr`] nodes. It's similar to the
//! [`deriv_parser::parser::ast::Expr`] nodes produced by [`deriv_parser`], with the main
//! difference being that [`Expr`] nodes **flatten** out the tree structure, so that `x + (y + z)`
//! is a single [`Expr::Sum`] with three terms.
//!
//! Use [`parse`] to go straight from text to an [`Expr`]:
//!
//! ```
//! use deriv_compute::symbolic::{parse, Expr};
//!
//! let expr = parse("x + (y + z)").unwrap();
//! assert_eq!(expr, Expr::Sum(vec![
//!     Expr::symbol("x"),
//!     Expr::symbol("y"),
//!     Expr::symbol("z"),
//! ]));
//! ```
//!
//! # Differentiation
//!
//! [`differentiate`] takes the derivative of an expression with respect to a variable, any
//! number of times, and [`differentiate_partial`] takes mixed partial derivatives with respect to
//! a list of variables. Every result is passed through the simplifier.
//!
//! ```
//! use deriv_compute::symbolic::{differentiate, parse};
//!
//! let expr = parse("x^3 + 3*x").unwrap();
//! assert_eq!(differentiate(&expr, "x", 2).unwrap().to_string(), "6*x");
//! ```
//!
//! # Simplification
//!
//! [`simplify()`] reduces an expression to a canonical form with a fixed pipeline of five passes.
//! For more information, see the [`mod@simplify`] module.
//!
//! ```
//! use deriv_compute::symbolic::{parse, simplify};
//!
//! let expr = parse("sin(x)^2 + cos(x)^2").unwrap();
//! assert_eq!(simplify(&expr).to_string(), "1");
//! ```

pub mod derivative;
pub mod eval;
pub mod expr;
pub mod fmt;
pub mod number;
pub mod simplify;
pub mod step_collector;
pub mod symbols;

pub use derivative::{differentiate, differentiate_partial, DiffError, Differentiator};
pub use expr::Expr;
pub use number::Number;
pub use simplify::{simplify, simplify_with};
pub use step_collector::StepCollector;
pub use symbols::{SymbolClass, SymbolTable};

use deriv_error::Error;

/// Parses the given text into an [`Expr`].
pub fn parse(text: &str) -> Result<Expr, Error> {
    deriv_parser::parse(text).map(Expr::from)
}
