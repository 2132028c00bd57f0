//! The abstract syntax tree produced by the parser. Every node remembers the region of the
//! source it was parsed from.

pub mod binary;
pub mod call;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use expr::{Expr, Primary};
pub use literal::{LitFloat, LitInt, LitSym, Literal};
pub use paren::Paren;
pub use unary::Unary;

use super::error::Error;

/// Marks an error as fatal. Used once a construct has consumed its first token, so that a
/// failure inside it is reported as-is instead of letting the caller try another alternative.
pub(crate) fn commit<T>(result: Result<T, Error>) -> Result<T, Error> {
    result.map_err(|mut err| {
        err.fatal = true;
        err
    })
}
