//! Reads mathematical expressions written in standard infix notation, such as
//! `x^3 + 3*x` or `sin(x)*exp(x)`.
//!
//! The [`tokenizer`] splits the input into tokens, and the [`parser`] builds an abstract syntax
//! tree from them, keeping track of where every node came from so that errors can point at the
//! offending region of the input.

pub mod function;
pub mod parser;
pub mod tokenizer;

pub use function::Function;
pub use parser::{parse, Parser};
