use ariadne::Fmt;
use deriv_attrs::ErrorKind;
use deriv_error::EXPR;
use crate::tokenizer::TokenKind;

/// The input contained no expression at all.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty input",
    labels = [format!("write an {} here", "expression".fg(EXPR))],
)]
pub struct EmptyInput;

/// The end of the input was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the input was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
    help = "operators must be written explicitly, as in `2*x`",
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis was not closed, or a closing parenthesis had no opening partner.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the unmatched parenthesis is an opening parenthesis.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A literal zero was used as a divisor.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = [format!("this {} is zero", "divisor".fg(EXPR))],
)]
pub struct DivisionByZero;

/// A known function was written without parentheses around its argument.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing parentheses after `{}`", name),
    labels = ["this function needs its argument in parentheses"],
    help = format!("write `{}(...)` instead", name),
)]
pub struct MissingCallParens {
    /// The name of the function.
    pub name: String,
}

/// A known function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` takes {} argument(s), but {} were given", name, expected, given),
    labels = ["this call"],
)]
pub struct WrongArgumentCount {
    /// The name of the function.
    pub name: String,

    /// The number of arguments the function takes.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A decimal literal was too large to be represented.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "number out of range",
    labels = [format!("this {} is too large", "number".fg(EXPR))],
)]
pub struct NumberOutOfRange;
