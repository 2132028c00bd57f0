use deriv_compute::symbolic::DiffError;
use thiserror::Error;

/// The error produced when the input text could not be parsed.
///
/// Its [`reason`](deriv_error::Error::reason) describes what went wrong, and its
/// [`position`](deriv_error::Error::position) is the byte offset in the input where it happened.
pub type ParseError = deriv_error::Error;

/// Any error a [`Calculator`](crate::Calculator) operation can return.
///
/// Errors are values returned to the caller; none of them affect the state of the calculator, and
/// none of them are recorded to its history.
#[derive(Debug, Error)]
pub enum Error {
    /// The expression could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The expression could not be differentiated.
    #[error("differentiation error: {0}")]
    Diff(#[from] DiffError),

    /// A name in a list of variables is not a valid symbol name.
    #[error("`{0}` is not a valid variable name")]
    InvalidVariable(String),
}

impl Error {
    /// Returns the parse error, if this is one.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the differentiation error, if this is one.
    pub fn as_diff_error(&self) -> Option<&DiffError> {
        match self {
            Self::Diff(err) => Some(err),
            _ => None,
        }
    }
}
