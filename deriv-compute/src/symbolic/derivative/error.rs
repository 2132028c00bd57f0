use deriv_parser::Function;
use levenshtein::levenshtein;
use thiserror::Error;

/// The largest edit distance at which a known function name is suggested for an unknown one.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// An error that can occur while differentiating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The expression calls a function with no differentiation rule.
    #[error("cannot differentiate unknown function `{0}`")]
    UnknownFunction(String),

    /// A known function was called with the wrong number of arguments. The parser rejects this,
    /// but expressions built by hand can still contain it.
    #[error("`{function}` takes 1 argument, but {given} were given")]
    ArgumentCount {
        /// The name of the function.
        function: String,

        /// The number of arguments that were given.
        given: usize,
    },

    /// The order of the derivative was not a positive integer.
    #[error("the order of a derivative must be a positive integer, found `{0}`")]
    InvalidOrder(String),

    /// A different number of variables and orders were given for a partial derivative.
    #[error("{variables} variable(s) were given, but {orders} order(s); give one order per variable")]
    ArityMismatch {
        /// The number of variables.
        variables: usize,

        /// The number of orders.
        orders: usize,
    },
}

impl DiffError {
    /// Creates an [`DiffError::InvalidOrder`] error for a numeric order.
    pub fn invalid_order(order: i64) -> Self {
        Self::InvalidOrder(order.to_string())
    }

    /// If the error is an unknown function whose name is close to a known one, returns the name
    /// of the known function.
    pub fn suggestion(&self) -> Option<&'static str> {
        let Self::UnknownFunction(name) = self else {
            return None;
        };

        Function::ALL.iter()
            .map(|function| (function.name(), levenshtein(name, function.name())))
            .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(_, distance)| *distance)
            .map(|(name, _)| name)
    }
}
