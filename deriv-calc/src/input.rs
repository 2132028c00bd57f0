//! Parsing of the comma-separated variable and order lists used for partial derivatives.

use deriv_compute::symbolic::DiffError;
use deriv_parser::{tokenizer::{tokenize, TokenKind}, Function};
use crate::Error;

/// Splits a comma-separated list into its trimmed, non-empty items.
fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Returns true if the text is a single name token that is not a known function name.
fn is_symbol_name(text: &str) -> bool {
    let mut lexer = tokenize(text);
    matches!(lexer.next(), Some(Ok(TokenKind::Name)))
        && lexer.span() == (0..text.len())
        && Function::from_name(text).is_none()
}

/// Returns [`Error::InvalidVariable`] if the name cannot be differentiated with respect to.
pub(crate) fn check_variable(name: &str) -> Result<(), Error> {
    if is_symbol_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidVariable(name.to_string()))
    }
}

/// Parses a comma-separated list of variable names, such as `x, y`.
///
/// Returns [`Error::InvalidVariable`] for the first item that is not a valid symbol name.
pub fn parse_variable_list(text: &str) -> Result<Vec<String>, Error> {
    split_list(text)
        .map(|name| check_variable(name).map(|()| name.to_string()))
        .collect()
}

/// Parses a comma-separated list of derivative orders, such as `1, 2`.
///
/// Returns [`DiffError::InvalidOrder`] for the first item that is not a positive integer.
pub fn parse_order_list(text: &str) -> Result<Vec<i64>, Error> {
    split_list(text)
        .map(|order| {
            order.parse::<i64>()
                .ok()
                .filter(|order| *order > 0)
                .ok_or_else(|| Error::from(DiffError::InvalidOrder(order.to_string())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn variables() {
        assert_eq!(parse_variable_list("x, y").unwrap(), ["x", "y"]);
        assert_eq!(parse_variable_list(" t ,").unwrap(), ["t"]);
        assert_eq!(parse_variable_list("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn invalid_variables() {
        for input in ["x, 2", "x y", "sin", "x+y"] {
            assert!(
                matches!(parse_variable_list(input), Err(Error::InvalidVariable(_))),
                "`{}` should be rejected",
                input,
            );
        }
    }

    #[test]
    fn orders() {
        assert_eq!(parse_order_list("1, 2").unwrap(), [1, 2]);
        assert_eq!(parse_order_list("3").unwrap(), [3]);
    }

    #[test]
    fn invalid_orders() {
        for (input, bad) in [("1, 1.5", "1.5"), ("0", "0"), ("-2", "-2"), ("two", "two")] {
            let err = parse_order_list(input).unwrap_err();
            assert_eq!(
                err.as_diff_error(),
                Some(&DiffError::InvalidOrder(bad.to_string())),
            );
        }
    }
}
