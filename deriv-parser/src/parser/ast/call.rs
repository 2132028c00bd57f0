use crate::{
    function::Function,
    parser::{
        ast::{commit, expr::Expr, literal::LitSym},
        error::{kind, Error},
        token::{CloseParen, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sin(x)` or `f(x, y)`.
///
/// Calls to names outside the known [`Function`] vocabulary are accepted here; whether they can
/// be differentiated is decided later.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the known function being called, if the name is part of the vocabulary.
    pub fn function(&self) -> Option<Function> {
        Function::from_name(&self.name.name)
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open_paren = input.try_parse::<OpenParen>()?;

        if let Some(close) = input.peek_token().filter(|token| token.kind == TokenKind::CloseParen) {
            return Err(Error::new_fatal(
                vec![open_paren.span.start..close.span.end],
                kind::EmptyParenthesis,
            ));
        }

        let args = commit(input.try_parse_delimited::<Expr>(TokenKind::Comma))?;
        let close_paren = input.try_parse::<CloseParen>()
            .map_err(|_| Error::new_fatal(
                vec![open_paren.span.clone()],
                kind::UnclosedParenthesis { opening: true },
            ))?;

        let span = name.span.start..close_paren.span.end;
        if let Some(func) = Function::from_name(&name.name) {
            if args.len() != Function::ARITY {
                return Err(Error::new_fatal(vec![span], kind::WrongArgumentCount {
                    name: func.name().to_string(),
                    expected: Function::ARITY,
                    given: args.len(),
                }));
            }
        }

        Ok(Self {
            name,
            args,
            span,
            paren_span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name.name)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                write!(f, "{}, ", arg)?;
            }
            last.fmt(f)?;
        }
        write!(f, ")")
    }
}
