use crate::parser::{
    ast::{binary::Binary, commit, expr::{Expr, Primary}},
    error::Error,
    token::op::UnaryOp,
    Parser,
};
use crate::return_if_ok;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-x`.
///
/// Unary expressions do not implement [`Parse`](crate::parser::Parse) directly; use
/// [`Unary::parse_or_lower`], which falls back to a primary expression when no operator is
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parse a prefix unary expression. The operand absorbs any binary operator that binds
    /// tighter than the unary operator, so `-x^2` parses as `-(x^2)`.
    pub fn parse_right(input: &mut Parser) -> Result<Self, Error> {
        let op = input.try_parse::<UnaryOp>()?;
        let start_span = op.span.start;
        let lhs = commit(Unary::parse_or_lower(input))?;
        let operand = commit(Binary::parse_expr(input, lhs, op.precedence()))?;
        let end_span = operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span: start_span..end_span,
        })
    }

    /// Parses a unary expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let _ = return_if_ok!(input.try_parse_with_fn(Self::parse_right).map(Expr::Unary));
        input.try_parse::<Primary>().map(Expr::from)
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.op.fmt(f)?;
        self.operand.fmt(f)
    }
}
