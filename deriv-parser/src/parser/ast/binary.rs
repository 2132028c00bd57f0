use crate::parser::{
    ast::{commit, expr::Expr, unary::Unary},
    error::{kind, Error},
    token::op::{Associativity, BinOp, BinOpKind, Precedence},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand side, the operator, and the right-hand side of a potential
    /// binary expression, parse ahead to see if the right-hand side is incomplete.
    ///
    /// If we are parsing `1 + 2 * 3`, we first get the left-hand side `1`, the operator `+` and
    /// the right-hand side `2`. The operator after `2` has higher precedence than `+`, so the
    /// expression starting at `2` is parsed first, giving `2 * 3` as the right-hand side of the
    /// `1 +` node. Right-associative operators of equal precedence (`^`) are handled the same
    /// way, so that `2^3^4` is `2^(3^4)`.
    fn complete_rhs(input: &mut Parser, lhs: Expr, op: BinOp, mut rhs: Expr) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            let Ok(next_op) = input_ahead.try_parse::<BinOp>() else {
                break;
            };

            let binds_tighter = next_op.precedence() > precedence
                || (next_op.precedence() == precedence && next_op.associativity() == Associativity::Right);
            if !binds_tighter {
                break;
            }

            rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
        }

        if op.kind == BinOpKind::Div && rhs.innermost().is_zero_literal() {
            return Err(Error::new_fatal(vec![rhs.span()], kind::DivisionByZero));
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }))
    }

    /// Parses a binary expression with the given left-hand side, absorbing every following
    /// operator whose precedence is at least `precedence`.
    ///
    /// If no such operator follows, `lhs` is returned unchanged.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        loop {
            let mut input_ahead = input.clone();
            let op = match input_ahead.try_parse::<BinOp>() {
                Ok(op) if op.precedence() >= precedence => op,
                _ => break,
            };

            *input = input_ahead;
            let rhs = commit(Unary::parse_or_lower(input))?;
            lhs = Self::complete_rhs(input, lhs, op, rhs)?;
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}
