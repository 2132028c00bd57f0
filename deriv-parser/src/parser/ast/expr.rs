use crate::{
    function::Function,
    parser::{
        ast::{binary::Binary, call::Call, literal::Literal, paren::Paren, unary::Unary},
        error::{kind, Error},
        token::op::Precedence,
        Parse,
        Parser,
    },
    return_if_ok,
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression that can be written in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `sin(x)`.
    Call(Call),

    /// A unary operation, such as `-x`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is an [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }

    /// Returns true if the expression is a numeric literal equal to zero.
    pub fn is_zero_literal(&self) -> bool {
        matches!(self, Expr::Literal(literal) if literal.is_zero())
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Some(token) = input.peek_token().filter(|token| token.kind == TokenKind::CloseParen) {
            return Err(Error::new(
                vec![token.span.clone()],
                kind::UnclosedParenthesis { opening: false },
            ));
        }

        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

/// An expression that binds tighter than every operator: a literal, a parenthesized expression
/// or a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    Literal(Literal),
    Paren(Paren),
    Call(Call),
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let _ = return_if_ok!(input.try_parse::<Call>().map(Self::Call));

        if let Some(token) = input.peek_token() {
            if token.kind == TokenKind::Name && Function::from_name(token.lexeme).is_some() {
                return Err(Error::new_fatal(vec![token.span.clone()], kind::MissingCallParens {
                    name: token.lexeme.to_string(),
                }));
            }
        }

        let _ = return_if_ok!(input.try_parse::<Literal>().map(Self::Literal));
        let _ = return_if_ok!(input.try_parse::<Paren>().map(Self::Paren));

        Err(match input.peek_token() {
            Some(token) => Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Name,
                    TokenKind::OpenParen,
                    TokenKind::Sub,
                ],
                found: token.kind,
            }),
            None => input.error(kind::UnexpectedEof),
        })
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
            Primary::Call(call) => Self::Call(call),
        }
    }
}
