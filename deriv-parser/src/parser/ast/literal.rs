use crate::parser::{
    error::{kind, Error},
    token::{Float, Int, Name},
    Parse,
    Parser,
};
use crate::return_if_ok;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, kept as written so that it can be converted to an exact number.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The digits of the literal.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Int>()?;
        Ok(Self {
            value: token.lexeme,
            span: token.span,
        })
    }
}

/// A decimal literal with a fractional part and / or an exponent, such as `2.5` or `1e-3`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The literal as written.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitFloat {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Float>()?;
        if !token.lexeme.parse::<f64>().map_or(false, f64::is_finite) {
            return Err(Error::new_fatal(vec![token.span], kind::NumberOutOfRange));
        }
        Ok(Self {
            value: token.lexeme,
            span: token.span,
        })
    }
}

/// A symbol / identifier literal. Symbols are used to represent variables, constants and
/// function names.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Name>()?;
        Ok(Self {
            name: token.lexeme,
            span: token.span,
        })
    }
}

/// Represents a literal value written directly into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer literal, such as `42`.
    Integer(LitInt),

    /// A decimal literal, such as `0.5`.
    Float(LitFloat),

    /// A symbol, such as `x`.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
        }
    }

    /// Returns true if the literal is a number equal to zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Literal::Integer(int) => int.value.bytes().all(|b| b == b'0'),
            Literal::Float(float) => float.value.parse::<f64>().map_or(false, |value| value == 0.0),
            Literal::Symbol(_) => false,
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let _ = return_if_ok!(input.try_parse::<LitInt>().map(Literal::Integer));
        let _ = return_if_ok!(input.try_parse::<LitFloat>().map(Literal::Float));
        input.try_parse::<LitSym>().map(Literal::Symbol)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(int) => write!(f, "{}", int.value),
            Literal::Float(float) => write!(f, "{}", float.value),
            Literal::Symbol(name) => write!(f, "{}", name.name),
        }
    }
}
