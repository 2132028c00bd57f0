pub mod ast;
pub mod error;
pub mod token;

use error::{kind, Error};
use deriv_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Returns the value of the given expression if it is [`Ok`], or propagates the error if it is
/// fatal. Otherwise, the non-fatal error is returned from the macro so that the caller can try
/// another alternative.
#[macro_export]
macro_rules! return_if_ok {
    ($expr:expr) => {
        match $expr {
            Ok(value) => return Ok(value),
            Err(err) if err.fatal => return Err(err),
            Err(err) => err,
        }
    };
}

/// A high-level parser for mathematical expressions. This is the type to use to parse an
/// arbitrary piece of input.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current non-whitespace token, or the end of the source code if
    /// there are no more tokens.
    pub fn span(&self) -> Range<usize> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the next non-whitespace token without consuming it.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns true if the stream has no non-whitespace tokens left.
    pub fn is_exhausted(&self) -> bool {
        self.peek_token().is_none()
    }

    /// Advances the cursor to the next non-whitespace token and returns it. Returns an
    /// [`kind::UnexpectedEof`] error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. If parsing fails, the cursor
    /// is reset to where it was before the call.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value with the given function, resetting the cursor on failure.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        let result = f(self);
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Parses one or more values separated by the given delimiter token. A delimiter must be
    /// followed by another value.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let mut values = vec![self.try_parse::<T>()?];

        while self.peek_token().map_or(false, |token| token.kind == delimiter) {
            self.next_token()?;
            values.push(self.try_parse::<T>()?);
        }

        Ok(values)
    }

    /// Parses a value from the stream, and requires that nothing other than whitespace follows
    /// it.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;

        match self.peek_token() {
            None => Ok(value),
            Some(token) if token.kind == TokenKind::CloseParen => Err(Error::new_fatal(
                vec![token.span.clone()],
                kind::UnclosedParenthesis { opening: false },
            )),
            Some(_) => Err(self.error(kind::ExpectedEof)),
        }
    }
}

/// Any type that can be parsed from a stream of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by private parsing functions. To parse a value from outside,
    /// use [`Parser::try_parse`], which restores the stream on failure.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// Parses a complete expression from the given source.
///
/// Input that is empty or consists only of whitespace produces a [`kind::EmptyInput`] error.
pub fn parse(source: &str) -> Result<ast::Expr, Error> {
    let mut parser = Parser::new(source);
    if parser.is_exhausted() {
        return Err(Error::new(vec![parser.eof_span()], kind::EmptyInput));
    }
    parser.try_parse_full::<ast::Expr>()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{Binary, Call, Expr, LitFloat, LitInt, LitSym, Literal, Paren, Unary};
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value: value.to_string(), span }))
    }

    fn binary(lhs: Expr, kind: BinOpKind, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16").unwrap(), int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14").unwrap(), Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn binary_left_associativity() {
        assert_eq!(parse("a - b - c").unwrap(), binary(
            binary(sym("a", 0..1), BinOpKind::Sub, 2..3, sym("b", 4..5)),
            BinOpKind::Sub,
            6..7,
            sym("c", 8..9),
        ));
    }

    #[test]
    fn binary_precedence() {
        assert_eq!(parse("1 + 2 * 3").unwrap(), binary(
            int("1", 0..1),
            BinOpKind::Add,
            2..3,
            binary(int("2", 4..5), BinOpKind::Mul, 6..7, int("3", 8..9)),
        ));
    }

    #[test]
    fn exponent_right_associativity() {
        assert_eq!(parse("2^3^4").unwrap(), binary(
            int("2", 0..1),
            BinOpKind::Exp,
            1..2,
            binary(int("3", 2..3), BinOpKind::Exp, 3..4, int("4", 4..5)),
        ));
    }

    #[test]
    fn double_star_is_power() {
        assert_eq!(parse("x**2").unwrap(), binary(sym("x", 0..1), BinOpKind::Exp, 1..3, int("2", 3..4)));
    }

    #[test]
    fn negation_looser_than_power() {
        assert_eq!(parse("-x^2").unwrap(), Expr::Unary(Unary {
            operand: Box::new(binary(sym("x", 1..2), BinOpKind::Exp, 2..3, int("2", 3..4))),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn negation_tighter_than_product() {
        let neg_x = Expr::Unary(Unary {
            operand: Box::new(sym("x", 1..2)),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..2,
        });
        assert_eq!(parse("-x*y").unwrap(), binary(neg_x, BinOpKind::Mul, 2..3, sym("y", 3..4)));
    }

    #[test]
    fn negative_exponent() {
        let neg_two = Expr::Unary(Unary {
            operand: Box::new(int("2", 3..4)),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 2..3 },
            span: 2..4,
        });
        assert_eq!(parse("x^-2").unwrap(), binary(sym("x", 0..1), BinOpKind::Exp, 1..2, neg_two));
    }

    #[test]
    fn call_and_paren() {
        assert_eq!(parse("sin((x))").unwrap(), Expr::Call(Call {
            name: LitSym { name: "sin".to_string(), span: 0..3 },
            args: vec![Expr::Paren(Paren {
                expr: Box::new(sym("x", 5..6)),
                span: 4..7,
            })],
            span: 0..8,
            paren_span: 3..8,
        }));
    }

    #[test]
    fn unknown_function_call() {
        let expr = parse("f(x, y)").unwrap();
        let Expr::Call(call) = expr else { panic!("expected a call") };
        assert_eq!(call.name.name, "f");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn display_round_trip() {
        let source = "-(x + 1)^2 * sin(3*y) / f(x, 2.5)";
        let expr = parse(source).unwrap();
        let printed = expr.to_string();
        assert_eq!(printed, "-(x + 1) ^ 2 * sin(3 * y) / f(x, 2.5)");
        assert_eq!(parse(&printed).unwrap().to_string(), printed);
    }

    #[test]
    fn unclosed_paren_in_call() {
        let err = parse("sin(x").unwrap_err();
        assert_eq!(err.kind_as::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis { opening: true }));
        assert_eq!(err.position(), 3);
        assert!(err.reason().contains("parenthesis"));
    }

    #[test]
    fn unclosed_paren_group() {
        let err = parse("(x + 1").unwrap_err();
        assert_eq!(err.kind_as::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis { opening: true }));
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn stray_close_paren() {
        let err = parse("x + 1)").unwrap_err();
        assert_eq!(err.kind_as::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis { opening: false }));
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn empty_input() {
        assert!(parse("").unwrap_err().kind_as::<kind::EmptyInput>().is_some());
        assert!(parse("   ").unwrap_err().kind_as::<kind::EmptyInput>().is_some());
    }

    #[test]
    fn empty_parens() {
        assert!(parse("()").unwrap_err().kind_as::<kind::EmptyParenthesis>().is_some());
        assert!(parse("f()").unwrap_err().kind_as::<kind::EmptyParenthesis>().is_some());
    }

    #[test]
    fn division_by_literal_zero() {
        let err = parse("x/0").unwrap_err();
        assert!(err.kind_as::<kind::DivisionByZero>().is_some());
        assert_eq!(err.position(), 2);

        let err = parse("1 / (0.0)").unwrap_err();
        assert!(err.kind_as::<kind::DivisionByZero>().is_some());

        assert!(parse("x/(0 + 1)").is_ok());
    }

    #[test]
    fn unexpected_token() {
        let err = parse("x + $").unwrap_err();
        assert_eq!(err.kind_as::<kind::UnexpectedToken>().map(|k| k.found), Some(TokenKind::Symbol));
        assert_eq!(err.position(), 4);

        let err = parse("x * * y").unwrap_err();
        assert!(err.kind_as::<kind::UnexpectedToken>().is_some());
    }

    #[test]
    fn trailing_operator() {
        let err = parse("x +").unwrap_err();
        assert!(err.kind_as::<kind::UnexpectedEof>().is_some());
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn implicit_multiplication_rejected() {
        let err = parse("2 x").unwrap_err();
        assert!(err.kind_as::<kind::ExpectedEof>().is_some());
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn known_function_needs_parens() {
        let err = parse("sin x").unwrap_err();
        assert_eq!(
            err.kind_as::<kind::MissingCallParens>(),
            Some(&kind::MissingCallParens { name: "sin".to_string() }),
        );
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn known_function_arity() {
        let err = parse("cos(x, y)").unwrap_err();
        assert_eq!(err.kind_as::<kind::WrongArgumentCount>(), Some(&kind::WrongArgumentCount {
            name: "cos".to_string(),
            expected: 1,
            given: 2,
        }));
    }

    #[test]
    fn huge_decimal_rejected() {
        let err = parse("x + 1e999").unwrap_err();
        assert!(err.kind_as::<kind::NumberOutOfRange>().is_some());
        assert_eq!(err.position(), 4);
    }

    #[test]
    fn trailing_comma_rejected() {
        assert!(parse("f(x,)").is_err());
    }
}
