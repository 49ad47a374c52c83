use std::borrow::Cow;

use thiserror::Error;

use crate::ast::{Expr, ExprKind, Field, Stmt, StmtKind};
use crate::span::{Span, Spand};
use crate::token::{Token, TokenKind};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("expected escape")]
    ExpectedEscape,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("expected expression")]
    ExpectedExpr,
    #[error("expected identifier")]
    ExpectedIdent,
    #[error("expected record key")]
    ExpectedKey,
    #[error("expected '{0}'")]
    Expected(TokenKind<'static>),
    #[error("expression is nested too deeply")]
    TooDeep,
}

/// Deepest expression nesting accepted before parsing gives up.
pub const MAX_DEPTH: usize = 128;

pub type ParseError = Spand<ParseErrorKind>;
pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    tokens:  Vec<Token<'a>>,
    current: usize,
    depth:   usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub const fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    const fn finished(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn last_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .or_else(|| self.tokens.last())
            .map(|tk| tk.span)
            .unwrap_or_default()
    }

    fn peek_n(&self, n: isize) -> Option<Token<'a>> {
        self.tokens
            .get(self.current.saturating_add_signed(n))
            .copied()
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.peek_n(0)
    }

    fn check_kind(&self, kind: TokenKind<'static>) -> bool {
        self.peek().is_none_or(|tk| tk.kind == kind)
    }

    const fn eat(&mut self) {
        self.current += 1;
    }

    fn next(&mut self) -> ParseResult<Token<'a>> {
        let tk = self
            .peek()
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedEnd, self.last_span()))?;
        self.current += 1;
        Ok(tk)
    }

    fn next_if_kind(&mut self, tk: TokenKind<'static>) -> Option<Span> {
        match self.peek() {
            Some(Token { kind, span }) if kind == tk => {
                self.eat();
                Some(span)
            }
            _ => None,
        }
    }

    fn expect(&mut self, expect: TokenKind<'static>) -> ParseResult<Span> {
        let Token { kind, span } = self
            .next()
            .map_err(|err| ParseError::new(ParseErrorKind::Expected(expect), err.span))?;
        if kind == expect {
            Ok(span)
        } else {
            Err(ParseError::new(ParseErrorKind::Expected(expect), span))
        }
    }

    fn expect_name(&mut self) -> ParseResult<&'a str> {
        let Token { kind, span } = self
            .next()
            .map_err(|err| ParseError::new(ParseErrorKind::ExpectedIdent, err.span))?;
        match kind {
            TokenKind::Ident(id) => Ok(id),
            _ => Err(ParseError::new(ParseErrorKind::ExpectedIdent, span)),
        }
    }

    fn recover(&mut self) {
        while !(self.finished()
            || self.peek().is_some_and(|tk| tk.kind.can_recover())
            || self
                .peek_n(-1)
                .is_some_and(|tk| tk.kind == TokenKind::Semicolon))
        {
            self.eat();
        }
    }

    pub fn parse_all(&mut self) -> Result<Vec<Stmt<'a>>, Vec<ParseError>> {
        let mut stmts = Vec::new();
        let mut errors = Vec::new();

        while let Some(item) = Iterator::next(self) {
            match item {
                Ok(ok) => stmts.push(ok),
                Err(err) => {
                    errors.push(err);
                    self.recover();
                }
            }
        }

        if errors.is_empty() {
            Ok(stmts)
        } else {
            Err(errors)
        }
    }

    /// Takes the optional `;` ending a statement, widening `span` over it.
    fn finish_stmt(&mut self, span: Span) -> Span {
        self.next_if_kind(TokenKind::Semicolon)
            .map_or(span, |semi| span.join(semi))
    }

    pub fn parse_stmt(&mut self) -> ParseResult<Stmt<'a>> {
        match (self.peek(), self.peek_n(1)) {
            (
                Some(Token {
                    kind: TokenKind::KwLet,
                    span,
                }),
                _,
            ) => {
                self.eat();
                let name = self.expect_name()?;
                self.expect(TokenKind::Eq)?;
                let bind = self.parse_expr()?;
                let span = self.finish_stmt(span.join(bind.span));
                Ok(Stmt::new(StmtKind::Let { name, bind }, span))
            }
            (
                Some(Token {
                    kind: TokenKind::Ident(name),
                    span,
                }),
                Some(Token {
                    kind: TokenKind::Eq,
                    ..
                }),
            ) => {
                self.eat();
                self.eat();
                let value = self.parse_expr()?;
                let span = self.finish_stmt(span.join(value.span));
                Ok(Stmt::new(StmtKind::Assign { name, value }, span))
            }
            _ => {
                let expr = self.parse_expr()?;
                if let Some(semi) = self.next_if_kind(TokenKind::Semicolon) {
                    let span = expr.span.join(semi);
                    Ok(Stmt::new(StmtKind::Semi(expr), span))
                } else {
                    let span = expr.span;
                    Ok(Stmt::new(StmtKind::Expr(expr), span))
                }
            }
        }
    }

    pub fn parse_expr(&mut self) -> ParseResult<Expr<'a>> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(ParseErrorKind::TooDeep, self.last_span()));
        }
        self.depth += 1;
        let expr = self.parse_unary();
        self.depth -= 1;
        expr
    }

    fn parse_unary(&mut self) -> ParseResult<Expr<'a>> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Minus,
                span,
            }) => {
                self.eat();
                let expr = self.parse_expr()?;
                let span = span.join(expr.span);
                Ok(Expr::new(ExprKind::Neg(Box::new(expr)), span))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_delimited<D: Delim, T>(
        &mut self,
        _: D,
        opening: Span,
        parse: impl Fn(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<(Vec<T>, Span)> {
        let mut data = Vec::new();

        while !self.check_kind(D::closing()) {
            let res = parse(self)?;
            data.push(res);
            if self.next_if_kind(TokenKind::Comma).is_none() {
                break;
            }
        }

        let closing = self.expect(D::closing())?;
        let span = opening.join(closing);

        Ok((data, span))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.parse_primary()?;
        while let Some(open) = self.next_if_kind(TokenKind::LParen) {
            let (args, span) = self.parse_delimited(Paren, open, Self::parse_expr)?;
            let span = expr.span.join(span);
            let kind = ExprKind::Call {
                callee: Box::new(expr),
                args:   args.into_boxed_slice(),
            };
            expr = Expr::new(kind, span);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr<'a>> {
        let Token { kind, span } = self.next()?;

        let kind = match kind {
            TokenKind::KwNull => ExprKind::Null,
            TokenKind::KwTrue => ExprKind::Bool(true),
            TokenKind::KwFalse => ExprKind::Bool(false),
            TokenKind::Integer(lit) => ExprKind::Integer(Self::parse_number(lit, span)?),
            TokenKind::Float(lit) => ExprKind::Float(Self::parse_number(lit, span)?),
            TokenKind::String(s) => ExprKind::String(Self::parse_string(s, span)?),
            TokenKind::Ident(id) => ExprKind::Ident(id),
            TokenKind::LBracket => {
                let (items, span) = self.parse_delimited(Bracket, span, Self::parse_expr)?;
                let kind = ExprKind::List(items.into_boxed_slice());
                return Ok(Expr::new(kind, span));
            }
            TokenKind::LBrace => {
                let (fields, span) = self.parse_delimited(Brace, span, Self::parse_field)?;
                let kind = ExprKind::Record(fields.into_boxed_slice());
                return Ok(Expr::new(kind, span));
            }
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                let closing = self.expect(TokenKind::RParen)?;
                return Ok(Expr::new(expr.kind, span.join(closing)));
            }
            _ => return Err(ParseError::new(ParseErrorKind::ExpectedExpr, span)),
        };

        Ok(Expr::new(kind, span))
    }

    fn parse_field(&mut self) -> ParseResult<Field<'a>> {
        let Token { kind, span } = self
            .next()
            .map_err(|err| ParseError::new(ParseErrorKind::ExpectedKey, err.span))?;
        let key = match kind {
            TokenKind::Ident(id) => Cow::Borrowed(id),
            TokenKind::String(s) => Self::parse_string(s, span)?,
            _ => return Err(ParseError::new(ParseErrorKind::ExpectedKey, span)),
        };
        self.expect(TokenKind::Colon)?;
        let value = self.parse_expr()?;
        Ok(Field {
            key: Spand::new(key, span),
            value,
        })
    }

    fn parse_number<T: std::str::FromStr>(lit: &str, span: Span) -> ParseResult<T> {
        lit.parse()
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, span))
    }

    fn parse_string(s: &'a str, span: Span) -> ParseResult<Cow<'a, str>> {
        let s = &s[1..s.len() - 1];

        if !s.contains('\\') {
            return Ok(Cow::Borrowed(s));
        }

        let mut buf = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            let c = if c == '\\' {
                let c = chars
                    .next()
                    .ok_or_else(|| ParseError::new(ParseErrorKind::ExpectedEscape, span))?;
                match c {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '0' => '\0',
                    '\'' => '\'',
                    '"' => '"',
                    '\\' => '\\',
                    _ => return Err(ParseError::new(ParseErrorKind::InvalidEscape, span)),
                }
            } else {
                c
            };
            buf.push(c);
        }

        Ok(Cow::Owned(buf))
    }
}

trait Delim {
    fn closing() -> TokenKind<'static>;
}

struct Paren;
struct Bracket;
struct Brace;

impl Delim for Paren {
    fn closing() -> TokenKind<'static> {
        TokenKind::RParen
    }
}

impl Delim for Bracket {
    fn closing() -> TokenKind<'static> {
        TokenKind::RBracket
    }
}

impl Delim for Brace {
    fn closing() -> TokenKind<'static> {
        TokenKind::RBrace
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = ParseResult<Stmt<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished() {
            None
        } else {
            Some(self.parse_stmt())
        }
    }
}
