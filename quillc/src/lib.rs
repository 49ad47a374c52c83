use crate::lexer::{LexError, Lexer};
use crate::parser::{ParseError, Parser};

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

#[derive(Debug, Clone)]
pub enum CompileError {
    Lex(Vec<LexError>),
    Parse(Vec<ParseError>),
}

impl From<Vec<LexError>> for CompileError {
    fn from(value: Vec<LexError>) -> Self {
        Self::Lex(value)
    }
}

impl From<Vec<ParseError>> for CompileError {
    fn from(value: Vec<ParseError>) -> Self {
        Self::Parse(value)
    }
}

/// Lexes and parses a whole script.
pub fn parse(source: &str) -> Result<Vec<ast::Stmt<'_>>, CompileError> {
    let tokens = Lexer::new(source).lex_all()?;
    let stmts = Parser::new(tokens).parse_all()?;
    Ok(stmts)
}
