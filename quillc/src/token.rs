use std::fmt::Display;

use crate::span::Spand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Float(&'a str),
    Integer(&'a str),
    Ident(&'a str),
    String(&'a str),

    Comma,
    Colon,
    Semicolon,
    Minus,
    Eq,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    KwNull,
    KwTrue,
    KwFalse,
    KwLet,
}

pub type Token<'a> = Spand<TokenKind<'a>>;

impl<'a> TokenKind<'a> {
    #[must_use]
    pub fn try_kw(s: &'a str) -> Self {
        match s {
            "null" => TokenKind::KwNull,
            "true" => TokenKind::KwTrue,
            "false" => TokenKind::KwFalse,
            "let" => TokenKind::KwLet,
            _ => TokenKind::Ident(s),
        }
    }

    #[must_use]
    pub const fn can_recover(&self) -> bool {
        matches!(self, Self::KwLet)
    }
}

impl Display for TokenKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(x) | Self::Integer(x) | Self::Ident(x) | Self::String(x) => {
                write!(f, "{x}")
            }

            Self::Comma => write!(f, ","),
            Self::Colon => write!(f, ":"),
            Self::Semicolon => write!(f, ";"),
            Self::Minus => write!(f, "-"),
            Self::Eq => write!(f, "="),

            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),

            Self::KwNull => write!(f, "null"),
            Self::KwTrue => write!(f, "true"),
            Self::KwFalse => write!(f, "false"),
            Self::KwLet => write!(f, "let"),
        }
    }
}
