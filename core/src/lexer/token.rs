use std::fmt::{Debug, Display};

use crate::util::error::LineInfo;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    EndOfFile,
    // Declaration terminators and separators
    SemiColon,
    Colon,
    Comma,
    // Literals
    Identifier(String),
    Number(String),
    String(String),
    Boolean(bool),
    Null,
    // Grouping
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    // Operators and type punctuation such as `->`, `|` and `&`
    Op(String),
}

impl TokenKind {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, TokenKind::Identifier(name) if name == keyword)
    }

    pub fn is_op(&self, symbol: &str) -> bool {
        matches!(self, TokenKind::Op(op) if op == symbol)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfFile => write!(f, "end of input"),
            Self::SemiColon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::Comma => write!(f, ","),
            Self::Identifier(s) => write!(f, "{}", s),
            Self::Number(s) => write!(f, "{}", s),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Null => write!(f, "null"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Op(s) => write!(f, "{}", s),
        }
    }
}

/// A token together with the span it was read from.
#[derive(Clone)]
pub struct TokenInfo {
    pub token: TokenKind,
    pub info: LineInfo,
}

impl Debug for TokenInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} at {:?}", self.token, self.info)
    }
}
