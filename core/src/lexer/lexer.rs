use std::{fmt::Display, path::PathBuf};

use lazy_regex::regex_is_match;

use crate::util::error::{LineInfo, LocationInfo};

use super::{
    error::LexerError,
    token::{TokenInfo, TokenKind},
};

/// Where the source text came from, used to name it in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    String,
    StdIn,
}

impl InputSource {
    pub fn name(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::String => "<string>".to_string(),
            InputSource::StdIn => "<stdin>".to_string(),
        }
    }
}

impl Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "file '{}'", path.display()),
            InputSource::String => write!(f, "string"),
            InputSource::StdIn => write!(f, "standard input"),
        }
    }
}

/// Operator symbols, matched longest first by [`Lexer::read_operator`].
const OPERATORS: [&str; 14] = [
    "->", "==", "!=", "<=", ">=", "+", "-", "*", "/", "<", ">", "=", "&", "|",
];

pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    peeked: Option<TokenInfo>,
    source: InputSource,
}

pub fn from_str(input: &str) -> Lexer {
    Lexer::new(input.to_string(), InputSource::String)
}

pub fn from_string(input: String, source: InputSource) -> Lexer {
    Lexer::new(input, source)
}

impl Lexer {
    pub fn new(content: String, source: InputSource) -> Self {
        Self {
            chars: content.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
            peeked: None,
            source,
        }
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

    fn location(&self) -> LocationInfo {
        LocationInfo::new(self.index, self.line, self.column)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char(0) {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_char(1) == Some('/') => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    pub fn peek_token(&mut self) -> Result<TokenInfo, LexerError> {
        if let Some(token) = &self.peeked {
            return Ok(token.clone());
        }
        let token = self.read_token()?;
        self.peeked = Some(token.clone());
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<TokenInfo, LexerError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.read_token()
    }

    fn read_token(&mut self) -> Result<TokenInfo, LexerError> {
        self.skip_whitespace_and_comments();
        let start = self.location();
        let Some(c) = self.peek_char(0) else {
            return Ok(TokenInfo {
                token: TokenKind::EndOfFile,
                info: LineInfo::new(
                    start.clone(),
                    LocationInfo::eof(start.index, start.line, start.column),
                ),
            });
        };
        let token = match c {
            ';' => self.single(TokenKind::SemiColon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            '"' => self.read_string(&start)?,
            c if c.is_ascii_digit() => self.read_number(&start)?,
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            c => match self.read_operator() {
                Some(op) => op,
                None => {
                    self.advance();
                    return Err(LexerError::unexpected_character(
                        c,
                        LineInfo::new(start, self.location()),
                    ));
                }
            },
        };
        let info = LineInfo::new(start, self.location());
        log::trace!("Token {:?} at {}", token, info.start);
        Ok(TokenInfo { token, info })
    }

    fn single(&mut self, token: TokenKind) -> TokenKind {
        self.advance();
        token
    }

    fn read_string(&mut self, start: &LocationInfo) -> Result<TokenKind, LexerError> {
        self.advance(); // "
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(TokenKind::String(value)),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(LexerError::unexpected_end_of_file(
            LineInfo::new(start.clone(), self.location()),
            &self.source,
        ))
    }

    fn read_number(&mut self, start: &LocationInfo) -> Result<TokenKind, LexerError> {
        let mut text = String::new();
        while let Some(c) = self.peek_char(0) {
            if c.is_ascii_digit() || c == '.' || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if regex_is_match!(r"^[0-9][0-9_]*(\.[0-9][0-9_]*)?$", &text) {
            Ok(TokenKind::Number(text))
        } else {
            Err(LexerError::invalid_number(
                &text,
                LineInfo::new(start.clone(), self.location()),
            ))
        }
    }

    fn read_identifier(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(c) = self.peek_char(0) {
            if c.is_alphanumeric() || c == '_' || c == '?' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match name.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier(name),
        }
    }

    /// Longest match among the known operators.
    fn read_operator(&mut self) -> Option<TokenKind> {
        let symbol = OPERATORS
            .iter()
            .filter(|op| {
                op.chars()
                    .enumerate()
                    .all(|(i, c)| self.peek_char(i) == Some(c))
            })
            .max_by_key(|op| op.chars().count())?
            .to_string();
        for _ in symbol.chars() {
            self.advance();
        }
        Some(TokenKind::Op(symbol))
    }
}
