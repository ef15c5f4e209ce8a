use crate::{parser::error::ParseError, util::error::LineInfo};

use super::lexer::InputSource;

#[derive(Debug, Clone)]
pub struct LexerError {
    pub message: String,
    pub info: LineInfo,
}

impl LexerError {
    pub fn new(message: String, info: LineInfo) -> Self {
        Self { message, info }
    }

    pub fn unexpected_end_of_file(info: LineInfo, source: &InputSource) -> Self {
        Self::new(format!("Unexpected end of {}", source), info)
    }

    pub fn unexpected_character(c: char, info: LineInfo) -> Self {
        Self::new(format!("Unexpected character '{}'", c), info)
    }

    pub fn invalid_number(num: &str, info: LineInfo) -> Self {
        Self::new(format!("Invalid number literal '{}'", num), info)
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        ParseError::new(err.message, err.info)
    }
}
