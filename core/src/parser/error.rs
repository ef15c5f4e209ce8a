use std::fmt::Display;

use crate::util::error::{BaseError, LineInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub inner: BaseError,
}

impl ParseError {
    pub fn new(message: String, info: LineInfo) -> Self {
        Self {
            inner: BaseError::new(message, info),
        }
    }

    pub fn with_hint(self, hint: String) -> Self {
        Self {
            inner: self.inner.with_hint(hint),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for ParseError {}
