use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct LocationInfo {
    /// Character offset into the source.
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub eof: bool,
}

impl LocationInfo {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
            eof: false,
        }
    }

    pub fn eof(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
            eof: true,
        }
    }
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self {
            index: 0,
            line: 1,
            column: 1,
            eof: false,
        }
    }
}

impl Display for LocationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct LineInfo {
    pub start: LocationInfo,
    pub end: LocationInfo,
}

impl LineInfo {
    pub fn new(start: LocationInfo, end: LocationInfo) -> Self {
        Self { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn join(&self, other: &LineInfo) -> LineInfo {
        let start = if self.start.index < other.start.index {
            self.start.clone()
        } else {
            other.start.clone()
        };
        let end = if self.end.index > other.end.index {
            self.end.clone()
        } else {
            other.end.clone()
        };

        LineInfo { start, end }
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.start.index..self.end.index.max(self.start.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseErrorLabel {
    pub message: String,
    pub info: LineInfo,
}

/// The shared payload of every error reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseError {
    pub message: String,
    pub info: LineInfo,
    pub hint: Option<String>,
    pub labels: Vec<BaseErrorLabel>,
}

impl BaseError {
    pub fn new(message: String, info: LineInfo) -> Self {
        Self {
            message,
            info,
            hint: None,
            labels: Vec::new(),
        }
    }

    pub fn with_hint(self, hint: String) -> Self {
        Self {
            hint: Some(hint),
            ..self
        }
    }

    pub fn with_label(self, message: String, info: LineInfo) -> Self {
        let mut labels = self.labels;
        labels.push(BaseErrorLabel { message, info });
        Self { labels, ..self }
    }
}

impl Display for BaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.info.start)
    }
}
