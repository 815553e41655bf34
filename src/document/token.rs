//! Tokens of a parsed host document.
//!
//! Only fenced blocks matter to virtual document synthesis; every other
//! construct the markup parser reports is kept as [`Token::Other`] so the
//! stream stays in document order.

/// Half-open range of host lines `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A range is usable when it spans at least one line
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        !self.is_valid()
    }

    /// Whether `line` is strictly between the opening and closing fence
    pub fn contains_content_line(&self, line: u32) -> bool {
        line > self.start && line.saturating_add(1) < self.end
    }
}

/// A fenced region of the host document.
///
/// `range` covers both fences: line `start` is the opening fence and line
/// `end - 1` the closing one. `info` is the raw fence info string, for
/// example `{python}` or `{=html}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBlock {
    pub range: LineRange,
    pub info: String,
}

impl LanguageBlock {
    pub fn new(range: LineRange, info: impl Into<String>) -> Self {
        Self {
            range,
            info: info.into(),
        }
    }
}

/// One entry of the parser's token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Block(LanguageBlock),
    Other { range: LineRange },
}

impl Token {
    pub fn as_block(&self) -> Option<&LanguageBlock> {
        match self {
            Token::Block(block) => Some(block),
            Token::Other { .. } => None,
        }
    }

    pub fn range(&self) -> LineRange {
        match self {
            Token::Block(block) => block.range,
            Token::Other { range } => *range,
        }
    }
}

/// Iterate over the fenced blocks of a token stream in document order
pub fn blocks(tokens: &[Token]) -> impl Iterator<Item = &LanguageBlock> {
    tokens.iter().filter_map(Token::as_block)
}
