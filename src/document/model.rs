/// Read-only line access to a host document.
///
/// Lines are 0-based. Implementations must return the same text for the
/// same index for the duration of one synthesis call.
pub trait HostDocument {
    /// Number of lines, counting a trailing empty line after a final newline
    fn line_count(&self) -> usize;

    /// Text of the line at `index` without its line terminator
    fn line_at(&self, index: usize) -> Option<&str>;
}

/// Immutable snapshot of a host document's text, split into lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    /// Create a new document snapshot from text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(offset, _)| offset + 1));
        Self { text, line_starts }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterate over all lines in order
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.line_count()).filter_map(|index| self.line_at(index))
    }
}

impl HostDocument for TextDocument {
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_at(&self, index: usize) -> Option<&str> {
        let start = *self.line_starts.get(index)?;
        let end = match self.line_starts.get(index + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        let line = &self.text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }
}

impl HostDocument for [String] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}
