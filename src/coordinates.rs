//! Coordinate translation between host and virtual documents.
//!
//! Virtual documents keep host line indices and only prepend the language's
//! preamble, so translation is a constant line shift of `inject_len()`.
//! Columns never change.

use tower_lsp_server::ls_types::{Position, Range};

use crate::language::EmbeddedLanguage;

/// Host position to virtual position.
///
/// Returns `None` when the shifted line does not fit in a `u32`.
pub fn to_virtual(language: &EmbeddedLanguage, position: Position) -> Option<Position> {
    Some(Position {
        line: position.line.checked_add(language.inject_len())?,
        character: position.character,
    })
}

/// Virtual position to host position.
///
/// Returns `None` for positions inside the injected preamble, which have no
/// host counterpart.
pub fn to_host(language: &EmbeddedLanguage, position: Position) -> Option<Position> {
    Some(Position {
        line: position.line.checked_sub(language.inject_len())?,
        character: position.character,
    })
}

/// Host range to virtual range; `None` if either end overflows
pub fn to_virtual_range(language: &EmbeddedLanguage, range: Range) -> Option<Range> {
    Some(Range {
        start: to_virtual(language, range.start)?,
        end: to_virtual(language, range.end)?,
    })
}

/// Virtual range to host range; `None` if either end lies in the preamble
pub fn to_host_range(language: &EmbeddedLanguage, range: Range) -> Option<Range> {
    Some(Range {
        start: to_host(language, range.start)?,
        end: to_host(language, range.end)?,
    })
}
