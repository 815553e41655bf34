//! Virtual document synthesis.
//!
//! A virtual document is a single-language view of a host document: every
//! host line keeps its index, lines that belong to other languages (or to
//! the host markup) are replaced by the language's empty line, and the
//! language's preamble is prepended. Positions inside blocks therefore map
//! to the virtual document by a fixed line shift (see [`crate::coordinates`]).

use std::sync::Arc;

use tower_lsp_server::ls_types::Position;

use crate::document::token::blocks;
use crate::document::{HostDocument, Token};
use crate::language::{EmbeddedLanguage, LanguageRegistry};
use crate::locator::{blocks_of_language, language_at};

/// Number of padding lines appended after the host lines
pub const TRAILING_PADDING_LINES: usize = 2;

/// Synthesized single-language content; replaced, never patched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDocument {
    language: Arc<EmbeddedLanguage>,
    content: String,
}

impl VirtualDocument {
    pub fn language(&self) -> &Arc<EmbeddedLanguage> {
        &self.language
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Lines of the content (the final newline does not start a new line)
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }
}

/// Build the virtual document of `language` for a host document snapshot.
///
/// Only executable blocks of `language` (in any of its spellings) contribute
/// lines. Fence lines are excluded, and block ranges reaching past the end
/// of the document are clamped to it.
pub fn build<H, R>(
    host: &H,
    tokens: &[Token],
    registry: &R,
    language: &Arc<EmbeddedLanguage>,
) -> VirtualDocument
where
    H: HostDocument + ?Sized,
    R: LanguageRegistry + ?Sized,
{
    let line_count = host.line_count();
    let mut lines = vec![language.empty_line(); line_count];
    let is_target = blocks_of_language(registry, language);

    for block in blocks(tokens).filter(|block| is_target(block)) {
        if !block.range.is_valid() {
            continue;
        }
        let first = block.range.start as usize + 1;
        let last = (block.range.end as usize - 1).min(line_count);
        for index in first..last {
            if let Some(text) = host.line_at(index) {
                lines[index] = text;
            }
        }
    }

    lines.extend(std::iter::repeat_n(
        language.empty_line(),
        TRAILING_PADDING_LINES,
    ));
    build_from_lines(lines, language)
}

/// Build a virtual document from an already filtered line buffer.
///
/// Only prepends the preamble and joins the lines; no padding is added.
pub fn build_from_lines<I, S>(lines: I, language: &Arc<EmbeddedLanguage>) -> VirtualDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut content = String::new();
    for line in language.inject() {
        content.push_str(line);
        content.push('\n');
    }
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }
    VirtualDocument {
        language: Arc::clone(language),
        content,
    }
}

/// Virtual document for the embedded language at `position`, if any
pub fn virtual_doc_at<H, R>(
    host: &H,
    tokens: &[Token],
    registry: &R,
    position: Position,
) -> Option<VirtualDocument>
where
    H: HostDocument + ?Sized,
    R: LanguageRegistry + ?Sized,
{
    let language = language_at(tokens, registry, position)?;
    Some(build(host, tokens, registry, &language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FenceParser, LanguageBlock, LineRange, TextDocument};
    use crate::language::StaticLanguageRegistry;

    fn registry() -> StaticLanguageRegistry {
        StaticLanguageRegistry::from_languages([
            EmbeddedLanguage::new("python")
                .with_aliases(["py"])
                .with_inject(["# type: ignore", "# flake8: noqa"]),
            EmbeddedLanguage::new("r").with_empty_line("#"),
        ])
    }

    #[test]
    fn extracts_block_lines_at_host_indices() {
        let text = "# Doc\n\n```{r}\nx <- 1\ny <- 2\n```\ntext\n";
        let host = TextDocument::new(text);
        let tokens = FenceParser::new().scan(&host);
        let registry = registry();
        let r = registry.resolve("r").unwrap();

        let vdoc = build(&host, &tokens, &registry, &r);

        assert_eq!(
            vdoc.content(),
            "#\n#\n#\nx <- 1\ny <- 2\n#\n#\n#\n#\n#\n"
        );
        assert_eq!(vdoc.lines().count(), host.line_count() + 2);
    }

    #[test]
    fn preamble_shifts_content() {
        let host = TextDocument::new("```{python}\nprint(1)\n```");
        let tokens = FenceParser::new().scan(&host);
        let registry = registry();
        let python = registry.resolve("python").unwrap();

        let vdoc = build(&host, &tokens, &registry, &python);
        let lines: Vec<_> = vdoc.lines().collect();

        assert_eq!(
            lines,
            vec!["# type: ignore", "# flake8: noqa", "", "print(1)", "", "", ""]
        );
        assert_eq!(lines.len(), host.line_count() + 2 + 2);
    }

    #[test]
    fn other_languages_and_illustrative_blocks_are_padded() {
        let text = "```{python}\na = 1\n```\n```{r}\nb <- 2\n```\n```python\nc = 3\n```";
        let host = TextDocument::new(text);
        let tokens = FenceParser::new().scan(&host);
        let registry = registry();
        let python = registry.resolve("python").unwrap();

        let vdoc = build(&host, &tokens, &registry, &python);
        let lines: Vec<_> = vdoc.lines().skip(2).collect();

        assert_eq!(lines[1], "a = 1");
        assert_eq!(lines[4], "", "r block is padded");
        assert_eq!(lines[7], "", "illustrative block is padded");
    }

    #[test]
    fn aliased_blocks_share_one_document() {
        let text = "```{py}\na = 1\n```\n```{python}\nb = 2\n```";
        let host = TextDocument::new(text);
        let tokens = FenceParser::new().scan(&host);
        let registry = registry();
        let python = registry.resolve("python").unwrap();

        let vdoc = build(&host, &tokens, &registry, &python);
        let lines: Vec<_> = vdoc.lines().skip(2).collect();

        assert_eq!(lines[1], "a = 1");
        assert_eq!(lines[4], "b = 2");
    }

    #[test]
    fn out_of_bounds_block_is_clamped() {
        let host = TextDocument::new("```{r}\nx\ny");
        let tokens = vec![Token::Block(LanguageBlock::new(LineRange::new(0, 40), "{r}"))];
        let registry = registry();
        let r = registry.resolve("r").unwrap();

        let vdoc = build(&host, &tokens, &registry, &r);

        assert_eq!(vdoc.content(), "#\nx\ny\n#\n#\n");
    }

    #[test]
    fn invalid_and_detached_blocks_contribute_nothing() {
        let host = TextDocument::new("a\nb\nc");
        let tokens = vec![
            Token::Block(LanguageBlock::new(LineRange::new(2, 1), "{r}")),
            Token::Block(LanguageBlock::new(LineRange::new(10, 14), "{r}")),
        ];
        let registry = registry();
        let r = registry.resolve("r").unwrap();

        let vdoc = build(&host, &tokens, &registry, &r);

        assert_eq!(vdoc.content(), "#\n#\n#\n#\n#\n");
    }

    #[test]
    fn build_from_lines_only_prepends_preamble() {
        let registry = registry();
        let python = registry.resolve("python").unwrap();
        let vdoc = build_from_lines(["x = 1"], &python);
        assert_eq!(vdoc.content(), "# type: ignore\n# flake8: noqa\nx = 1\n");
        assert!(Arc::ptr_eq(vdoc.language(), &python));
    }

    #[test]
    fn virtual_doc_at_requires_language() {
        let host = TextDocument::new("text\n```{r}\n1\n```");
        let tokens = FenceParser::new().scan(&host);
        let registry = registry();

        let inside = virtual_doc_at(&host, &tokens, &registry, Position::new(2, 0));
        assert_eq!(inside.unwrap().language().name(), "r");
        assert!(virtual_doc_at(&host, &tokens, &registry, Position::new(0, 0)).is_none());
    }
}
