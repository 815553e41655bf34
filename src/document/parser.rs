//! Producing token streams from host documents.
//!
//! The markup grammar itself belongs to an external parser; [`FenceParser`]
//! recognizes only backtick and tilde code fences, which is all the virtual
//! document layer needs.

use std::future::Future;

use super::model::{HostDocument, TextDocument};
use super::token::{LanguageBlock, LineRange, Token};

/// Turns a host document into a token stream.
///
/// Parsing may suspend (for example to reuse an incremental parse tree);
/// implementations must return the same tokens for an unchanged document.
pub trait DocumentParser {
    fn parse(&self, document: &TextDocument) -> impl Future<Output = Vec<Token>> + Send;
}

/// Minimal parser for fenced code blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceParser;

impl FenceParser {
    pub fn new() -> Self {
        Self
    }

    /// Scan a document synchronously
    pub fn scan(&self, document: &dyn HostDocument) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut open: Option<(u32, Fence, String)> = None;
        let mut other_start: Option<u32> = None;
        let line_count = document.line_count() as u32;

        for line_no in 0..line_count {
            let line = document.line_at(line_no as usize).unwrap_or_default();
            match open.take() {
                Some((start, fence, info)) => {
                    if fence.is_closed_by(line) {
                        tokens.push(Token::Block(LanguageBlock::new(
                            LineRange::new(start, line_no + 1),
                            info,
                        )));
                    } else {
                        open = Some((start, fence, info));
                    }
                }
                None => {
                    if let Some((fence, info)) = Fence::opening(line) {
                        if let Some(start) = other_start.take() {
                            tokens.push(Token::Other {
                                range: LineRange::new(start, line_no),
                            });
                        }
                        open = Some((line_no, fence, info));
                    } else if other_start.is_none() {
                        other_start = Some(line_no);
                    }
                }
            }
        }

        // An unclosed fence runs to the end of the document
        if let Some((start, _, info)) = open {
            tokens.push(Token::Block(LanguageBlock::new(
                LineRange::new(start, line_count),
                info,
            )));
        }
        if let Some(start) = other_start {
            tokens.push(Token::Other {
                range: LineRange::new(start, line_count),
            });
        }

        tokens
    }
}

impl DocumentParser for FenceParser {
    fn parse(&self, document: &TextDocument) -> impl Future<Output = Vec<Token>> + Send {
        let tokens = self.scan(document);
        std::future::ready(tokens)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn opening(line: &str) -> Option<(Self, String)> {
        let rest = strip_indent(line)?;
        let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = rest.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        let info = rest[len..].trim();
        // Backtick fences may not carry backticks in their info string
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some((Self { marker, len }, info.to_string()))
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(rest) = strip_indent(line) else {
            return false;
        };
        let len = rest.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && rest[len..].trim().is_empty()
    }
}

/// Strip up to three spaces of indentation
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.chars().take_while(|c| *c == ' ').count();
    if indent > 3 {
        return None;
    }
    Some(&line[indent..])
}
