//! Locating fenced blocks and their languages in a token stream.

use std::sync::Arc;

use tower_lsp_server::ls_types::Position;

use crate::document::token::blocks;
use crate::document::{LanguageBlock, LineRange, Token};
use crate::language::{EmbeddedLanguage, LanguageRegistry};

/// Innermost block whose content lines contain `position`.
///
/// Fence lines themselves are not part of a block's content, so a position
/// on an opening or closing fence yields `None`. Among nested candidates the
/// shortest range wins; equal lengths prefer the later start.
pub fn block_at(tokens: &[Token], position: Position) -> Option<&LanguageBlock> {
    blocks(tokens)
        .filter(|block| block.range.contains_content_line(position.line))
        .fold(None, |best: Option<&LanguageBlock>, candidate| match best {
            Some(current) if !is_inner(&candidate.range, &current.range) => Some(current),
            _ => Some(candidate),
        })
}

fn is_inner(candidate: &LineRange, current: &LineRange) -> bool {
    candidate.len() < current.len()
        || (candidate.len() == current.len() && candidate.start > current.start)
}

/// Embedded language at `position`.
///
/// `None` outside blocks, on fences, in illustrative (non-executable) blocks
/// and in blocks whose language is not registered.
pub fn language_at<R>(
    tokens: &[Token],
    registry: &R,
    position: Position,
) -> Option<Arc<EmbeddedLanguage>>
where
    R: LanguageRegistry + ?Sized,
{
    let block = block_at(tokens, position)?;
    if !registry.is_executable(block) {
        return None;
    }
    registry.language_of(block)
}

/// Content lines `[start + 1, end - 1)` of the block at `position`
pub fn code_range_at(tokens: &[Token], position: Position) -> Option<LineRange> {
    let range = block_at(tokens, position)?.range;
    Some(LineRange::new(range.start + 1, range.end - 1))
}

/// Language with the most executable blocks in the document.
///
/// Ties go to the language whose first block appears earliest.
pub fn dominant_language<R>(tokens: &[Token], registry: &R) -> Option<Arc<EmbeddedLanguage>>
where
    R: LanguageRegistry + ?Sized,
{
    dominant_language_by(tokens, registry, |_| true)
}

/// [`dominant_language`] restricted to languages accepted by `filter`
pub fn dominant_language_by<R, F>(
    tokens: &[Token],
    registry: &R,
    filter: F,
) -> Option<Arc<EmbeddedLanguage>>
where
    R: LanguageRegistry + ?Sized,
    F: Fn(&EmbeddedLanguage) -> bool,
{
    // Ordered by first occurrence; the scan below keeps the earliest on ties
    let mut tally: Vec<(Arc<EmbeddedLanguage>, usize)> = Vec::new();

    for block in blocks(tokens).filter(|block| registry.is_executable(block)) {
        let Some(language) = registry.language_of(block) else {
            continue;
        };
        if !filter(language.as_ref()) {
            continue;
        }
        match tally.iter_mut().find(|(seen, _)| seen.name() == language.name()) {
            Some((_, count)) => *count += 1,
            None => tally.push((language, 1)),
        }
    }

    let mut winner: Option<(Arc<EmbeddedLanguage>, usize)> = None;
    for (language, count) in tally {
        if winner.as_ref().is_none_or(|(_, best)| count > *best) {
            winner = Some((language, count));
        }
    }
    winner.map(|(language, _)| language)
}

/// Predicate matching executable blocks written in any spelling of `language`
pub fn blocks_of_language<'a, R>(
    registry: &'a R,
    language: &'a EmbeddedLanguage,
) -> impl Fn(&LanguageBlock) -> bool + 'a
where
    R: LanguageRegistry + ?Sized,
{
    move |block| {
        registry.is_executable(block)
            && registry
                .language_of(block)
                .is_some_and(|resolved| resolved.shares_id_with(language))
    }
}
