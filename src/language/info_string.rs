//! Fence info string parsing.
//!
//! Executable blocks name their language in braces (`{python}`,
//! `{r, echo=FALSE}`, `{=html}` for raw blocks). A bare name (```` ```python ````)
//! or a class (`{.python}`) marks an illustrative block that is displayed
//! but never run, so tooling ignores it.

use regex::Regex;
use std::sync::LazyLock;

static EXECUTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\s*(=)?([A-Za-z0-9_+\-]+)(?:[\s,}]|$)").expect("executable info regex")
});

static ILLUSTRATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{*\s*[.=]?([A-Za-z0-9_+\-]+)").expect("illustrative info regex")
});

/// Parsed fence info string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoString {
    /// Language identifier with braces and markers removed
    pub name: String,
    /// Whether the block is run (and therefore eligible for tooling)
    pub executable: bool,
    /// `{=format}` raw block
    pub raw: bool,
}

/// Parse a fence info string; `None` when it names no language
pub fn parse_info_string(info: &str) -> Option<InfoString> {
    let info = info.trim();
    if let Some(caps) = EXECUTABLE.captures(info) {
        return Some(InfoString {
            name: caps[2].to_string(),
            executable: true,
            raw: caps.get(1).is_some(),
        });
    }
    ILLUSTRATIVE.captures(info).map(|caps| InfoString {
        name: caps[1].to_string(),
        executable: false,
        raw: false,
    })
}
