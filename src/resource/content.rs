//! In-memory store for content-addressed virtual documents.
//!
//! Languages whose tools accept documents served by the editor (rather than
//! files on disk) get a synthetic `vdoc-content://` uri. The store keeps only
//! the latest content per `(parent, language)` slot so it does not grow with
//! every edit.

use dashmap::DashMap;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use super::uri::{CONTENT_SCHEME, fnv1a};
use crate::error::{VdocError, VdocResult};
use crate::vdoc::VirtualDocument;

#[derive(Debug, Default)]
pub(crate) struct ContentStore {
    /// uri -> content
    contents: DashMap<String, String>,
    /// (parent uri, language name) -> uri currently published for the slot
    slots: DashMap<(String, String), String>,
}

impl ContentStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Publish a virtual document and return its uri.
    ///
    /// The uri is a pure function of parent, language and content: the same
    /// inputs always produce the same uri.
    pub(crate) fn publish(&self, vdoc: &VirtualDocument, parent: &Url) -> VdocResult<Url> {
        let language = vdoc.language();
        let uri = content_uri(parent, language.name(), language.extension(), vdoc.content())?;
        let key = uri.to_string();

        self.contents.insert(key.clone(), vdoc.content().to_string());
        let slot = (parent.to_string(), language.name().to_string());
        if let Some(previous) = self.slots.insert(slot, key.clone())
            && previous != key
        {
            self.contents.remove(&previous);
        }

        Ok(uri)
    }

    /// Current content behind a published uri
    pub(crate) fn get(&self, uri: &Url) -> Option<String> {
        self.contents.get(uri.as_str()).map(|entry| entry.value().clone())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.contents.len()
    }
}

/// `vdoc-content://{ext}/{hash}/{encoded parent}.{ext}`
fn content_uri(parent: &Url, language: &str, extension: &str, content: &str) -> VdocResult<Url> {
    let hash = fnv1a(&[parent.as_str(), language, content]);
    let encoded_parent = utf8_percent_encode(parent.as_str(), NON_ALPHANUMERIC);
    let raw = format!("{CONTENT_SCHEME}://{extension}/{hash:016x}/{encoded_parent}.{extension}");
    Url::parse(&raw).map_err(|err| VdocError::invalid_uri(format!("{raw}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{EmbeddedLanguage, ResourceKind};
    use crate::vdoc::build_from_lines;
    use std::sync::Arc;

    fn js() -> Arc<EmbeddedLanguage> {
        Arc::new(
            EmbeddedLanguage::new("javascript")
                .with_extension("js")
                .with_resource(ResourceKind::Content),
        )
    }

    fn parent() -> Url {
        Url::parse("file:///project/doc.qmd").unwrap()
    }

    #[test]
    fn uri_is_deterministic_and_content_sensitive() {
        let store = ContentStore::new();
        let first = store.publish(&build_from_lines(["let a = 1;"], &js()), &parent()).unwrap();
        let again = store.publish(&build_from_lines(["let a = 1;"], &js()), &parent()).unwrap();
        let changed = store.publish(&build_from_lines(["let a = 2;"], &js()), &parent()).unwrap();

        assert_eq!(first, again);
        assert_ne!(first, changed);
        assert_eq!(first.scheme(), CONTENT_SCHEME);
        assert!(first.as_str().ends_with(".js"), "{first}");
    }

    #[test]
    fn serves_latest_content_only() {
        let store = ContentStore::new();
        let old = store.publish(&build_from_lines(["old"], &js()), &parent()).unwrap();
        let new = store.publish(&build_from_lines(["new"], &js()), &parent()).unwrap();

        assert_eq!(store.get(&new).as_deref(), Some("new\n"));
        assert_eq!(store.get(&old), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn parents_have_separate_slots() {
        let store = ContentStore::new();
        let other = Url::parse("untitled:Untitled-1").unwrap();
        let a = store.publish(&build_from_lines(["x"], &js()), &parent()).unwrap();
        let b = store.publish(&build_from_lines(["x"], &js()), &other).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
