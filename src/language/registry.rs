use super::EmbeddedLanguage;
use super::info_string::parse_info_string;
use crate::document::LanguageBlock;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves fence info strings to embedded language descriptors.
///
/// The provided methods derive executability and names from the block's
/// info string; registries backed by a richer parser may override them.
pub trait LanguageRegistry {
    /// Look up a language by any of its ids
    fn resolve(&self, identifier: &str) -> Option<Arc<EmbeddedLanguage>>;

    /// Whether a block is eligible for tooling (as opposed to illustrative)
    fn is_executable(&self, block: &LanguageBlock) -> bool {
        parse_info_string(&block.info).is_some_and(|info| info.executable)
    }

    /// Language identifier written in the block's info string
    fn name_of(&self, block: &LanguageBlock) -> Option<String> {
        parse_info_string(&block.info).map(|info| info.name)
    }

    /// Resolve the language of a block; `None` when unregistered
    fn language_of(&self, block: &LanguageBlock) -> Option<Arc<EmbeddedLanguage>> {
        self.name_of(block).and_then(|name| self.resolve(&name))
    }
}

/// Registry over a fixed set of languages
#[derive(Debug, Clone, Default)]
pub struct StaticLanguageRegistry {
    languages: Vec<Arc<EmbeddedLanguage>>,
    by_id: HashMap<String, usize>,
}

impl StaticLanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in language table
    pub fn with_defaults() -> Self {
        Self::from_languages(super::defaults::default_languages())
    }

    pub fn from_languages(languages: impl IntoIterator<Item = EmbeddedLanguage>) -> Self {
        let mut registry = Self::new();
        for language in languages {
            registry.register(language);
        }
        registry
    }

    /// Register a language; its ids take over from earlier registrations
    pub fn register(&mut self, language: EmbeddedLanguage) -> Arc<EmbeddedLanguage> {
        let index = self.languages.len();
        for id in language.ids() {
            if let Some(previous) = self.by_id.insert(id.clone(), index) {
                log::debug!(
                    target: "vdoc_bridge::language",
                    "Language id '{}' moved from '{}' to '{}'",
                    id,
                    self.languages[previous].name(),
                    language.name()
                );
            }
        }
        let language = Arc::new(language);
        self.languages.push(Arc::clone(&language));
        language
    }

    /// All registered languages in registration order
    pub fn languages(&self) -> impl Iterator<Item = &Arc<EmbeddedLanguage>> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl LanguageRegistry for StaticLanguageRegistry {
    fn resolve(&self, identifier: &str) -> Option<Arc<EmbeddedLanguage>> {
        self.by_id
            .get(identifier)
            .map(|index| Arc::clone(&self.languages[*index]))
    }
}
