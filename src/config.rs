//! Configuration of embedded languages.
//!
//! Settings come in layers merged by [`merge_all`]: built-in defaults < user
//! config < project config < client overrides. Language entries are merged
//! field by field, and the `_` entry supplies fields for every language.

pub mod load;
pub mod settings;
pub mod user;

pub use load::{
    SettingsEvent, SettingsEventKind, SettingsLoadOutcome, SettingsSource, load_settings,
    load_settings_from,
};
pub use settings::{LanguageConfig, VdocSettings};
pub use user::{
    CONFIG_FILE_NAME, UserConfigError, UserConfigResult, load_config_file, load_user_config,
    user_config_path,
};

use crate::language::defaults::default_languages;
use crate::language::{EmbeddedLanguage, StaticLanguageRegistry};
use std::collections::HashMap;

/// Key of the entry applying to every language
pub const WILDCARD_KEY: &str = "_";

/// Merge multiple settings in order; later entries take precedence.
pub fn merge_all(configs: &[Option<VdocSettings>]) -> Option<VdocSettings> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two settings, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<VdocSettings>,
    primary: Option<VdocSettings>,
) -> Option<VdocSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) | (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(VdocSettings {
            languages: merge_languages(fallback.languages, primary.languages),
            cleanup_stale_sessions: primary
                .cleanup_stale_sessions
                .or(fallback.cleanup_stale_sessions),
        }),
    }
}

fn merge_languages(
    mut fallback: HashMap<String, LanguageConfig>,
    primary: HashMap<String, LanguageConfig>,
) -> HashMap<String, LanguageConfig> {
    for (key, primary_config) in primary {
        match fallback.get_mut(&key) {
            Some(fallback_config) => {
                *fallback_config = merge_language_config(fallback_config, &primary_config);
            }
            None => {
                fallback.insert(key, primary_config);
            }
        }
    }
    fallback
}

/// Field-wise merge: `primary.or(fallback)` for every field
pub fn merge_language_config(fallback: &LanguageConfig, primary: &LanguageConfig) -> LanguageConfig {
    LanguageConfig {
        aliases: primary.aliases.clone().or_else(|| fallback.aliases.clone()),
        extension: primary.extension.clone().or_else(|| fallback.extension.clone()),
        resource: primary.resource.or(fallback.resource),
        empty_line: primary.empty_line.clone().or_else(|| fallback.empty_line.clone()),
        inject: primary.inject.clone().or_else(|| fallback.inject.clone()),
        reuse_vdoc: primary.reuse_vdoc.or(fallback.reuse_vdoc),
        comment: primary.comment.clone().or_else(|| fallback.comment.clone()),
        local_temp_file: primary.local_temp_file.or(fallback.local_temp_file),
        can_format: primary.can_format.or(fallback.can_format),
    }
}

/// Resolve a language key with wildcard fallback and merging.
///
/// - both `_` and `key` exist: merged, `key` wins per field
/// - only one exists: that one
/// - neither exists: None
pub fn resolve_language_with_wildcard(
    map: &HashMap<String, LanguageConfig>,
    key: &str,
) -> Option<LanguageConfig> {
    match (map.get(WILDCARD_KEY), map.get(key)) {
        (Some(w), Some(s)) => Some(merge_language_config(w, s)),
        (Some(w), None) => Some(w.clone()),
        (None, Some(s)) => Some(s.clone()),
        (None, None) => None,
    }
}

impl LanguageConfig {
    /// Apply these overrides on top of a descriptor
    pub fn apply(&self, mut language: EmbeddedLanguage) -> EmbeddedLanguage {
        if let Some(aliases) = &self.aliases {
            language = language.with_aliases(aliases.iter().cloned());
        }
        if let Some(extension) = &self.extension {
            language = language.with_extension(extension.clone());
        }
        if let Some(resource) = self.resource {
            language = language.with_resource(resource);
        }
        if let Some(empty_line) = &self.empty_line {
            language = language.with_empty_line(empty_line.clone());
        }
        if let Some(inject) = &self.inject {
            language = language.with_inject(inject.iter().cloned());
        }
        if let Some(reuse_vdoc) = self.reuse_vdoc {
            language = language.with_reuse_vdoc(reuse_vdoc);
        }
        if let Some(comment) = &self.comment {
            language = language.with_comment(comment.clone());
        }
        if let Some(local_temp_file) = self.local_temp_file {
            language = language.with_local_temp_file(local_temp_file);
        }
        if let Some(can_format) = self.can_format {
            language = language.with_can_format(can_format);
        }
        language
    }
}

/// Re-key entries naming an alias of a built-in language to its name.
///
/// An entry under the name wins per field over entries under its aliases;
/// among aliases the alphabetically later key wins.
fn canonical_language_keys(
    languages: &HashMap<String, LanguageConfig>,
    defaults: &[EmbeddedLanguage],
) -> HashMap<String, LanguageConfig> {
    let mut aliased: Vec<(&String, &str)> = languages
        .keys()
        .filter_map(|key| {
            defaults
                .iter()
                .find(|l| l.name() != key.as_str() && l.ids().iter().any(|id| id == key))
                .map(|l| (key, l.name()))
        })
        .collect();
    aliased.sort();

    let mut canonical: HashMap<String, LanguageConfig> = languages
        .iter()
        .filter(|(key, _)| aliased.iter().all(|(alias, _)| alias != key))
        .map(|(key, config)| (key.clone(), config.clone()))
        .collect();

    let mut from_aliases: HashMap<&str, LanguageConfig> = HashMap::new();
    for (alias, name) in aliased {
        log::warn!(
            target: "vdoc_bridge::config",
            "Configuration for '{}' applies to language '{}'",
            alias,
            name
        );
        let config = &languages[alias];
        let merged = match from_aliases.get(name) {
            Some(existing) => merge_language_config(existing, config),
            None => config.clone(),
        };
        from_aliases.insert(name, merged);
    }
    for (name, config) in from_aliases {
        let merged = match canonical.get(name) {
            Some(specific) => merge_language_config(&config, specific),
            None => config,
        };
        canonical.insert(name.to_string(), merged);
    }
    canonical
}

impl VdocSettings {
    /// Build a registry from the built-in languages plus configured ones.
    ///
    /// Built-in languages keep their order; languages only known from the
    /// configuration follow, sorted by key. A key naming an alias of a
    /// built-in language (`py`) configures that language (`python`).
    pub fn build_registry(&self) -> StaticLanguageRegistry {
        let mut registry = StaticLanguageRegistry::new();
        let defaults = default_languages();
        let languages = canonical_language_keys(&self.languages, &defaults);

        for language in &defaults {
            let configured = match resolve_language_with_wildcard(&languages, language.name()) {
                Some(config) => config.apply(language.clone()),
                None => language.clone(),
            };
            registry.register(configured);
        }

        let mut extra: Vec<&String> = languages
            .keys()
            .filter(|key| key.as_str() != WILDCARD_KEY)
            .filter(|key| defaults.iter().all(|l| l.name() != key.as_str()))
            .collect();
        extra.sort();
        for key in extra {
            let config = resolve_language_with_wildcard(&languages, key).unwrap_or_default();
            log::debug!(
                target: "vdoc_bridge::config",
                "Registering configured language '{}'",
                key
            );
            registry.register(config.apply(EmbeddedLanguage::new(key.clone())));
        }

        registry
    }

    /// Whether stale session directories should be removed on startup
    pub fn cleanup_stale_sessions(&self) -> bool {
        self.cleanup_stale_sessions.unwrap_or(true)
    }
}
