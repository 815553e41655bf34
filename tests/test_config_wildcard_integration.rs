//! Integration tests for `languages._` wildcard inheritance and layered
//! settings, seen from outside the config module.

use std::collections::HashMap;

use serde_json::json;
use tempfile::TempDir;
use vdoc_bridge::config::load::load_settings_from;
use vdoc_bridge::config::{
    LanguageConfig, SettingsEventKind, SettingsSource, VdocSettings,
    resolve_language_with_wildcard,
};
use vdoc_bridge::language::{LanguageRegistry, ResourceKind};

/// ```toml
/// [languages._]
/// localTempFile = true
///
/// [languages.python]
/// extension = "pyi"
/// ```
#[test]
fn test_language_inherits_from_wildcard() {
    let mut languages = HashMap::new();
    languages.insert(
        "_".to_string(),
        LanguageConfig {
            local_temp_file: Some(true),
            ..Default::default()
        },
    );
    languages.insert(
        "python".to_string(),
        LanguageConfig {
            extension: Some("pyi".to_string()),
            ..Default::default()
        },
    );

    let resolved = resolve_language_with_wildcard(&languages, "python").unwrap();
    assert_eq!(resolved.local_temp_file, Some(true));
    assert_eq!(resolved.extension.as_deref(), Some("pyi"));

    let registry = VdocSettings {
        languages,
        ..Default::default()
    }
    .build_registry();

    let python = registry.resolve("py").unwrap();
    assert!(python.local_temp_file());
    assert_eq!(python.extension(), "pyi");
    // Untouched built-in fields survive
    assert_eq!(python.inject().len(), 2);

    let bash = registry.resolve("bash").unwrap();
    assert!(bash.local_temp_file(), "wildcard applies to every language");
}

#[test]
fn test_specific_setting_overrides_wildcard() {
    let mut languages = HashMap::new();
    languages.insert(
        "_".to_string(),
        LanguageConfig {
            reuse_vdoc: Some(true),
            ..Default::default()
        },
    );
    languages.insert(
        "julia".to_string(),
        LanguageConfig {
            reuse_vdoc: Some(false),
            ..Default::default()
        },
    );

    let registry = VdocSettings {
        languages,
        ..Default::default()
    }
    .build_registry();

    assert!(!registry.resolve("julia").unwrap().reuse_vdoc());
    assert!(registry.resolve("python").unwrap().reuse_vdoc());
}

#[test]
fn test_wildcard_only_for_unknown_key() {
    let mut languages = HashMap::new();
    languages.insert(
        "_".to_string(),
        LanguageConfig {
            empty_line: Some("#".to_string()),
            ..Default::default()
        },
    );

    let resolved = resolve_language_with_wildcard(&languages, "haskell").unwrap();
    assert_eq!(resolved.empty_line.as_deref(), Some("#"));
    assert!(resolve_language_with_wildcard(&HashMap::new(), "haskell").is_none());
}

#[test]
fn test_project_file_and_override_build_registry() {
    let root = TempDir::new().unwrap();
    std::fs::write(
        root.path().join("vdoc-bridge.toml"),
        r#"
[languages._]
localTempFile = true

[languages.stata]
aliases = ["do"]
extension = "do"
emptyLine = "*"

[languages.typescript]
type = "file"
"#,
    )
    .unwrap();

    let outcome = load_settings_from(
        None,
        Some(root.path()),
        Some((
            SettingsSource::InitializationOptions,
            json!({ "languages": { "stata": { "extension": "ado" } } }),
        )),
    );

    assert!(
        outcome
            .events
            .iter()
            .all(|event| event.kind == SettingsEventKind::Info),
        "{:?}",
        outcome.events
    );

    let registry = outcome.settings.build_registry();
    let stata = registry.resolve("do").unwrap();
    assert_eq!(stata.name(), "stata");
    assert_eq!(stata.extension(), "ado");
    assert_eq!(stata.empty_line(), "*");
    assert!(stata.local_temp_file());

    let typescript = registry.resolve("ts").unwrap();
    assert_eq!(typescript.resource(), ResourceKind::File);
    assert!(outcome.settings.cleanup_stale_sessions());
}

#[test]
fn test_broken_project_file_falls_back_to_defaults() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("vdoc-bridge.toml"), "languages = 3").unwrap();

    let outcome = load_settings_from(None, Some(root.path()), None);

    assert_eq!(outcome.settings, VdocSettings::default());
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, SettingsEventKind::Warning);

    let registry = outcome.settings.build_registry();
    assert_eq!(registry.resolve("python").unwrap().extension(), "py");
}
