use crate::language::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-language overrides; every field falls back to the built-in descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inject: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_vdoc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_temp_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_format: Option<bool>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VdocSettings {
    /// Language key (or `_` for all languages) -> overrides
    #[serde(default)]
    pub languages: HashMap<String, LanguageConfig>,
    /// Remove session directories left by crashed sessions on startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_stale_sessions: Option<bool>,
}
