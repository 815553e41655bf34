//! Layered settings loading.
//!
//! Loading never fails: problems are reported as [`SettingsEvent`]s and the
//! offending layer is skipped.

use super::settings::VdocSettings;
use super::user::{CONFIG_FILE_NAME, load_config_file, user_config_path};
use super::merge_all;
use serde_json::Value;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }

    /// Forward the event to the log facade
    pub fn log(&self) {
        match self.kind {
            SettingsEventKind::Info => {
                log::info!(target: "vdoc_bridge::config", "{}", self.message)
            }
            SettingsEventKind::Warning => {
                log::warn!(target: "vdoc_bridge::config", "{}", self.message)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsSource {
    InitializationOptions,
    ClientConfiguration,
}

impl SettingsSource {
    fn description(self) -> &'static str {
        match self {
            SettingsSource::InitializationOptions => "initialization options",
            SettingsSource::ClientConfiguration => "client configuration",
        }
    }
}

#[derive(Default, Debug)]
pub struct SettingsLoadOutcome {
    pub settings: VdocSettings,
    pub events: Vec<SettingsEvent>,
}

/// Load settings using the user config from the standard location
pub fn load_settings(
    root_path: Option<&Path>,
    override_settings: Option<(SettingsSource, Value)>,
) -> SettingsLoadOutcome {
    let user_path = user_config_path();
    load_settings_from(user_path.as_deref(), root_path, override_settings)
}

/// Load settings: user config < project `vdoc-bridge.toml` < overrides.
///
/// Built-in language defaults sit below every layer; they are applied when
/// the registry is built.
pub fn load_settings_from(
    user_config: Option<&Path>,
    root_path: Option<&Path>,
    override_settings: Option<(SettingsSource, Value)>,
) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let user = user_config.and_then(|path| load_file_with_events(path, "user config", &mut events));

    let project = root_path.and_then(|root| {
        load_file_with_events(&root.join(CONFIG_FILE_NAME), "project config", &mut events)
    });

    let overrides = override_settings
        .and_then(|(source, value)| parse_override_settings(source, value, &mut events));

    let settings = merge_all(&[user, project, overrides]).unwrap_or_default();
    SettingsLoadOutcome { settings, events }
}

fn load_file_with_events(
    path: &Path,
    label: &str,
    events: &mut Vec<SettingsEvent>,
) -> Option<VdocSettings> {
    match load_config_file(path) {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info(format!(
                "Loaded {} from {}",
                label,
                path.display()
            )));
            Some(settings)
        }
        // No file is the zero-config case
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!("Failed to load {label}: {err}")));
            None
        }
    }
}

fn parse_override_settings(
    source: SettingsSource,
    value: Value,
    events: &mut Vec<SettingsEvent>,
) -> Option<VdocSettings> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<VdocSettings>(value) {
        Ok(settings) => {
            events.push(SettingsEvent::info(format!(
                "Parsed {} as VdocSettings",
                source.description()
            )));
            Some(settings)
        }
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to parse {}: {}",
                source.description(),
                err
            )));
            None
        }
    }
}
