//! Embedded language descriptors.
//!
//! An [`EmbeddedLanguage`] tells the virtual document layer how to pad,
//! prefix and materialize documents for one language hosted in fenced
//! blocks. Descriptors are immutable and shared as `Arc`s handed out by a
//! [`LanguageRegistry`].

pub mod defaults;
pub mod info_string;
pub mod registry;

pub use info_string::{InfoString, parse_info_string};
pub use registry::{LanguageRegistry, StaticLanguageRegistry};

use serde::{Deserialize, Serialize};

/// How a virtual document of a language is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// In-memory content addressed by a synthetic uri
    Content,
    /// A real file on disk
    #[default]
    File,
}

/// Descriptor of a language embedded in fenced blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedLanguage {
    ids: Vec<String>,
    extension: String,
    resource: ResourceKind,
    empty_line: String,
    inject: Vec<String>,
    reuse_vdoc: bool,
    comment: Option<String>,
    local_temp_file: bool,
    can_format: bool,
}

impl EmbeddedLanguage {
    /// Create a file-backed language whose only id and extension is `id`
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            extension: id.clone(),
            ids: vec![id],
            resource: ResourceKind::File,
            empty_line: String::new(),
            inject: Vec::new(),
            reuse_vdoc: false,
            comment: None,
            local_temp_file: false,
            can_format: false,
        }
    }

    /// Add accepted info-string spellings
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            let alias = alias.into();
            if !self.ids.contains(&alias) {
                self.ids.push(alias);
            }
        }
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_resource(mut self, resource: ResourceKind) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_empty_line(mut self, empty_line: impl Into<String>) -> Self {
        self.empty_line = empty_line.into();
        self
    }

    pub fn with_inject<I, S>(mut self, inject: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inject = inject.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reuse_vdoc(mut self, reuse_vdoc: bool) -> Self {
        self.reuse_vdoc = reuse_vdoc;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_local_temp_file(mut self, local_temp_file: bool) -> Self {
        self.local_temp_file = local_temp_file;
        self
    }

    pub fn with_can_format(mut self, can_format: bool) -> Self {
        self.can_format = can_format;
        self
    }

    /// Canonical name: the first id
    pub fn name(&self) -> &str {
        &self.ids[0]
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Whether any id of `other` is also an id of this language
    pub fn shares_id_with(&self, other: &EmbeddedLanguage) -> bool {
        self.ids.iter().any(|id| other.ids.contains(id))
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Line used for host lines that do not belong to this language
    pub fn empty_line(&self) -> &str {
        &self.empty_line
    }

    /// Preamble prepended to every virtual document
    pub fn inject(&self) -> &[String] {
        &self.inject
    }

    /// Number of preamble lines; the line shift between host and virtual coordinates
    pub fn inject_len(&self) -> u32 {
        self.inject.len() as u32
    }

    /// The tool cannot tolerate its document being closed and reopened
    pub fn reuse_vdoc(&self) -> bool {
        self.reuse_vdoc
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn local_temp_file(&self) -> bool {
        self.local_temp_file
    }

    pub fn can_format(&self) -> bool {
        self.can_format
    }
}
