//! Virtual documents for languages embedded in fenced blocks.
//!
//! A host document (for example Markdown with ```` ```{python} ```` blocks)
//! is projected onto one embedded language at a time. The projection keeps
//! host line numbers so a single-language tool can run against it and its
//! results map straight back:
//!
//! 1. [`locator::language_at`] finds the language under the cursor,
//! 2. [`vdoc::build`] synthesizes the virtual document,
//! 3. [`resource::VirtualDocResources::resolve_uri`] materializes it,
//! 4. [`coordinates::to_virtual`] translates the cursor,
//! 5. [`resource::with_uri`] runs the tool request and disposes of the resource.

pub mod config;
pub mod coordinates;
pub mod document;
pub mod error;
pub mod language;
pub mod locator;
pub mod resource;
pub mod vdoc;

pub use config::{VdocSettings, load_settings};
pub use document::{
    DocumentParser, FenceParser, HostDocument, LanguageBlock, LineRange, TextDocument, Token,
};
pub use error::{VdocError, VdocResult};
pub use language::{EmbeddedLanguage, LanguageRegistry, ResourceKind, StaticLanguageRegistry};
pub use resource::{Cleanup, VirtualDocAction, VirtualDocResources, VirtualDocUri, with_uri};
pub use vdoc::VirtualDocument;
