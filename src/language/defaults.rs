//! Built-in embedded language table.
//!
//! Configuration entries are merged over these descriptors (see
//! [`crate::config`]), so every field here is only a default.

use super::{EmbeddedLanguage, ResourceKind};

/// Returns the built-in languages in registration order.
pub fn default_languages() -> Vec<EmbeddedLanguage> {
    vec![
        EmbeddedLanguage::new("python")
            .with_aliases(["py"])
            .with_extension("py")
            .with_comment("#")
            .with_inject(["# type: ignore", "# flake8: noqa"])
            .with_can_format(true),
        // The R language server shuts down when its document closes
        EmbeddedLanguage::new("r")
            .with_empty_line("#")
            .with_comment("#")
            .with_reuse_vdoc(true)
            .with_can_format(true),
        EmbeddedLanguage::new("julia")
            .with_extension("jl")
            .with_empty_line("#")
            .with_comment("#")
            .with_can_format(true),
        EmbeddedLanguage::new("sql").with_comment("--"),
        EmbeddedLanguage::new("bash")
            .with_aliases(["sh", "shell"])
            .with_extension("sh")
            .with_comment("#"),
        EmbeddedLanguage::new("ruby")
            .with_aliases(["rb"])
            .with_extension("rb")
            .with_comment("#"),
        EmbeddedLanguage::new("rust")
            .with_aliases(["rs"])
            .with_extension("rs")
            .with_comment("//"),
        EmbeddedLanguage::new("java").with_comment("//"),
        EmbeddedLanguage::new("cpp")
            .with_aliases(["c++"])
            .with_comment("//"),
        EmbeddedLanguage::new("go").with_comment("//"),
        EmbeddedLanguage::new("csharp")
            .with_aliases(["cs"])
            .with_extension("cs")
            .with_comment("//"),
        EmbeddedLanguage::new("lua").with_comment("--"),
        EmbeddedLanguage::new("javascript")
            .with_aliases(["js", "ojs"])
            .with_extension("js")
            .with_resource(ResourceKind::Content)
            .with_comment("//"),
        EmbeddedLanguage::new("typescript")
            .with_aliases(["ts"])
            .with_extension("ts")
            .with_resource(ResourceKind::Content)
            .with_comment("//"),
        EmbeddedLanguage::new("html").with_resource(ResourceKind::Content),
        EmbeddedLanguage::new("css").with_resource(ResourceKind::Content),
        EmbeddedLanguage::new("dot")
            .with_aliases(["graphviz"])
            .with_comment("//"),
        EmbeddedLanguage::new("mermaid")
            .with_extension("mmd")
            .with_comment("%%"),
    ]
}
