//! Materializing virtual documents for external tools.
//!
//! [`VirtualDocResources::resolve_uri`] picks a backing resource for a
//! virtual document from the language descriptor and the requested action:
//!
//! | language resource | action               | `reuse_vdoc` | result                          |
//! |-------------------|----------------------|--------------|---------------------------------|
//! | content           | any                  | any          | content uri, no cleanup         |
//! | file              | format, definition   | false        | transient file, removed on cleanup |
//! | file              | anything else        | any          | persistent file, no cleanup     |
//! | file              | format, definition   | true         | persistent file, no cleanup     |
//!
//! Callers run their tool request inside [`with_uri`], which disposes of
//! transient resources once the request settles.

pub mod cleanup;
pub(crate) mod content;
pub(crate) mod temp_file;
pub mod uri;

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tempfile::TempPath;
use url::Url;

use crate::config::VdocSettings;
use crate::error::VdocResult;
use crate::language::{EmbeddedLanguage, ResourceKind};
use crate::vdoc::VirtualDocument;
use content::ContentStore;
pub use temp_file::PersistentKey;
use temp_file::TempFileStore;

/// Kind of tool request a virtual document is materialized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualDocAction {
    Completion,
    Hover,
    Signature,
    Definition,
    Format,
}

impl VirtualDocAction {
    /// Actions that prefer a transient resource
    pub fn prefers_transient(self) -> bool {
        matches!(self, VirtualDocAction::Format | VirtualDocAction::Definition)
    }
}

/// Whether a request gets a transient (per-request) resource.
///
/// Languages with `reuse_vdoc` always get the persistent resource.
pub fn is_local(language: &EmbeddedLanguage, action: VirtualDocAction) -> bool {
    action.prefers_transient() && !language.reuse_vdoc()
}

type CleanupFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

enum CleanupKind {
    RemoveFile(TempPath),
    Custom(Box<dyn FnOnce() -> CleanupFuture + Send>),
}

/// Disposal action of a transient resource.
///
/// [`Cleanup::run`] consumes the value, so it runs at most once. A transient
/// file whose cleanup is dropped without running is still removed.
pub struct Cleanup(CleanupKind);

impl Cleanup {
    fn remove_file(path: TempPath) -> Self {
        Cleanup(CleanupKind::RemoveFile(path))
    }

    /// Cleanup running an arbitrary async action
    pub fn custom<F, Fut>(action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::io::Result<()>> + Send + 'static,
    {
        Cleanup(CleanupKind::Custom(Box::new(move || {
            Box::pin(action()) as CleanupFuture
        })))
    }

    /// File removed by this cleanup, if it removes one
    pub fn path(&self) -> Option<&Path> {
        match &self.0 {
            CleanupKind::RemoveFile(path) => Some(path),
            CleanupKind::Custom(_) => None,
        }
    }

    pub async fn run(self) -> std::io::Result<()> {
        match self.0 {
            CleanupKind::RemoveFile(path) => tokio::task::spawn_blocking(move || path.close())
                .await
                .map_err(std::io::Error::other)?,
            CleanupKind::Custom(action) => action().await,
        }
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            CleanupKind::RemoveFile(path) => {
                f.debug_tuple("RemoveFile").field(&path.to_path_buf()).finish()
            }
            CleanupKind::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Handle to a materialized virtual document.
///
/// The receiver owns the cleanup until it hands the handle to [`with_uri`].
#[derive(Debug)]
pub struct VirtualDocUri {
    uri: Url,
    cleanup: Option<Cleanup>,
}

impl VirtualDocUri {
    pub fn new(uri: Url, cleanup: Option<Cleanup>) -> Self {
        Self { uri, cleanup }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn cleanup(&self) -> Option<&Cleanup> {
        self.cleanup.as_ref()
    }

    pub fn into_parts(self) -> (Url, Option<Cleanup>) {
        (self.uri, self.cleanup)
    }
}

/// Run `action` with the handle's uri, then dispose of the handle.
///
/// The cleanup runs exactly once after `action` settles, whatever it
/// returns. A failing cleanup is logged and never replaces the action's
/// output.
pub async fn with_uri<T, F, Fut>(handle: VirtualDocUri, action: F) -> T
where
    F: FnOnce(Url) -> Fut,
    Fut: Future<Output = T>,
{
    let (uri, cleanup) = handle.into_parts();
    let output = action(uri.clone()).await;
    if let Some(cleanup) = cleanup
        && let Err(err) = cleanup.run().await
    {
        log::warn!(
            target: "vdoc_bridge::resource",
            "Failed to dispose of virtual document {}: {}",
            uri,
            err
        );
    }
    output
}

/// Backing resources of the virtual documents of one session.
///
/// Holds the content-addressed store and the persistent file store. Dropping
/// a value created with [`VirtualDocResources::new`] removes its session
/// directory together with every persistent file in it.
#[derive(Debug)]
pub struct VirtualDocResources {
    contents: ContentStore,
    temp_files: TempFileStore,
}

impl VirtualDocResources {
    /// Resources with a fresh session directory under the OS temp dir
    pub fn new() -> VdocResult<Self> {
        Ok(Self {
            contents: ContentStore::new(),
            temp_files: TempFileStore::new()?,
        })
    }

    /// Resources for a new session configured by `settings`.
    ///
    /// Stale session directories of crashed sessions are removed first
    /// unless `cleanupStaleSessions` is off.
    pub fn for_settings(settings: &VdocSettings) -> VdocResult<Self> {
        if settings.cleanup_stale_sessions() {
            cleanup::startup_cleanup();
        }
        Self::new()
    }

    /// Resources keeping persistent files in `dir`, which the caller owns
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            contents: ContentStore::new(),
            temp_files: TempFileStore::in_dir(dir),
        }
    }

    /// Materialize `vdoc` for a request of kind `action` on `parent`.
    ///
    /// Content-addressed languages never allocate anything to dispose of.
    /// File-backed languages get a transient file next to the host (see
    /// [`is_local`]) or the persistent file of `(parent, language)`,
    /// overwritten with the new content.
    pub async fn resolve_uri(
        &self,
        vdoc: &VirtualDocument,
        parent: &Url,
        action: VirtualDocAction,
    ) -> VdocResult<VirtualDocUri> {
        let language = vdoc.language();
        match language.resource() {
            ResourceKind::Content => {
                let uri = self.contents.publish(vdoc, parent)?;
                Ok(VirtualDocUri::new(uri, None))
            }
            ResourceKind::File if is_local(language, action) => {
                let (uri, path) = self.temp_files.create_transient(vdoc, parent).await?;
                Ok(VirtualDocUri::new(uri, Some(Cleanup::remove_file(path))))
            }
            ResourceKind::File => {
                let uri = self.temp_files.write_persistent(vdoc, parent).await?;
                Ok(VirtualDocUri::new(uri, None))
            }
        }
    }

    /// Current content of a content-addressed virtual document
    pub fn content(&self, uri: &Url) -> Option<String> {
        self.contents.get(uri)
    }

    /// Persistent file of `(parent, language)`, once materialized
    pub fn persistent_path(&self, parent: &Url, language: &str) -> Option<PathBuf> {
        self.temp_files
            .persistent_path(&PersistentKey::new(parent, language))
    }

    /// Directory holding persistent files
    pub fn session_dir(&self) -> &Path {
        self.temp_files.session_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[case::format(VirtualDocAction::Format, false, true)]
    #[case::definition(VirtualDocAction::Definition, false, true)]
    #[case::hover(VirtualDocAction::Hover, false, false)]
    #[case::completion(VirtualDocAction::Completion, false, false)]
    #[case::signature(VirtualDocAction::Signature, false, false)]
    #[case::definition_reuse_vdoc(VirtualDocAction::Definition, true, false)]
    #[case::format_reuse_vdoc(VirtualDocAction::Format, true, false)]
    fn lifecycle_policy_table(
        #[case] action: VirtualDocAction,
        #[case] reuse_vdoc: bool,
        #[case] expected_local: bool,
    ) {
        let language = EmbeddedLanguage::new("python").with_reuse_vdoc(reuse_vdoc);
        assert_eq!(is_local(&language, action), expected_local);
    }

    fn counting_cleanup(counter: &Arc<AtomicUsize>, result: std::io::Result<()>) -> Cleanup {
        let counter = Arc::clone(counter);
        Cleanup::custom(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    fn handle(cleanup: Option<Cleanup>) -> VirtualDocUri {
        VirtualDocUri::new(Url::parse("file:///tmp/.vdoc.x.py").unwrap(), cleanup)
    }

    #[tokio::test]
    async fn with_uri_runs_cleanup_once_after_success() {
        let counter = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&counter);

        let output = with_uri(handle(Some(counting_cleanup(&counter, Ok(())))), |uri| async move {
            assert_eq!(observed.load(Ordering::SeqCst), 0, "cleanup ran early");
            uri.path().to_string()
        })
        .await;

        assert_eq!(output, "/tmp/.vdoc.x.py");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn with_uri_runs_cleanup_once_after_failure() {
        let counter = Arc::new(AtomicUsize::new(0));

        let output: Result<(), String> =
            with_uri(handle(Some(counting_cleanup(&counter, Ok(())))), |_| async {
                Err("tool crashed".to_string())
            })
            .await;

        assert_eq!(output, Err("tool crashed".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cleanup_failure_does_not_mask_output() {
        let counter = Arc::new(AtomicUsize::new(0));
        let failing = counting_cleanup(&counter, Err(std::io::Error::other("busy")));

        let output = with_uri(handle(Some(failing)), |_| async { 42 }).await;

        assert_eq!(output, 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn for_settings_creates_owned_session_dir() {
        let settings = VdocSettings {
            cleanup_stale_sessions: Some(false),
            ..Default::default()
        };
        let resources = VirtualDocResources::for_settings(&settings).unwrap();
        let dir = resources.session_dir().to_path_buf();
        assert!(dir.is_dir());
        assert!(
            dir.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(cleanup::SESSION_DIR_PREFIX))
        );
        drop(resources);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn with_uri_without_cleanup_passes_output_through() {
        let output = with_uri(handle(None), |uri| async move { uri.scheme().to_string() }).await;
        assert_eq!(output, "file");
    }
}
