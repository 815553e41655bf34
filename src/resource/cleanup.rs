//! Cleanup of stale session directories.
//!
//! Persistent virtual documents live in a per-session directory that is
//! removed when the session ends. A crashed session leaves its directory
//! behind; this module removes those on startup.

use std::path::Path;

/// Statistics returned by cleanup_stale_session_dirs
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupStats {
    /// Number of stale directories successfully removed
    pub dirs_removed: usize,
    /// Number of directories kept (newer than max_age)
    pub dirs_kept: usize,
    /// Number of directories that failed to remove (e.g., permission denied)
    pub dirs_failed: usize,
}

/// The prefix used for all vdoc-bridge session directories
pub const SESSION_DIR_PREFIX: &str = "vdoc-bridge-";

/// Default max age for stale session directory cleanup (24 hours)
pub const DEFAULT_CLEANUP_MAX_AGE: std::time::Duration =
    std::time::Duration::from_secs(24 * 60 * 60);

/// Remove session directories left in the OS temp dir by crashed sessions.
///
/// Errors are logged rather than returned.
pub fn startup_cleanup() {
    let temp_dir = std::env::temp_dir();

    match cleanup_stale_session_dirs(&temp_dir, DEFAULT_CLEANUP_MAX_AGE) {
        Ok(stats) => {
            if stats.dirs_removed > 0 || stats.dirs_failed > 0 {
                log::info!(
                    target: "vdoc_bridge::cleanup",
                    "Startup cleanup: removed {} stale dirs, kept {}, failed {}",
                    stats.dirs_removed,
                    stats.dirs_kept,
                    stats.dirs_failed
                );
            }
        }
        Err(e) => {
            log::warn!(
                target: "vdoc_bridge::cleanup",
                "Startup cleanup failed to read temp directory: {}",
                e
            );
        }
    }
}

/// Remove `vdoc-bridge-*` directories in `temp_dir` older than `max_age`.
pub fn cleanup_stale_session_dirs(
    temp_dir: &Path,
    max_age: std::time::Duration,
) -> std::io::Result<CleanupStats> {
    let mut stats = CleanupStats::default();
    let now = std::time::SystemTime::now();

    for entry in std::fs::read_dir(temp_dir)?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(SESSION_DIR_PREFIX) {
            continue;
        }

        // Unreadable metadata counts as stale; a future mtime as fresh
        let is_stale = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .map(|modified| {
                now.duration_since(modified)
                    .is_ok_and(|age| age > max_age)
            })
            .unwrap_or(true);

        if !is_stale {
            stats.dirs_kept += 1;
            continue;
        }

        match std::fs::remove_dir_all(&path) {
            Ok(()) => {
                log::debug!(
                    target: "vdoc_bridge::cleanup",
                    "Removed stale session directory: {}",
                    path.display()
                );
                stats.dirs_removed += 1;
            }
            Err(e) => {
                log::warn!(
                    target: "vdoc_bridge::cleanup",
                    "Failed to remove stale session directory {}: {}",
                    path.display(),
                    e
                );
                stats.dirs_failed += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn age(path: &Path, by: Duration) {
        let mtime = FileTime::from_system_time(SystemTime::now() - by);
        set_file_mtime(path, mtime).unwrap();
    }

    #[test]
    fn empty_temp_dir_yields_zero_stats() {
        let temp = tempdir().unwrap();
        let stats = cleanup_stale_session_dirs(temp.path(), DEFAULT_CLEANUP_MAX_AGE).unwrap();
        assert_eq!(stats, CleanupStats::default());
    }

    #[test]
    fn only_prefixed_directories_are_touched() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join("vdoc-bridge-abc123")).unwrap();
        std::fs::create_dir(temp.path().join("other-project-temp")).unwrap();
        std::fs::write(temp.path().join("vdoc-bridge-file"), "").unwrap();
        age(&temp.path().join("vdoc-bridge-abc123"), Duration::from_secs(60));
        age(&temp.path().join("other-project-temp"), Duration::from_secs(60));

        let stats = cleanup_stale_session_dirs(temp.path(), Duration::from_secs(0)).unwrap();

        assert_eq!(stats.dirs_removed, 1);
        assert!(!temp.path().join("vdoc-bridge-abc123").exists());
        assert!(temp.path().join("other-project-temp").exists());
        assert!(temp.path().join("vdoc-bridge-file").exists(), "files are ignored");
    }

    #[test]
    fn old_directories_are_removed_and_fresh_ones_kept() {
        let temp = tempdir().unwrap();
        let old = temp.path().join("vdoc-bridge-old");
        let fresh = temp.path().join("vdoc-bridge-fresh");
        std::fs::create_dir(&old).unwrap();
        std::fs::create_dir(&fresh).unwrap();
        age(&old, Duration::from_secs(2 * 24 * 60 * 60));

        let stats = cleanup_stale_session_dirs(temp.path(), DEFAULT_CLEANUP_MAX_AGE).unwrap();

        assert_eq!(stats.dirs_removed, 1);
        assert_eq!(stats.dirs_kept, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn missing_temp_dir_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert!(cleanup_stale_session_dirs(&missing, DEFAULT_CLEANUP_MAX_AGE).is_err());
    }
}
