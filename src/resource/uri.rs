//! Naming and recognition of virtual document resources.
//!
//! Backing files are dot-files named `.vdoc.<id>.<ext>` so they stay hidden
//! next to the host document; content-addressed documents use the
//! `vdoc-content` scheme. Tool results that point into either one can be
//! filtered with [`is_virtual_doc_uri`].

use std::path::Path;

/// Filename prefix of every virtual document backing file
pub const VDOC_FILE_PREFIX: &str = ".vdoc.";

/// Uri scheme of content-addressed virtual documents
pub const CONTENT_SCHEME: &str = "vdoc-content";

/// Whether `uri` names a virtual document (content uri or backing file)
pub fn is_virtual_doc_uri(uri: &url::Url) -> bool {
    if uri.scheme() == CONTENT_SCHEME {
        return true;
    }
    uri.path_segments()
        .and_then(|mut segments| segments.next_back())
        .is_some_and(is_virtual_doc_file_name)
}

/// Whether `path` is a virtual document backing file
pub fn is_virtual_doc_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_virtual_doc_file_name)
}

/// `.vdoc.{id}.{ext}` with a non-empty id and extension
fn is_virtual_doc_file_name(name: &str) -> bool {
    name.strip_prefix(VDOC_FILE_PREFIX)
        .and_then(|rest| rest.rsplit_once('.'))
        .is_some_and(|(id, ext)| !id.is_empty() && !ext.is_empty())
}

/// FNV-1a 64-bit hash over several parts.
///
/// Parts are separated by a NUL byte so `("ab", "c")` and `("a", "bc")`
/// hash differently. Stable across runs, which keeps persistent file names
/// and content uris deterministic.
pub(crate) fn fnv1a(parts: &[&str]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        for byte in part.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}
