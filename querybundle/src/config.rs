//! Configuration types for bundle import.
//!
//! Split into core import options (forwarded to every handler) and
//! source-specific config (how bundle content is discovered on disk).
//! This ensures the dispatch API does not leak filesystem concerns.

use std::path::PathBuf;

/// Options forwarded unchanged to every import handler.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct ImportOptions {
    /// Allow the import to replace entities that already exist.
    pub overwrite: bool,
}

/// Filesystem bundle source options.
///
/// NOTE: `root` is required. Which directory holds exports is a CLI/wrapper
/// concern, not baked into the library.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsBundleConfig {
    /// Directory containing the exported bundle.
    pub root: PathBuf,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links.
    ///
    /// **Defaults to `false`** — following symlinks allows escaping the
    /// bundle root and reading unrelated files into the import.
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
    /// Maximum number of files in a bundle (default: `10_000`).
    pub max_files: usize,
    /// Maximum total bytes read across all files (default: 512 MB).
    pub max_total_bytes: u64,
}

impl FsBundleConfig {
    /// Config for a bundle rooted at `root`, with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
            max_files: 10_000,
            max_total_bytes: 536_870_912,
        }
    }
}
