//! Filesystem bundle source.
//!
//! Reads an exported bundle directory into an [`ImportBundle`].
//! Safety properties enforced here:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Resolved paths are checked to remain within the bundle root
//! - Device files, pipes, and sockets are skipped
//! - Maximum directory depth is enforced to prevent infinite recursion
//! - Bounded streaming reads prevent memory exhaustion

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::bundle::ImportBundle;
use crate::config::FsBundleConfig;

/// Directories never considered part of a bundle.
const SKIP_DIRS: &[&str] = &[".git", "__MACOSX"];

/// Failure while loading a bundle from disk.
///
/// Unlike a scanner, a loader must not skip unreadable files: an import
/// that silently drops part of the bundle would apply a different export
/// than the one on disk. The first failure aborts the load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// An I/O error occurred while reading a file.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exceeded the configured maximum size.
    #[error("{}: file exceeds maximum size of {limit} bytes", .path.display())]
    FileTooLarge { path: PathBuf, limit: u64 },

    /// A file is not valid UTF-8.
    #[error("{}: file is not valid UTF-8", .path.display())]
    InvalidEncoding { path: PathBuf },

    /// A path resolved outside the bundle root (symlink escape).
    #[error("{}: path resolves outside the bundle root", .path.display())]
    OutsideRoot { path: PathBuf },

    /// A directory traversal error (permission denied, loop detected, etc.).
    #[error("directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The bundle exceeded a configured resource limit.
    #[error("bundle exceeds {what} limit ({limit})")]
    LimitExceeded { what: &'static str, limit: u64 },

    /// The directory held no bundle files at all.
    #[error("{}: no bundle files found", .root.display())]
    EmptyBundle { root: PathBuf },
}

/// Check if a directory entry is a skip directory (for `WalkDir::filter_entry`).
/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Check if a file has a bundle-relevant extension.
fn matches_file_pattern(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Root-relative path with forward slashes, the way archive entries are
/// named — a bundle loaded from disk is indistinguishable from one
/// extracted in memory.
fn logical_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a file using a bounded streaming read, enforcing `max_file_size`.
///
/// Uses `Read::take` so the size check and the read are one operation;
/// never calls `read_to_string` on an unbounded handle.
fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<String, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size + 1)
        .read_to_end(&mut buffer)
        .map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;

    if buffer.len() as u64 > max_file_size {
        return Err(LoadError::FileTooLarge {
            path: path.to_owned(),
            limit: max_file_size,
        });
    }

    String::from_utf8(buffer).map_err(|_| LoadError::InvalidEncoding {
        path: path.to_owned(),
    })
}

/// Load a bundle from a directory on disk.
///
/// Collects every `*.yaml`/`*.yml`/`*.json` file under `config.root` into
/// an [`ImportBundle`] keyed by root-relative forward-slash paths.
///
/// # Errors
///
/// Returns a [`LoadError`] if the root cannot be resolved, any file cannot
/// be read as UTF-8 within the configured size limits, a path escapes the
/// bundle root, or the directory contains no bundle files at all.
pub fn load_dir(config: &FsBundleConfig) -> Result<ImportBundle, LoadError> {
    // Canonicalize the root once so the boundary holds for every entry.
    let canonical_root = config.root.canonicalize().map_err(|source| LoadError::Io {
        path: config.root.clone(),
        source,
    })?;

    let mut bundle = ImportBundle::new();
    let mut total_bytes: u64 = 0;

    for entry_result in WalkDir::new(&config.root)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_not_skip_dir)
    {
        let entry = entry_result?;
        let file_path = entry.path();

        if !file_path.is_file() || !matches_file_pattern(file_path) {
            continue;
        }

        // Canonicalize and verify the resolved path stays within the root.
        // This catches symlink escapes even when follow_links is true.
        let canonical_path = file_path.canonicalize().map_err(|source| LoadError::Io {
            path: file_path.to_owned(),
            source,
        })?;
        if !canonical_path.starts_with(&canonical_root) {
            return Err(LoadError::OutsideRoot {
                path: file_path.to_owned(),
            });
        }

        // Skip devices, pipes, sockets — only regular files
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if let Ok(ft) = entry.metadata().map(|m| m.file_type())
                && (ft.is_block_device() || ft.is_char_device() || ft.is_fifo() || ft.is_socket())
            {
                continue;
            }
        }

        if bundle.len() >= config.max_files {
            return Err(LoadError::LimitExceeded {
                what: "max_files",
                limit: config.max_files as u64,
            });
        }

        let content = read_file_bounded(file_path, config.max_file_size)?;
        total_bytes = total_bytes.saturating_add(content.len() as u64);
        if total_bytes > config.max_total_bytes {
            return Err(LoadError::LimitExceeded {
                what: "max_total_bytes",
                limit: config.max_total_bytes,
            });
        }

        bundle.insert(logical_path(&canonical_path, &canonical_root), content);
    }

    if bundle.is_empty() {
        return Err(LoadError::EmptyBundle {
            root: config.root.clone(),
        });
    }

    Ok(bundle)
}
