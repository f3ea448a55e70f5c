// src/core/entries.rs

//! Turns command-line arguments into [`Entry`] values: a path plus the extension used to
//! pick its command.

use crate::{constants::DIRECTORY_EXTENSION, models::Entry};
use std::path::{Path, PathBuf, is_separator};
use walkdir::WalkDir;

/// How directory arguments are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryMode {
    /// A directory is an entry of its own, matched by the `/` extension.
    #[default]
    AsEntry,
    /// A directory is replaced by every file beneath it.
    Recurse,
}

/// The dot-less extension of `name`: whatever follows the last `.` of the final path
/// component. Returns an empty string when there is none.
///
/// A leading dot counts, so `.bashrc` has the extension `bashrc`.
pub fn extract_extension(name: &str) -> &str {
    let file_name = name.rsplit(is_separator).next().unwrap_or(name);
    file_name.rsplit_once('.').map_or("", |(_, extension)| extension)
}

/// Drops a single trailing separator (`docs/` becomes `docs`), keeping a bare root.
fn strip_trailing_separator(arg: &str) -> &str {
    match arg.strip_suffix(is_separator) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => arg,
    }
}

impl Entry {
    /// Builds an entry for a path, giving directories the `/` extension.
    pub fn classify(arg: &str) -> Self {
        let trimmed = strip_trailing_separator(arg);
        let path = PathBuf::from(trimmed);
        let extension = if path.is_dir() {
            DIRECTORY_EXTENSION
        } else {
            extract_extension(trimmed)
        };
        Self {
            extension: extension.to_string(),
            path,
        }
    }

    /// Builds an entry for a path known to be a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = extract_extension(&path.to_string_lossy()).to_string();
        Self { path, extension }
    }
}

/// Expands arguments into entries, in argument order.
///
/// In [`DirectoryMode::Recurse`] every directory argument is replaced by the files found
/// beneath it, sorted by name. Symlinked directories are expanded like real ones, so
/// directories never become entries in that mode.
pub fn collect_entries<S: AsRef<str>>(args: &[S], mode: DirectoryMode) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(args.len());
    for arg in args {
        let arg = strip_trailing_separator(arg.as_ref());
        let path = Path::new(arg);

        if mode == DirectoryMode::Recurse && path.is_dir() {
            log::debug!("Expanding directory '{}'", path.display());
            entries.extend(walk_files(path));
        } else {
            entries.push(Entry::classify(arg));
        }
    }
    entries
}

fn walk_files(root: &Path) -> impl Iterator<Item = Entry> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|item| match item {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping unreadable entry under '{}': {}", root.display(), e);
                None
            }
        })
        .filter(|item| !item.file_type().is_dir())
        .map(|item| Entry::file(item.into_path()))
}
