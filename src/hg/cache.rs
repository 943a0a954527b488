//! Per-file history cache
//!
//! Each tracked file `dir/name` gets its parsed history stored at
//! `dir/.cache/name`, in the same text layout `hg log` uses, so cached and
//! fresh output go through one parser.
//!
//! A cache file is fresh when its mtime is not older than the tracked
//! file's. Stale files are never read and get replaced on the next fresh
//! fetch. Writes land in a temp file in the cache directory and are renamed
//! into place, so a reader never sees a half-written cache and concurrent
//! writers resolve as last-rename-wins.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::constants::{cache, prefixes};
use crate::model::HistoryEntry;

/// Result of a best-effort cache write
#[derive(Debug)]
pub enum CacheWriteOutcome {
    /// History was read from the cache, nothing to write
    Skipped,
    /// Cache file written
    Written(PathBuf),
    /// A message line would read back as a log field; nothing cached and
    /// any older cache file removed
    Unrepresentable(PathBuf),
    /// Write failed; no partial file was left behind
    Failed { path: PathBuf, error: io::Error },
}

impl CacheWriteOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Cache file location for `file`: `<parent>/.cache/<file name>`
pub fn cache_path(file: &Path) -> PathBuf {
    let parent = file.parent().unwrap_or_else(|| Path::new(""));
    let name = file.file_name().unwrap_or(file.as_os_str());
    parent.join(cache::DIR_NAME).join(name)
}

/// Create the cache directory for `cache_file` if missing
///
/// Failure is logged and ignored; the following write will report it.
pub fn ensure_cache_dir(cache_file: &Path) {
    let Some(dir) = cache_file.parent() else {
        return;
    };
    if let Err(err) = fs::create_dir_all(dir) {
        tracing::debug!(dir = %dir.display(), "cannot create cache directory: {err}");
    }
}

/// Whether `cache_file` exists and is not older than `file`
///
/// Any metadata error counts as stale.
pub fn is_fresh(cache_file: &Path, file: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified());

    match (modified(cache_file), modified(file)) {
        (Ok(cached), Ok(source)) => cached >= source,
        _ => false,
    }
}

/// Render entries in cache file layout
///
/// ```text
/// changeset: <revision>:foo
/// user: <author>
/// date: <date>
/// description:
/// <message>
///
/// ```
pub fn render_cache(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{} {}{}",
            prefixes::CHANGESET,
            entry.revision(),
            cache::REVISION_SUFFIX
        );
        let _ = writeln!(out, "{} {}", prefixes::USER, entry.author());
        let _ = writeln!(out, "{} {}", prefixes::DATE, entry.raw_date());
        let _ = writeln!(out, "{}", prefixes::DESCRIPTION);
        let _ = writeln!(out, "{}", entry.message().trim());
        out.push('\n');
    }
    out
}

/// Whether `entries` read back unchanged from the cache layout
///
/// Message lines are written verbatim after `description:`, so a line
/// starting with a log prefix (e.g. a summary of `date: bump release`)
/// would be parsed as a field.
pub fn is_representable(entries: &[HistoryEntry]) -> bool {
    entries.iter().all(|entry| {
        entry
            .message()
            .lines()
            .all(|line| !prefixes::ALL.iter().any(|prefix| line.starts_with(prefix)))
    })
}

/// Write `entries` to `cache_file`, never failing the caller
pub fn write_cache(cache_file: &Path, entries: &[HistoryEntry]) -> CacheWriteOutcome {
    if !is_representable(entries) {
        tracing::debug!(path = %cache_file.display(), "history not cacheable, dropping cache");
        if let Err(err) = fs::remove_file(cache_file)
            && err.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(path = %cache_file.display(), "cannot remove history cache: {err}");
        }
        return CacheWriteOutcome::Unrepresentable(cache_file.to_path_buf());
    }

    match write_atomic(cache_file, &render_cache(entries)) {
        Ok(()) => {
            tracing::debug!(
                path = %cache_file.display(),
                entries = entries.len(),
                "history cache written"
            );
            CacheWriteOutcome::Written(cache_file.to_path_buf())
        }
        Err(error) => {
            tracing::warn!(path = %cache_file.display(), "history cache write failed: {error}");
            CacheWriteOutcome::Failed {
                path: cache_file.to_path_buf(),
                error,
            }
        }
    }
}

/// Temp file in the same directory, then rename over the target
///
/// The temp file is deleted on drop if anything fails before the rename.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "cache path has no parent"))?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
