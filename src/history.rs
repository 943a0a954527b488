//! Forward-only cursor over a parsed file history
//!
//! Mirrors how downstream consumers walk history: call [`History::advance`]
//! to select the next entry, then read the current entry's fields. Reading
//! fields with no entry selected is an error, not stale data.

use std::cell::OnceCell;
use std::io::Read;

use chrono::{DateTime, FixedOffset};

use crate::hg::HgError;
use crate::model::HistoryEntry;

/// Parsed history of one file
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the next entry `advance` will select
    next: usize,
    /// Index of the selected entry
    current: Option<usize>,
    /// Lazily built flat text view
    flat_text: OnceCell<String>,
}

impl History {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    /// Select the next entry
    ///
    /// Returns false once all entries have been visited; the cursor then
    /// has no current entry and stays exhausted.
    pub fn advance(&mut self) -> bool {
        if self.next < self.entries.len() {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    /// The selected entry, if any
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.and_then(|idx| self.entries.get(idx))
    }

    fn require_current(&self) -> Result<&HistoryEntry, HgError> {
        self.current().ok_or(HgError::NoCurrentEntry)
    }

    pub fn revision(&self) -> Result<&str, HgError> {
        Ok(self.require_current()?.revision())
    }

    /// Parsed date of the selected entry (current time if malformed)
    pub fn date(&self) -> Result<DateTime<FixedOffset>, HgError> {
        Ok(self.require_current()?.date())
    }

    pub fn author(&self) -> Result<&str, HgError> {
        Ok(self.require_current()?.author())
    }

    pub fn message(&self) -> Result<&str, HgError> {
        Ok(self.require_current()?.message())
    }

    /// One-line view of the selected entry
    pub fn line(&self) -> Result<String, HgError> {
        Ok(self.require_current()?.line())
    }

    /// All entries flattened to one line each, built on first use
    pub fn flat_text(&self) -> &str {
        self.flat_text
            .get_or_init(|| self.entries.iter().map(HistoryEntry::line).collect())
    }

    /// Byte stream over [`History::flat_text`]
    pub fn reader(&self) -> impl Read + '_ {
        self.flat_text().as_bytes()
    }

    /// All entries in hg output order, independent of the cursor
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }
}
