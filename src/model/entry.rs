//! History entry data model

use chrono::{DateTime, FixedOffset, Local};

use crate::hg::HgError;
use crate::hg::constants::DATE_FORMAT;

/// One revision in a file's history
///
/// Built by the log parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryEntry {
    revision: String,
    author: String,
    raw_date: String,
    message: String,
}

impl HistoryEntry {
    /// Create an entry from its fields. The message is trimmed.
    pub fn new(
        revision: impl Into<String>,
        author: impl Into<String>,
        raw_date: impl Into<String>,
        message: impl AsRef<str>,
    ) -> Self {
        Self {
            revision: revision.into(),
            author: author.into(),
            raw_date: raw_date.into(),
            message: message.as_ref().trim().to_string(),
        }
    }

    /// Revision id (the local revision number for hg, e.g. `"42"`)
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Author as printed by hg (`Name <email>`)
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Date string exactly as emitted by hg
    pub fn raw_date(&self) -> &str {
        &self.raw_date
    }

    /// Commit message, possibly multi-line
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Parse the date, failing on malformed input
    pub fn try_date(&self) -> Result<DateTime<FixedOffset>, HgError> {
        DateTime::parse_from_str(&self.raw_date, DATE_FORMAT).map_err(|source| {
            HgError::DateParse {
                raw: self.raw_date.clone(),
                source,
            }
        })
    }

    /// Parse the date, substituting the current time on malformed input
    ///
    /// A bad date never hides an entry; the failure is logged instead.
    pub fn date(&self) -> DateTime<FixedOffset> {
        match self.try_date() {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(revision = %self.revision, "{err}; using current time");
                Local::now().fixed_offset()
            }
        }
    }

    /// Flattened one-line view: `revision date author message\n`
    ///
    /// Message line breaks are collapsed to single spaces.
    pub fn line(&self) -> String {
        let message = self.message.lines().collect::<Vec<_>>().join(" ");
        format!(
            "{} {} {} {}\n",
            self.revision, self.raw_date, self.author, message
        )
    }
}
