//! Log output parser (hg log)

use std::io::BufRead;

use super::super::HgError;
use super::super::constants::prefixes;
use crate::model::HistoryEntry;

use super::Parser;

/// Entry under construction
///
/// The first `description:` line replaces any message set by `summary:`
/// instead of appending to it; a later `summary:` never overrides a
/// description.
#[derive(Debug, Default)]
struct EntryBuilder {
    revision: String,
    author: String,
    date: String,
    message: String,
    /// Set once a description line has been appended
    has_description: bool,
}

impl EntryBuilder {
    fn new(revision: String) -> Self {
        Self {
            revision,
            ..Default::default()
        }
    }

    fn append_description(&mut self, line: &str) {
        if !self.has_description {
            self.message.clear();
            self.has_description = true;
        }
        self.message.push_str(line);
        self.message.push('\n');
    }

    fn build(self) -> HistoryEntry {
        HistoryEntry::new(self.revision, self.author, self.date, self.message)
    }
}

/// Line-by-line state machine over `hg log` output
#[derive(Debug, Default)]
struct LogStateMachine {
    entries: Vec<HistoryEntry>,
    current: Option<EntryBuilder>,
    in_description: bool,
}

impl LogStateMachine {
    fn feed(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix(prefixes::CHANGESET) {
            self.close_current();
            self.current = Some(EntryBuilder::new(Parser::parse_revision(rest)));
            self.in_description = false;
            return;
        }

        // Nothing to attach to before the first changeset
        let Some(entry) = self.current.as_mut() else {
            return;
        };

        if let Some(rest) = line.strip_prefix(prefixes::USER) {
            entry.author = rest.trim().to_string();
            self.in_description = false;
        } else if let Some(rest) = line.strip_prefix(prefixes::DATE) {
            entry.date = rest.trim().to_string();
            self.in_description = false;
        } else if line.starts_with(prefixes::FILES) {
            self.in_description = false;
        } else if let Some(rest) = line.strip_prefix(prefixes::SUMMARY) {
            if !entry.has_description {
                entry.message = rest.trim().to_string();
            }
            self.in_description = false;
        } else if line.starts_with(prefixes::DESCRIPTION) {
            self.in_description = true;
        } else if self.in_description {
            entry.append_description(line);
        }
    }

    fn close_current(&mut self) {
        if let Some(entry) = self.current.take() {
            self.entries.push(entry.build());
        }
    }

    fn finish(mut self) -> Vec<HistoryEntry> {
        self.close_current();
        self.entries
    }
}

impl Parser {
    /// Parse `hg log` output from a buffered stream into history entries
    ///
    /// Entries come back in the order hg printed them. Unknown lines are
    /// ignored and invalid UTF-8 is replaced; only a failing read returns
    /// an error.
    pub fn parse_log<R: BufRead>(mut reader: R) -> Result<Vec<HistoryEntry>, HgError> {
        let mut machine = LogStateMachine::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            machine.feed(Self::strip_line_ending(&line));
        }

        Ok(machine.finish())
    }

    /// Parse `hg log` output that is already in memory
    pub fn parse_log_str(output: &str) -> Vec<HistoryEntry> {
        let mut machine = LogStateMachine::default();
        for line in output.lines() {
            machine.feed(line);
        }
        machine.finish()
    }

    /// Extract the revision id from the text after `changeset:`
    ///
    /// hg prints `rev:node`; only `rev` is kept.
    /// Input: " 42:8a3f9c1d2e4b"
    /// Output: "42"
    pub(super) fn parse_revision(rest: &str) -> String {
        let rev = rest.trim();
        match rev.find(':') {
            Some(pos) => rev[..pos].to_string(),
            None => rev.to_string(),
        }
    }

    fn strip_line_ending(line: &str) -> &str {
        let line = line.strip_suffix('\n').unwrap_or(line);
        line.strip_suffix('\r').unwrap_or(line)
    }
}
