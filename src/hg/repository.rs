//! Repository context and history fetching

use std::path::{Path, PathBuf};

use super::HgError;
use super::cache::{self, CacheWriteOutcome};
use super::constants::HG_COMMAND;
use super::daemon::DaemonAddress;
use super::parser::Parser;
use super::source::{LogOrigin, LogSource};
use crate::history::History;

/// A Mercurial working copy and how to query it
#[derive(Debug, Clone)]
pub struct HgRepository {
    /// hg binary (name looked up in PATH, or a path)
    command: PathBuf,
    /// Repository root, used as working directory for `hg`
    root: PathBuf,
    /// Pass `-v` to `hg log`
    verbose: bool,
    /// Query this daemon instead of spawning `hg`
    daemon: Option<DaemonAddress>,
}

/// Result of [`HgRepository::history`]
#[derive(Debug)]
pub struct HistoryFetch {
    pub history: History,
    pub origin: LogOrigin,
    /// What happened to the cache; failures never fail the fetch
    pub cache: CacheWriteOutcome,
}

impl HgRepository {
    /// Create a context for the repository rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            command: PathBuf::from(HG_COMMAND),
            root: root.into(),
            verbose: false,
            daemon: None,
        }
    }

    /// Use a specific hg binary
    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Fetch logs through a daemon instead of spawning hg
    pub fn with_daemon(mut self, daemon: Option<DaemonAddress>) -> Self {
        self.daemon = daemon;
        self
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn daemon(&self) -> Option<&DaemonAddress> {
        self.daemon.as_ref()
    }

    /// Resolve `file` against the repository root if it is relative
    pub fn absolute_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        }
    }

    /// Path of `file` relative to the root, or absolute if outside it
    pub fn relative_path(&self, file: &Path) -> PathBuf {
        let file = self.absolute_path(file);
        match file.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => file,
        }
    }

    /// Fetch, parse and (if freshly fetched) cache the history of `file`
    pub fn history(&self, file: &Path) -> Result<HistoryFetch, HgError> {
        let file = self.absolute_path(file);
        let cache_file = cache::cache_path(&file);

        let source = LogSource::resolve(self, &file, &cache_file)?;
        let origin = source.origin();
        let entries = Parser::parse_log(source).map_err(|err| self.read_error(origin, err))?;

        tracing::debug!(
            file = %file.display(),
            ?origin,
            entries = entries.len(),
            "history parsed"
        );

        let cache = if origin.is_fresh_fetch() {
            cache::write_cache(&cache_file, &entries)
        } else {
            CacheWriteOutcome::Skipped
        };

        Ok(HistoryFetch {
            history: History::new(entries),
            origin,
            cache,
        })
    }

    /// Attribute a read failure to the daemon when it came from the socket
    fn read_error(&self, origin: LogOrigin, err: HgError) -> HgError {
        match (origin, err, self.daemon()) {
            (LogOrigin::Daemon, HgError::Io(source), Some(address)) => HgError::Daemon {
                address: address.to_string(),
                source,
            },
            (_, err, _) => err,
        }
    }
}
