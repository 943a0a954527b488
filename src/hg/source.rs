//! Raw log source selection
//!
//! Picks where `hg log` text for one file comes from, in order:
//! 1. A fresh cache file
//! 2. The daemon, if one is configured
//! 3. A new `hg log` process

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::process::Command;

use super::HgError;
use super::cache;
use super::constants::{self, commands, flags};
use super::daemon::DaemonStream;
use super::repository::HgRepository;

/// Which source produced the log text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOrigin {
    Cache,
    Daemon,
    Process,
}

impl LogOrigin {
    /// Whether the text still needs to be written to the cache
    pub fn is_fresh_fetch(self) -> bool {
        !matches!(self, Self::Cache)
    }
}

/// A readable stream of raw log text
#[derive(Debug)]
pub enum LogSource {
    Cache(BufReader<File>),
    Daemon(BufReader<DaemonStream>),
    /// Captured stdout of a finished `hg log`
    Process(Cursor<Vec<u8>>),
}

impl LogSource {
    /// Resolve the source for `file` (absolute path) using `cache_file`
    /// as the cache location
    ///
    /// Creates the cache directory as a side effect (best effort). Daemon
    /// and process failures are returned as-is, without retrying.
    pub fn resolve(repo: &HgRepository, file: &Path, cache_file: &Path) -> Result<Self, HgError> {
        cache::ensure_cache_dir(cache_file);

        if cache::is_fresh(cache_file, file) {
            match File::open(cache_file) {
                Ok(f) => {
                    tracing::debug!(file = %file.display(), "history cache hit");
                    return Ok(Self::Cache(BufReader::new(f)));
                }
                Err(err) => {
                    tracing::debug!(cache = %cache_file.display(), "cannot open history cache: {err}");
                }
            }
        } else {
            tracing::debug!(file = %file.display(), "history cache missing or stale");
        }

        match repo.daemon() {
            Some(address) => {
                let path = repo.relative_path(file);
                tracing::debug!(%address, path = %path.display(), "requesting log from daemon");
                let stream = address.request_log(&path.to_string_lossy())?;
                Ok(Self::Daemon(BufReader::new(stream)))
            }
            None => Self::spawn_log(repo, file),
        }
    }

    /// Run `hg log [-v] <file>` in the repository root and capture stdout
    ///
    /// Runs with `HGPLAIN=1` so the output keeps the stock layout.
    fn spawn_log(repo: &HgRepository, file: &Path) -> Result<Self, HgError> {
        let mut cmd = Command::new(repo.command());
        cmd.arg(commands::LOG);
        if repo.is_verbose() {
            cmd.arg(flags::VERBOSE);
        }
        cmd.arg(file)
            .current_dir(repo.root())
            .env(constants::PLAIN_ENV, "1");

        tracing::debug!(command = ?cmd, "spawning hg");

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                HgError::HgNotFound
            } else {
                HgError::Io(e)
            }
        })?;

        if output.status.success() {
            Ok(Self::Process(Cursor::new(output.stdout)))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            let exit_code = output.status.code().unwrap_or(-1);
            Err(HgError::CommandFailed { stderr, exit_code })
        }
    }

    pub fn origin(&self) -> LogOrigin {
        match self {
            Self::Cache(_) => LogOrigin::Cache,
            Self::Daemon(_) => LogOrigin::Daemon,
            Self::Process(_) => LogOrigin::Process,
        }
    }
}

impl Read for LogSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Cache(r) => r.read(buf),
            Self::Daemon(r) => r.read(buf),
            Self::Process(r) => r.read(buf),
        }
    }
}

impl BufRead for LogSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Cache(r) => r.fill_buf(),
            Self::Daemon(r) => r.fill_buf(),
            Self::Process(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Cache(r) => r.consume(amt),
            Self::Daemon(r) => r.consume(amt),
            Self::Process(r) => r.consume(amt),
        }
    }
}
