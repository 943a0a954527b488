//! hg history layer
//!
//! This module decides where raw `hg log` text comes from (cache file,
//! daemon socket or a fresh `hg` process), parses it, and keeps the
//! per-file cache up to date.

pub mod cache;
pub mod constants;
mod daemon;
/// Parser module (public for integration testing)
pub mod parser;
mod repository;
mod source;

pub use cache::CacheWriteOutcome;
pub use daemon::{DaemonAddress, DaemonStream};
pub use repository::{HgRepository, HistoryFetch};
pub use source::{LogOrigin, LogSource};

use std::io;
use thiserror::Error;

/// Errors that can occur while fetching history
#[derive(Error, Debug)]
pub enum HgError {
    #[error("hg is not installed or not in PATH")]
    HgNotFound,

    #[error("hg command failed (exit code {exit_code}): {stderr}")]
    CommandFailed { stderr: String, exit_code: i32 },

    #[error("hg daemon at {address} failed: {source}")]
    Daemon {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid daemon address: {0}")]
    InvalidDaemonAddress(String),

    #[error("No current history entry")]
    NoCurrentEntry,

    #[error("Failed to parse date {raw:?}: {source}")]
    DateParse {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
