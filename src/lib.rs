//! hghist - per-file Mercurial history
//!
//! Extracts revision, author, date and message for a single file from
//! `hg log` (or a long-lived hg daemon) and caches the result next to the
//! file so repeated lookups skip the external tool.
//!
//! This library provides:
//! - [`hg`]: Log source selection, parsing and caching
//! - [`history`]: Forward-only cursor over parsed history
//! - [`model`]: Domain models

pub mod hg;
pub mod history;
pub mod model;
