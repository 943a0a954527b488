//! Data models for hghist
//!
//! UI-independent data structures for parsed history.

mod entry;

pub use entry::HistoryEntry;
