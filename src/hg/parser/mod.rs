//! hg output parser
//!
//! Parses `hg log` output (and cache files, which use the same layout)
//! into structured data.

mod log;


/// Parser for hg command output
pub struct Parser;
