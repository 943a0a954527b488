//! hg-specific constants
//!
//! Centralized definitions for the hg command, log line prefixes and the
//! cache file layout.

/// hg command binary name
pub const HG_COMMAND: &str = "hg";

/// Environment variable that disables user config affecting output
/// (aliases, custom templates, localization)
pub const PLAIN_ENV: &str = "HGPLAIN";

/// hg subcommands
pub mod commands {
    pub const LOG: &str = "log";
}

/// hg command flags
pub mod flags {
    /// Verbose log output (file lists and full multi-line descriptions)
    pub const VERBOSE: &str = "-v";
}

/// Line prefixes emitted by `hg log`
pub mod prefixes {
    pub const CHANGESET: &str = "changeset:";
    pub const USER: &str = "user:";
    pub const DATE: &str = "date:";
    pub const FILES: &str = "files:";
    pub const SUMMARY: &str = "summary:";
    pub const DESCRIPTION: &str = "description:";

    pub const ALL: [&str; 6] = [CHANGESET, USER, DATE, FILES, SUMMARY, DESCRIPTION];
}

/// On-disk cache layout
pub mod cache {
    /// Subdirectory created next to each tracked file
    pub const DIR_NAME: &str = ".cache";

    /// Placeholder written after the revision on `changeset:` lines.
    ///
    /// Readers drop everything after the first `:`, so the value is never
    /// read back.
    pub const REVISION_SUFFIX: &str = ":foo";
}

/// Daemon protocol
pub mod daemon {
    /// Request prefix, followed by the repository-relative path
    pub const LOG_REQUEST: &str = "log ";

    /// Address prefix selecting a Unix-domain socket
    pub const UNIX_SCHEME: &str = "unix:";
}

/// `hg log` date format, e.g. `Mon Jan 02 03:04:05 2006 +0000`
pub const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";
