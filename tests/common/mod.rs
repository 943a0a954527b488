//! Common test utilities for integration tests.
//!
//! Helpers for temporary hg repositories and a scripted stand-in for the
//! hg binary.
//!
//! Note: Each integration test file compiles as a separate crate,
//! so not all helpers are used in every test file. We suppress
//! dead_code warnings at the module level.

#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(unused_macros)]

/// Return early from a test when hg is not installed.
macro_rules! skip_if_no_hg {
    () => {
        if !common::hg_available() {
            eprintln!("hg not found in PATH, skipping");
            return;
        }
    };
}

#[cfg(unix)]
pub mod fake_hg;
pub mod test_repo;

#[cfg(unix)]
pub use fake_hg::FakeHg;
pub use test_repo::TestRepo;

/// Whether a working `hg` is on PATH.
pub fn hg_available() -> bool {
    std::process::Command::new("hg")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
