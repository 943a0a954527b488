//! Scripted stand-in for the hg binary.
//!
//! The script appends its working directory and arguments to an
//! `invocations` file and prints a canned log, so tests can check both
//! what was run and whether anything was run at all.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const SCRIPT: &str = r#"#!/bin/sh
here=$(dirname "$0")
echo "$(pwd) $*" >> "$here/invocations"
cat "$here/log.txt"
exit "$(cat "$here/exit_code")"
"#;

pub struct FakeHg {
    dir: TempDir,
}

impl FakeHg {
    /// Create a fake hg that prints `log` and exits successfully.
    pub fn new(log: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let fake = Self { dir };
        fake.set_log(log);
        fake.set_exit_code(0);

        let script = fake.command();
        fs::write(&script, SCRIPT).expect("Failed to write fake hg");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake hg");
        fake
    }

    /// Path to pass as the hg command.
    pub fn command(&self) -> PathBuf {
        self.dir.path().join("hg")
    }

    pub fn set_log(&self, log: &str) {
        fs::write(self.dir.path().join("log.txt"), log).expect("Failed to write log");
    }

    pub fn set_exit_code(&self, code: i32) {
        fs::write(self.dir.path().join("exit_code"), code.to_string())
            .expect("Failed to write exit code");
    }

    /// One `<cwd> <args>` line per run.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("invocations"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
