//! Throwaway hg repository with committed files.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let repo = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        repo.hg(&["init"]);
        repo
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `name` and commit only that file with `message`.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        std::fs::write(self.dir.path().join(name), content).expect("Failed to write file");
        self.hg(&["commit", "--addremove", "-m", message, name]);
    }

    /// Run hg with a fixed user and plain output, panicking on failure.
    fn hg(&self, args: &[&str]) {
        let output = Command::new("hg")
            .args(args)
            .current_dir(self.dir.path())
            .env("HGPLAIN", "1")
            .env("HGUSER", "Test User <test@example.com>")
            .output()
            .expect("Failed to execute hg");

        assert!(
            output.status.success(),
            "hg {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
