#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated board environment: its own data file and an empty
/// config, so nothing from the developer machine leaks in.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::write(dir.path().join("taskdeck.toml"), "").expect("failed to write config");
        Self { dir }
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.path().join("taskdeck.toml")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_file(), contents).expect("failed to write config");
    }

    /// A command wired to this board's data file and config.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskdeck").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.env("TASKDECK_DATA_FILE", self.data_file());
        cmd.env("TASKDECK_CONFIG", self.config_file());
        cmd.env_remove("TASKDECK_USER");
        cmd
    }

    /// Parse the persisted board document.
    pub fn read_board(&self) -> serde_json::Value {
        let contents = fs::read_to_string(self.data_file()).expect("failed to read data file");
        serde_json::from_str(&contents).expect("data file is not valid JSON")
    }

    /// Run a command expecting JSON output and parse the envelope.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("failed to run taskdeck");
        assert!(
            output.status.success(),
            "command {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
    }
}

impl Default for TestBoard {
    fn default() -> Self {
        Self::new()
    }
}
