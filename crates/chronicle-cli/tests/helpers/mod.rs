#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("chronicle").expect("Failed to find chronicle binary");

        // Run outside the repository so no chronicle.toml is picked up
        cmd.current_dir(self.temp_dir.path());
        cmd.env("CHRONICLE_DATABASE_PATH", &self.db_path);
        cmd.env("CHRONICLE_DEFAULT_TIMEZONE", "UTC");
        cmd.env_remove("CHRONICLE_USER_ID");
        cmd.env_remove("RUST_LOG");

        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Daily standup far enough in the future to always be projected
    pub fn future_standup_args() -> Vec<&'static str> {
        vec![
            "recur", "Standup",
            "--every", "daily",
            "--at", "09:00",
            "--duration", "15",
            "--from", "2030-01-01",
        ]
    }

    /// Twice-weekly gym sessions that have long elapsed
    pub fn past_gym_args(label: &'static str) -> Vec<&'static str> {
        vec![
            "recur", "Gym",
            "--every", "weekly",
            "--on", "mon,wed",
            "--at", "18:00",
            "--duration", "60",
            "--from", "2024-01-01",
            "--until", "2024-01-31",
            "--label", label,
        ]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("added with ID"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
            .or(predicate::str::contains("error"))
    }
}
