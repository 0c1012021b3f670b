//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and manifests
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::MINIMAL);
//!     fixture.command().arg("foo").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Environment variables the binary reads; cleared for every command so the
/// host CI environment cannot leak into tests.
pub const EXPANSION_ENV_VARS: [&str; 6] = [
    "CI_PROJECT_NAME",
    "_TARGET_CORE",
    "_WEB_ROOT",
    "LENIENT_ALLOW_LIST",
    "COMPOSER_PATCHES_FILE",
    "COMPOSER",
];

/// Common project manifests for testing.
#[allow(dead_code)]
pub mod manifests {
    /// A module declaring nothing but its name.
    pub const MINIMAL: &str = r#"{
    "name": "drupal/foo"
}"#;

    /// A module with runtime and dev requirements.
    pub const WITH_REQUIREMENTS: &str = r#"{
    "name": "drupal/foo",
    "require": {
        "drupal/token": "^1.13"
    },
    "require-dev": {
        "drupal/paragraphs": "^1.16"
    }
}"#;

    /// A module replacing packages.drupal.org with its own fork entry.
    pub const WITH_DRUPAL_FORK: &str = r#"{
    "repositories": {
        "otherfork": {
            "type": "composer",
            "url": "https://packages.drupal.org/8",
            "exclude": ["drupal/token"]
        }
    }
}"#;

    /// A module requiring core directly.
    pub const WITH_CORE: &str = r#"{
    "require-dev": {
        "drupal/core": "^10.2"
    }
}"#;

    /// Malformed JSON for error testing.
    pub const INVALID_JSON: &str = r#"{"name": "drupal/foo","#;
}

/// A test fixture that provides a temporary directory with an optional
/// `composer.json`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `composer.json` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file("composer.json", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to `composer.json`.
    pub fn manifest_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("composer.json")
    }

    /// Parse a JSON file from the fixture directory.
    #[allow(dead_code)]
    pub fn read_json(&self, path: &str) -> serde_json::Value {
        let content =
            std::fs::read_to_string(self.path().join(path)).expect("Failed to read output file");
        serde_json::from_str(&content).expect("Output should be valid JSON")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory with a clean
    /// expansion environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("expand-composer-json");
        cmd.current_dir(self.path());
        for var in EXPANSION_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::MINIMAL);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_manifests_are_valid_json() {
        let valid = [
            manifests::MINIMAL,
            manifests::WITH_REQUIREMENTS,
            manifests::WITH_DRUPAL_FORK,
            manifests::WITH_CORE,
        ];

        for manifest in valid {
            serde_json::from_str::<serde_json::Value>(manifest)
                .expect("Manifest should be valid JSON");
        }
    }

    #[test]
    fn test_invalid_json_is_actually_invalid() {
        let result = serde_json::from_str::<serde_json::Value>(manifests::INVALID_JSON);
        assert!(result.is_err(), "INVALID_JSON should not parse");
    }
}
