//! # Expansion Configuration
//!
//! Every external parameter the expansion depends on is collected into one
//! [`Config`] value at startup. The CLI fills it from arguments and the CI
//! environment; library callers and tests build it directly:
//!
//! ```
//! use composer_expand::config::Config;
//!
//! let config = Config::new("token")
//!     .unwrap()
//!     .with_target_core(Some("^11".to_string()))
//!     .with_lenient_allow_list(Some(String::new()));
//!
//! assert_eq!(config.target_core_constraint(), "^11");
//! assert_eq!(config.web_root(), "web");
//! assert!(config.lenient_allow_list.is_none());
//! ```
//!
//! Empty strings and `"0"` are treated as unset. CI systems export variables
//! that were declared but left blank, and `"0"` is the conventional way to
//! switch a CI variable off.

use std::path::PathBuf;

use crate::defaults::{DEFAULT_TARGET_CORE, DEFAULT_WEB_ROOT};
use crate::error::{Error, Result};

/// Manifest file read (and by default written) by the expansion.
pub const DEFAULT_MANIFEST_PATH: &str = "composer.json";

/// Resolved parameters for one expansion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Machine name of the module, without the `drupal/` vendor prefix.
    pub project_name: String,
    /// Drupal core constraint, as configured.
    pub target_core: Option<String>,
    /// Web root directory, as configured.
    pub web_root: Option<String>,
    /// Comma-separated module names for the lenient plugin.
    pub lenient_allow_list: Option<String>,
    /// Path or URL of a Composer patches file.
    pub patches_file: Option<String>,
    /// Project manifest to read.
    pub manifest_path: PathBuf,
    /// Where to write the result instead of overwriting the manifest.
    pub output_path: Option<PathBuf>,
    /// Directory that relative paths are resolved against.
    pub working_dir: PathBuf,
}

impl Config {
    /// Create a configuration for `project_name` with everything else unset.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNameMissing` if the name is empty or `"0"`.
    pub fn new(project_name: impl Into<String>) -> Result<Self> {
        let project_name = project_name.into();
        if is_unset(project_name.trim()) {
            return Err(Error::ProjectNameMissing);
        }

        Ok(Self {
            project_name,
            target_core: None,
            web_root: None,
            lenient_allow_list: None,
            patches_file: None,
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            output_path: None,
            working_dir: PathBuf::from("."),
        })
    }

    /// Create a configuration from an optional project name.
    pub fn from_project_name(project_name: Option<String>) -> Result<Self> {
        Self::new(non_empty(project_name).ok_or(Error::ProjectNameMissing)?)
    }

    pub fn with_target_core(mut self, target_core: Option<String>) -> Self {
        self.target_core = non_empty(target_core);
        self
    }

    pub fn with_web_root(mut self, web_root: Option<String>) -> Self {
        self.web_root = non_empty(web_root);
        self
    }

    pub fn with_lenient_allow_list(mut self, allow_list: Option<String>) -> Self {
        self.lenient_allow_list = non_empty(allow_list);
        self
    }

    pub fn with_patches_file(mut self, patches_file: Option<String>) -> Self {
        self.patches_file = non_empty(patches_file);
        self
    }

    pub fn with_manifest_path(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = manifest_path.into();
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path.filter(|path| {
            path.as_os_str()
                .to_str()
                .map_or(true, |value| !is_unset(value))
        });
        self
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// The core constraint for the default manifest, falling back to `^10`.
    pub fn target_core_constraint(&self) -> &str {
        self.target_core.as_deref().unwrap_or(DEFAULT_TARGET_CORE)
    }

    /// The web root for the default manifest, falling back to `web`.
    pub fn web_root(&self) -> &str {
        self.web_root.as_deref().unwrap_or(DEFAULT_WEB_ROOT)
    }

    /// Absolute-or-relative location of the project manifest.
    pub fn input_path(&self) -> PathBuf {
        self.working_dir.join(&self.manifest_path)
    }

    /// Where the expanded manifest is written.
    pub fn destination_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => self.working_dir.join(path),
            None => self.input_path(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_unset(v))
}

fn is_unset(value: &str) -> bool {
    value.is_empty() || value == "0"
}
