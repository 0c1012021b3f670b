//! # Composer Manifest Expansion
//!
//! This library builds the `composer.json` a Drupal module is tested with in
//! CI. A module ships a partial manifest (often little more than its own
//! requirements); the CI job needs a complete one that also pulls in Drupal
//! core, Drush and the usual dev tooling. The library produces it by deep
//! merging a generated default manifest with the module's own.
//!
//! ## Quick Example
//!
//! ```
//! use composer_expand::config::Config;
//! use composer_expand::expand::expand_manifest;
//! use serde_json::json;
//! use std::path::Path;
//!
//! let project = json!({
//!     "name": "drupal/token",
//!     "require": {"php": ">=8.1"}
//! });
//! let config = Config::new("token").unwrap();
//!
//! let expanded = expand_manifest(&project, &config, Path::new(".")).unwrap();
//! assert_eq!(expanded["require"]["php"], ">=8.1");
//! assert_eq!(expanded["require-dev"]["drupal/core-recommended"], "^10");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: All external parameters (project name,
//!   target core, web root, lenient allow-list, patches file, paths) in one
//!   explicit struct.
//! - **Defaults (`defaults`)**: The default manifest for a project.
//! - **Merge (`merge`)**: Recursive merge of manifest trees where lists
//!   concatenate and later trees win.
//! - **Expansion (`expand`)**: The adjustment policy around the merge and the
//!   read/expand/write run.
//! - **Version gating (`version`)**: Reducing a core constraint to a version
//!   that can be compared against thresholds.
//! - **Output (`output`)**: Writing JSON the way PHP's `json_encode` does, so
//!   the result is byte-compatible with what Composer tooling expects.

pub mod config;
pub mod defaults;
pub mod error;
pub mod expand;
pub mod merge;
pub mod output;
pub mod version;

#[cfg(test)]
mod merge_proptest;
