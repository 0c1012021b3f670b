//! # Manifest Expansion
//!
//! This module ties the pieces together. [`expand_manifest`] turns a
//! project's partial `composer.json` into the full manifest used in CI, and
//! [`run`] does the same from and to disk.
//!
//! ## Steps
//!
//! 1.  **Defaults**: Build the default manifest for the project.
//! 2.  **Pruning**: Drop default entries that the project replaces
//!     (`drupal/core-recommended` when the project requires `drupal/core`,
//!     the canonical package repository when the project declares its own
//!     entry for it) and add `phpspec/prophecy-phpunit` when the configured
//!     core version sorts at or above 9.0.0.
//! 3.  **Merge**: Deep-merge defaults and project, project winning.
//! 4.  **Repositories**: Recompute `repositories` with the project's entries
//!     first, since Composer consults repositories in declaration order.
//! 5.  **Lenient allow-list**: Append `drupal/<name>` entries to
//!     `extra.drupal-lenient.allowed-list`.
//! 6.  **Patches file**: Point `extra.patches-file` at the configured file,
//!     looking in the CI config directory as well, or accept a URL.
//! 7.  **Cleanup**: Drop empty top-level entries.
//!
//! Each step either patches the working manifest or fails the whole run;
//! nothing is written until every step succeeded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value};
use url::Url;

use crate::config::Config;
use crate::defaults::{default_manifest, DRUPAL_PACKAGES_URL};
use crate::error::{Error, Result};
use crate::merge::{merge_deep, navigate_object};
use crate::output::write_manifest;
use crate::version::{meets_minimum, PROPHECY_MINIMUM_CORE};

/// The core package itself.
pub const CORE_PACKAGE: &str = "drupal/core";

/// The bundle of core plus its pinned dependencies.
pub const CORE_RECOMMENDED_PACKAGE: &str = "drupal/core-recommended";

/// Testing helper added for Drupal 9 and later.
pub const PROPHECY_PACKAGE: &str = "phpspec/prophecy-phpunit";

/// Constraint used for [`PROPHECY_PACKAGE`].
pub const PROPHECY_CONSTRAINT: &str = "^2";

/// Key of the canonical package repository in the default manifest.
pub const DRUPAL_REPOSITORY_KEY: &str = "drupal";

/// Directory searched for patches files given by bare name.
pub const CI_CONFIG_DIR: &str = "./.gitlab-ci/";

/// Expand a project manifest.
///
/// `base_dir` is the directory a relative patches file is looked up from.
///
/// # Errors
///
/// Returns `Error::InvalidPatchesFile` if a patches file is configured but
/// cannot be resolved, and `Error::Manifest` if the merged `extra` section
/// cannot hold the lenient allow-list or the patches file.
pub fn expand_manifest(project: &Value, config: &Config, base_dir: &Path) -> Result<Value> {
    let mut defaults = default_manifest(
        &config.project_name,
        config.target_core_constraint(),
        config.web_root(),
    );
    prune_defaults(&mut defaults, project, config);

    let mut merged = merge_deep([&defaults, project]);
    prioritize_project_repositories(&mut merged, &defaults, project);

    if let Some(allow_list) = &config.lenient_allow_list {
        add_lenient_allow_list(&mut merged, allow_list)?;
    }

    if let Some(patches_file) = &config.patches_file {
        let resolved = resolve_patches_file(patches_file, base_dir)?;
        debug!("Using patches file {}", resolved);
        navigate_object(&mut merged, &["extra"])?
            .insert("patches-file".to_string(), Value::String(resolved));
    }

    drop_empty_entries(&mut merged);
    Ok(merged)
}

/// Read, expand and write the project manifest described by `config`.
///
/// Returns the path the expanded manifest was written to.
pub fn run(config: &Config) -> Result<PathBuf> {
    let input = config.input_path();
    let project = load_project_manifest(&input)?;
    let expanded = expand_manifest(&project, config, &config.working_dir)?;

    let destination = config.destination_path();
    write_manifest(&destination, &expanded)?;
    info!("Wrote expanded manifest to {}", destination.display());
    Ok(destination)
}

/// Load the project manifest, treating a missing file as an empty manifest.
///
/// # Errors
///
/// Returns `Error::ManifestParse` if the file is not a JSON object.
pub fn load_project_manifest(path: &Path) -> Result<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(
                "{} not found, expanding from defaults only",
                path.display()
            );
            return Ok(Value::Object(Map::new()));
        }
        Err(err) => return Err(err.into()),
    };

    let value: Value = serde_json::from_str(&content).map_err(|err| Error::ManifestParse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    if !value.is_object() {
        return Err(Error::ManifestParse {
            path: path.display().to_string(),
            message: "top-level value must be a JSON object".to_string(),
        });
    }
    Ok(value)
}

/// Adjust the defaults according to what the project already declares.
fn prune_defaults(defaults: &mut Value, project: &Value, config: &Config) {
    let project_dev = &project["require-dev"];

    if let Some(require_dev) = defaults["require-dev"].as_object_mut() {
        if !project_dev[CORE_PACKAGE].is_null() {
            debug!(
                "Project requires {}, dropping {}",
                CORE_PACKAGE, CORE_RECOMMENDED_PACKAGE
            );
            require_dev.shift_remove(CORE_RECOMMENDED_PACKAGE);
        }

        let wants_prophecy = config
            .target_core
            .as_deref()
            .is_some_and(|core| meets_minimum(core, &PROPHECY_MINIMUM_CORE));
        if project_dev[PROPHECY_PACKAGE].is_null() && wants_prophecy {
            debug!("Adding {} {}", PROPHECY_PACKAGE, PROPHECY_CONSTRAINT);
            require_dev.insert(
                PROPHECY_PACKAGE.to_string(),
                Value::String(PROPHECY_CONSTRAINT.to_string()),
            );
        }
    }

    if declares_drupal_repository(&project["repositories"]) {
        debug!(
            "Project declares {}, dropping the default repository",
            DRUPAL_PACKAGES_URL
        );
        if let Some(repositories) = defaults["repositories"].as_object_mut() {
            repositories.shift_remove(DRUPAL_REPOSITORY_KEY);
        }
    }
}

/// Whether any repository entry points at the canonical package source.
fn declares_drupal_repository(repositories: &Value) -> bool {
    let url_matches = |repository: &Value| repository["url"] == DRUPAL_PACKAGES_URL;
    match repositories {
        Value::Array(entries) => entries.iter().any(url_matches),
        Value::Object(entries) => entries.values().any(url_matches),
        _ => false,
    }
}

/// Recompute `repositories` so the project's entries come first and win.
fn prioritize_project_repositories(merged: &mut Value, defaults: &Value, project: &Value) {
    let repositories = merge_deep([&project["repositories"], &defaults["repositories"]]);
    if let Some(entries) = merged.as_object_mut() {
        entries.insert("repositories".to_string(), repositories);
    }
}

/// Append `drupal/<name>` for every comma-separated name in `allow_list`.
fn add_lenient_allow_list(merged: &mut Value, allow_list: &str) -> Result<()> {
    let lenient = navigate_object(merged, &["extra", "drupal-lenient"])?;
    let allowed = lenient
        .entry("allowed-list".to_string())
        .or_insert(Value::Array(Vec::new()));
    if allowed.is_null() {
        *allowed = Value::Array(Vec::new());
    }

    for name in allow_list.split(',') {
        let package = Value::String(format!("drupal/{}", name.trim()));
        match &mut *allowed {
            Value::Array(items) => items.push(package),
            Value::Object(entries) => {
                let next_index = entries
                    .keys()
                    .filter_map(|key| key.parse::<usize>().ok())
                    .max()
                    .map_or(0, |max| max + 1);
                entries.insert(next_index.to_string(), package);
            }
            _ => {
                return Err(Error::Manifest {
                    message: "extra.drupal-lenient.allowed-list must be a list".to_string(),
                })
            }
        }
    }

    debug!("Lenient allow-list: {}", allowed);
    Ok(())
}

/// Resolve the configured patches file.
///
/// Tries, in order, the path itself, the same name under the CI config
/// directory, and finally the value as a URL.
///
/// # Errors
///
/// Returns `Error::InvalidPatchesFile` if none of them apply.
pub fn resolve_patches_file(value: &str, base_dir: &Path) -> Result<String> {
    if base_dir.join(value).is_file() {
        return Ok(value.to_string());
    }

    let in_ci_dir = format!("{}{}", CI_CONFIG_DIR, value);
    if base_dir.join(&in_ci_dir).is_file() {
        return Ok(in_ci_dir);
    }

    if Url::parse(value).is_ok() {
        return Ok(value.to_string());
    }

    Err(Error::InvalidPatchesFile {
        value: value.to_string(),
    })
}

/// Remove top-level entries that carry no information.
pub fn drop_empty_entries(manifest: &mut Value) {
    if let Some(entries) = manifest.as_object_mut() {
        entries.retain(|key, value| {
            let keep = !is_empty_entry(value);
            if !keep {
                debug!("Dropping empty entry {}", key);
            }
            keep
        });
    }
}

/// `null`, `false`, zero, `""`, `"0"`, `[]` and `{}` count as empty.
pub fn is_empty_entry(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
    }
}
