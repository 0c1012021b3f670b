//! Default values for the expanded manifest.
//!
//! This module builds the baseline `composer.json` every module gets in CI:
//! the dev tooling needed to install Drupal around the module, the Composer
//! plugins that tooling relies on, and the installer paths that place
//! packages under the web root.

use serde_json::{json, Map, Value};

/// Core constraint used when none is configured.
pub const DEFAULT_TARGET_CORE: &str = "^10";

/// Web root used when none is configured.
pub const DEFAULT_WEB_ROOT: &str = "web";

/// Package source every Drupal project resolves from.
pub const DRUPAL_PACKAGES_URL: &str = "https://packages.drupal.org/8";

/// Returns the default manifest for a project.
///
/// The core packages (`drupal/core-composer-scaffold`, `drupal/core-dev`,
/// `drupal/core-recommended`) are pinned to `target_core`; installer paths and
/// the scaffold location live under `web_root`.
pub fn default_manifest(project_name: &str, target_core: &str, web_root: &str) -> Value {
    json!({
        "name": format!("drupal/{}", project_name),
        "type": "drupal-module",
        "description": "A description",
        "license": "GPL-2.0-or-later",
        "repositories": {
            "drupal": {
                "type": "composer",
                "url": DRUPAL_PACKAGES_URL,
            },
        },
        "require": {},
        "require-dev": {
            "composer/installers": "^1 || ^2",
            "cweagans/composer-patches": "~1.0",
            "drupal/admin_toolbar": "~3",
            "drupal/config_inspector": "~2",
            "drupal/core-composer-scaffold": target_core,
            "drupal/core-dev": target_core,
            "drupal/core-recommended": target_core,
            "drupal/devel_php": "~1",
            "drupal/upgrade_status": "~4",
            "drush/drush": "^10 || ^11 || ^12 || ^13",
            "php-parallel-lint/php-parallel-lint": "~1",
        },
        "minimum-stability": "dev",
        "prefer-stable": true,
        "config": {
            "process-timeout": 36000,
            "allow-plugins": {
                "composer/installers": true,
                "cweagans/composer-patches": true,
                "dealerdirect/phpcodesniffer-composer-installer": true,
                "drupal/core-composer-scaffold": true,
                "drupalspoons/composer-plugin": true,
                "php-http/discovery": true,
                "phpstan/extension-installer": true,
                "tbachert/spi": true,
            },
        },
        "extra": {
            "installer-paths": installer_paths(web_root),
            "drupal-scaffold": {
                "locations": {
                    "web-root": format!("{}/", web_root),
                },
            },
            "drush": {
                "services": {
                    "drush.services.yml": "^9 || ^10 || ^11",
                },
            },
        },
    })
}

/// `composer/installers` rules, one single-entry list per package type.
fn installer_paths(web_root: &str) -> Value {
    let rules = [
        (format!("{}/core", web_root), "type:drupal-core"),
        (format!("{}/libraries/{{$name}}", web_root), "type:drupal-library"),
        (format!("{}/modules/contrib/{{$name}}", web_root), "type:drupal-module"),
        (format!("{}/profiles/{{$name}}", web_root), "type:drupal-profile"),
        (format!("{}/themes/{{$name}}", web_root), "type:drupal-theme"),
        ("drush/{$name}".to_string(), "type:drupal-drush"),
    ];

    let paths: Map<String, Value> = rules
        .into_iter()
        .map(|(path, package_type)| (path, json!([package_type])))
        .collect();
    Value::Object(paths)
}
