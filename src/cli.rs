//! CLI argument parsing and execution

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::debug;

use composer_expand::config::{Config, DEFAULT_MANIFEST_PATH};
use composer_expand::error::Error;
use composer_expand::expand;

/// Diagnostic printed when the patches file cannot be resolved.
const INVALID_PATCHES_FILE_MESSAGE: &str = "Patch file is not valid!";

/// Expand a Drupal module's composer.json with the defaults used in CI
#[derive(Parser, Debug)]
#[command(name = "expand-composer-json")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project machine name (without the "drupal/" prefix)
    #[arg(value_name = "PROJECT", env = "CI_PROJECT_NAME")]
    project_name: Option<String>,

    /// Drupal core constraint used for the core packages
    #[arg(long, value_name = "CONSTRAINT", env = "_TARGET_CORE")]
    target_core: Option<String>,

    /// Web root directory for installer paths and scaffolding
    #[arg(long, value_name = "PATH", env = "_WEB_ROOT")]
    web_root: Option<String>,

    /// Comma-separated modules allowed by the lenient plugin
    #[arg(long, value_name = "MODULES", env = "LENIENT_ALLOW_LIST")]
    lenient_allow_list: Option<String>,

    /// Composer patches file, as a path or URL
    #[arg(long, value_name = "PATH_OR_URL", env = "COMPOSER_PATCHES_FILE")]
    patches_file: Option<String>,

    /// Project manifest to read
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_MANIFEST_PATH)]
    manifest: PathBuf,

    /// Write the result here instead of overwriting the manifest
    #[arg(short, long, value_name = "PATH", env = "COMPOSER")]
    output: Option<PathBuf>,

    /// Directory to resolve relative paths against
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    working_dir: PathBuf,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the expansion
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .init();

        let config = self.into_config()?;
        debug!("{:?}", config);

        match expand::run(&config) {
            Ok(_) => Ok(()),
            Err(Error::InvalidPatchesFile { value }) => {
                debug!("Unresolvable patches file: {}", value);
                print!("{}", INVALID_PATCHES_FILE_MESSAGE);
                io::stdout().flush()?;
                std::process::exit(1);
            }
            Err(err) => Err(err.into()),
        }
    }

    fn into_config(self) -> Result<Config> {
        let config = Config::from_project_name(self.project_name)?
            .with_target_core(self.target_core)
            .with_web_root(self.web_root)
            .with_lenient_allow_list(self.lenient_allow_list)
            .with_patches_file(self.patches_file)
            .with_manifest_path(self.manifest)
            .with_output_path(self.output)
            .with_working_dir(self.working_dir);
        Ok(config)
    }
}
