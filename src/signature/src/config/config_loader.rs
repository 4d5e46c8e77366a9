use anyhow::{Context, Result};
use config::{Config as RConfig, ConfigBuilder, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::defaults::DEFAULT_LOG_LEVEL;
use crate::process_identification::constants::{
    COMPLETED_STATUS_MARKER, DEFAULT_BACKTRACK_LIMIT, DEFAULT_EXTRACTION_CONCURRENCY,
    DEFAULT_TEMPLATE_DIR,
};
use crate::process_identification::rules::StoreOptions;

/// Prefix of environment overrides, e.g. `TRACER_SIGNATURE_BACKTRACK_LIMIT=50000`
pub const ENV_PREFIX: &str = "TRACER_SIGNATURE";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Rule ids dropped at load
    pub denylist: Vec<String>,
    pub backtrack_limit: usize,
    pub template_dir: String,
    pub completion_marker: String,
    pub extraction_concurrency: usize,
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            denylist: self.denylist.iter().cloned().collect::<HashSet<_>>(),
            backtrack_limit: self.backtrack_limit,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the TOML file if given, then `TRACER_SIGNATURE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Config> {
        Self::load_with_env(path, None)
    }

    /// As [`ConfigLoader::load`], reading overrides from `env` instead of the process
    /// environment when it is given
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Config> {
        let mut builder = Self::defaults()?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("denylist")
                .source(env),
        );

        let config: Config = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse config file")?;

        anyhow::ensure!(
            config.extraction_concurrency > 0,
            "extraction_concurrency must be at least 1"
        );
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let builder = RConfig::builder()
            .set_default::<&str, Vec<&str>>("denylist", vec![])?
            .set_default("backtrack_limit", DEFAULT_BACKTRACK_LIMIT as u64)?
            .set_default("template_dir", DEFAULT_TEMPLATE_DIR)?
            .set_default("completion_marker", COMPLETED_STATUS_MARKER)?
            .set_default(
                "extraction_concurrency",
                DEFAULT_EXTRACTION_CONCURRENCY as u64,
            )?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;
        Ok(builder)
    }
}
