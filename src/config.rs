//! Configuration file loading.
//!
//! The file is optional. Anything wrong with it is reported as a warning
//! and the defaults are used instead.

use crate::error::{CliError, Result};
use cellflow_engine::engine::EngineConfig;
use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// error | warn | info | debug | trace | off
    pub log_level: String,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    /// Configured log level, falling back to `warn` if it does not parse.
    pub fn level_filter(&self) -> (LevelFilter, Option<String>) {
        match self.log_level.trim().parse::<LevelFilter>() {
            Ok(level) => (level, None),
            Err(_) => (
                LevelFilter::Warn,
                Some(format!("Unknown log_level {:?}, using warn", self.log_level)),
            ),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellflow")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn read_config(path: &Path) -> Result<Config> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(CliError::Config {
            path: path.to_path_buf(),
            message: format!(
                "file too large ({} bytes, max {})",
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ),
        });
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str::<Config>(&content).map_err(|err| CliError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Load the config from `config_file`, or from the user config dir when
/// none is given. Returns the config plus any warnings to show the user.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warnings.push(err.to_string());
            (Config::default(), warnings)
        }
    }
}
