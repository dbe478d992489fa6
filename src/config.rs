//! Environment driven settings for the binary.
//!
//! Values come from the process environment, after loading a `.env` file
//! when one exists. Command line flags override them.

use clap::ValueEnum;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the log4rs config file.
pub const ENV_LOG_CONFIG: &str = "CIDR_ALLOCATE_LOG_CONFIG";
/// Environment variable selecting the output format.
pub const ENV_OUTPUT: &str = "CIDR_ALLOCATE_OUTPUT";

const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn from_env_value(value: &str) -> Option<OutputFormat> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_config: PathBuf,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_config: PathBuf::from(DEFAULT_LOG_CONFIG),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read settings from the environment.
    pub fn from_env() -> Config {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup, unknown values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = lookup(ENV_LOG_CONFIG).filter(|p| !p.trim().is_empty()) {
            config.log_config = PathBuf::from(path.trim());
        }
        if let Some(value) = lookup(ENV_OUTPUT) {
            match OutputFormat::from_env_value(&value) {
                Some(output) => config.output = output,
                None => log::warn!("ignoring unknown {ENV_OUTPUT}={value}"),
            }
        }
        config
    }
}
