//! log4rs setup for the binary.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Initialize logging from `config_file`, or log warnings to stderr when it is missing.
///
/// Stdout stays reserved for results.
pub fn init_logging(config_file: &Path) -> Result<(), Box<dyn Error>> {
    if config_file.exists() {
        log4rs::init_file(config_file, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {}: {e}", config_file.display()))?;
        log::debug!("logging configured from {}", config_file.display());
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .map_err(|e| format!("Error building log4rs config: {e}"))?;
    log4rs::init_config(config).map_err(|e| format!("Error initializing log4rs: {e}"))?;
    Ok(())
}
