use cidr_allocate::cli::{execute, Cli};
use cidr_allocate::config::Config;
use cidr_allocate::logging::init_logging;
use cidr_allocate::output::emit;
use clap::Parser;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = &cli.log_config {
        config.log_config = path.clone();
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    init_logging(&config.log_config)?;
    log::debug!("#Start main() {config:?}");

    let report = execute(&cli.command)?;
    emit(&report, config.output)?;

    Ok(())
}
