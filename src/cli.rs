//! Command-line interface.
//!
//! Commands only build a [`Report`], printing happens in [`crate::output`].

use crate::allocate::{allocate_cidr, AddressSpace};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Report;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Carve non-overlapping CIDR blocks out of an address space
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Output format, overrides CIDR_ALLOCATE_OUTPUT
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// log4rs config file, overrides CIDR_ALLOCATE_LOG_CONFIG
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub log_config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Allocate one block per requested prefix length, in order
    #[command(visible_alias = "a")]
    Allocate {
        /// Parent block bounding the scan (default scan starts at 10.0.0.0)
        #[arg(short, long)]
        parent: Option<String>,

        /// Blocks already taken, comma separated or repeated
        #[arg(short, long, value_delimiter = ',')]
        reserve: Vec<String>,

        /// Block to start scanning from instead of the default start
        #[arg(short, long)]
        start: Option<String>,

        /// Prefix lengths to allocate
        #[arg(required = true, value_name = "MASK")]
        masks: Vec<u8>,
    },

    /// Allocate single addresses
    Ip {
        /// Parent block the addresses come from
        #[arg(short, long)]
        parent: Option<String>,

        /// Blocks already taken, comma separated or repeated
        #[arg(short, long, value_delimiter = ',')]
        reserve: Vec<String>,

        /// Number of addresses
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Pick a scope level block after the first existing range
    #[command(visible_alias = "s")]
    Scope {
        /// Prefix length to allocate
        mask: u8,

        /// Ranges already in use by the scope
        #[arg(value_name = "CIDR")]
        existing: Vec<String>,
    },
}

/// Run a command against a fresh address space.
pub fn execute(command: &Commands) -> Result<Report> {
    match command {
        Commands::Allocate {
            parent,
            reserve,
            start,
            masks,
        } => {
            let mut space = AddressSpace::new(parent.as_deref())?;
            space.reserve(reserve)?;
            let mut report = Report {
                parent: parent_text(&space),
                ..Default::default()
            };
            for &mask in masks {
                let cidr = match start {
                    Some(start) => space.allocate_with_preference(mask, start)?,
                    None => space.allocate(mask)?,
                };
                log::debug!("{space}");
                report.push(format!("/{mask}"), cidr);
            }
            report.occupied = occupied_text(&space);
            Ok(report)
        }
        Commands::Ip {
            parent,
            reserve,
            count,
        } => {
            let mut space = AddressSpace::new(parent.as_deref())?;
            space.reserve(reserve)?;
            let mut report = Report {
                parent: parent_text(&space),
                ..Default::default()
            };
            for _ in 0..*count {
                report.push("ip", space.allocate_one_ip_address()?);
            }
            report.occupied = occupied_text(&space);
            Ok(report)
        }
        Commands::Scope { mask, existing } => {
            let mut report = Report::default();
            report.push(format!("/{mask}"), allocate_cidr(*mask, existing.as_slice())?);
            report.occupied = existing.clone();
            Ok(report)
        }
    }
}

fn parent_text(space: &AddressSpace) -> Option<String> {
    space.parent().map(|p| p.to_string())
}

fn occupied_text(space: &AddressSpace) -> Vec<String> {
    space.occupied().iter().map(|r| r.to_string()).collect()
}
