//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Estimate the steel weight of an order from a small editable rule base.
#[derive(Parser, Debug)]
#[command(name = "weight-estimator")]
#[command(version, about = "Order weight estimator")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Rule base file; overrides the config file
    #[arg(short, long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate every line of an order file
    ///
    /// The order is JSON: either the extracted table rows
    /// (quantity, description, color, measurement) or a list of order lines.
    Estimate {
        /// Order file
        order: PathBuf,

        /// Also write the results as JSON to this path
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Show how a single description is classified and weighed
    Classify {
        /// Item description
        description: String,

        /// Measurement, e.g. "1000mm"
        #[arg(short, long)]
        measurement: Option<String>,
    },

    /// Inspect or edit the rule base
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Print the active rule base
    Show,

    /// Write the active rule base to a file
    Export {
        path: PathBuf,
    },

    /// Change the material density of a rule file in place
    SetDensity {
        path: PathBuf,

        /// kg/dm³
        density: f64,
    },
}
