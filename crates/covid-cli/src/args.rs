use clap::{Parser, Subcommand};
use covid_core::{DatasetKind, Metric};
use std::path::PathBuf;

/// CLI arguments for covid-cli
#[derive(Debug, Parser)]
#[command(
    name = "covid-cli",
    version,
    about = "CLI for querying normalized COVID-19 country statistics"
)]
pub struct CliArgs {
    /// Directory holding the confirmed/deaths/recovered CSV files
    #[arg(short = 'd', long = "data-dir", env = "COVID_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON file replacing the built-in country alias table
    #[arg(long = "aliases", global = true)]
    pub aliases: Option<PathBuf>,

    /// JSON file replacing the built-in coordinate overrides
    #[arg(long = "coords", global = true)]
    pub coords: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short = 'p', long = "pretty", global = true)]
    pub pretty: bool,

    /// Log loading and aggregation steps to stderr (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List canonical country names
    Countries,

    /// Stats and time series for one country (or "Global")
    Country {
        /// Country name as in the dataset or its canonical alias (e.g. US)
        name: String,
    },

    /// Stats and time series summed over every country
    Global,

    /// Coordinates and latest totals for every country
    Markers,

    /// Countries ranked by a metric
    Top {
        /// confirmed, deaths, recovered, active, newConfirmed, ...
        #[arg(short = 'b', long = "by", default_value = "confirmed")]
        by: Metric,

        /// Number of countries to return
        #[arg(short = 'n', long = "limit", default_value_t = 5)]
        limit: usize,
    },

    /// Search country names (case and accent insensitive)
    Search {
        /// Substring to search
        query: String,
    },

    /// Line up several countries' series by date
    Compare {
        /// Countries to compare
        #[arg(required = true)]
        names: Vec<String>,

        /// Which series to compare
        #[arg(short = 's', long = "series", default_value = "confirmed")]
        series: DatasetKind,
    },
}
