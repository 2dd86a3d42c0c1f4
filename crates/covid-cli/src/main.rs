//! covid-cli: command-line interface for covid-core
//!
//! Every command prints JSON on stdout, logs go to stderr.
//!
//! Usage examples
//! --------------
//!
//! - List countries
//!   $ covid-cli countries
//!
//! - One country, by raw or canonical name
//!   $ covid-cli country US
//!   $ covid-cli country "Korea, South" --pretty
//!
//! - World totals
//!   $ covid-cli global
//!
//! - Map markers
//!   $ covid-cli markers
//!
//! - Rankings and search
//!   $ covid-cli top --by deaths --limit 10
//!   $ covid-cli search cote
//!
//! - Compare series
//!   $ covid-cli compare Italy Spain --series deaths
//!
//! Data source
//! -----------
//!
//! By default the CLI reads the sample CSV files bundled with `covid-core`.
//! Point `--data-dir` (or `COVID_DATA_DIR`) at a directory holding the JHU
//! archived time series to use the real data.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use covid_core::alias::AliasTable;
use covid_core::loader::{CsvDirSource, LoaderConfig};
use covid_core::markers::CoordinateOverrides;
use covid_core::CovidDb;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let mut config = LoaderConfig::default();
    if let Some(dir) = &args.data_dir {
        config = config.with_dir(dir);
    }

    debug!(data_dir = %config.data_dir.display(), "resolved data directory");

    let mut builder = CovidDb::builder(CsvDirSource::new(config));
    if let Some(path) = &args.aliases {
        let table = AliasTable::load_from_path(path)
            .with_context(|| format!("loading alias table {}", path.display()))?;
        builder = builder.aliases(table);
    }
    if let Some(path) = &args.coords {
        let overrides = CoordinateOverrides::load_from_path(path)
            .with_context(|| format!("loading coordinate overrides {}", path.display()))?;
        builder = builder.coordinate_overrides(overrides);
    }
    let db = builder.build();

    match args.command {
        Commands::Countries => print_json(&db.list_countries()?, args.pretty)?,

        Commands::Country { name } => {
            let stats = db
                .get_country_data(&name)
                .with_context(|| format!("Failed to fetch data for country: {name}"))?;
            print_json(&stats, args.pretty)?
        }

        Commands::Global => print_json(&db.get_global_data()?, args.pretty)?,

        Commands::Markers => print_json(
            &db.get_all_countries_stats()
                .context("Failed to fetch countries stats")?,
            args.pretty,
        )?,

        Commands::Top { by, limit } => print_json(&db.top_countries(by, limit)?, args.pretty)?,

        Commands::Search { query } => print_json(&db.search_countries(&query)?, args.pretty)?,

        Commands::Compare { names, series } => {
            print_json(&db.compare_countries(&names, series)?, args.pretty)?
        }
    }

    Ok(())
}
