// crates/covid-core/src/lib.rs

//! covid-core
//! ==========
//!
//! Turns the wide, date-columnar COVID-19 time series (one row per
//! country/sub-region, one column per day) into per-country and global
//! summaries plus chronological series, ready for a dashboard.
//!
//! ```rust
//! use covid_core::prelude::*;
//!
//! let header = "Province/State,Country/Region,Lat,Long,3/1/20,3/2/20\n";
//! let db = CovidDb::new(StaticCsvSource::new(
//!     format!("{header},US,40,-100,10,25\n,Chile,-35,-71,1,3\n"),
//!     format!("{header},US,40,-100,0,1\n"),
//!     header,
//! ));
//!
//! let us = db.get_country_data("US")?;
//! assert_eq!(us.name, "United States");
//! assert_eq!((us.confirmed, us.new_confirmed), (25, 15));
//!
//! let global = db.get_country_data("Global")?;
//! assert_eq!(global.confirmed, 28);
//! # Ok::<(), covid_core::CovidError>(())
//! ```

pub mod aggregate;
pub mod alias;
pub mod dates;
pub mod db;
pub mod derived;
pub mod error;
pub mod loader;
pub mod markers;
pub mod model;
pub mod prelude;
pub mod raw;
pub mod text;

// Re-exports
pub use crate::db::{ComparisonRow, CovidDb, CovidDbBuilder, DefaultCovidDb, GLOBAL};
pub use crate::error::{CovidError, Result};
pub use crate::model::{
    DailyPoint, DailySeries, DatasetKind, EntityStats, MarkerStats, Metric, Timeseries,
};
