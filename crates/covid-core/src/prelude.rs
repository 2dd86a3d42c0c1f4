//! covid-core prelude: bring common types and traits into scope for demos.

pub use crate::aggregate::{aggregate_by_country, aggregate_global, aggregate_rows, Aggregate};
pub use crate::alias::{AliasTable, Normalizer};
pub use crate::db::{ComparisonRow, CovidDb, DefaultCovidDb, GLOBAL};
pub use crate::derived::{change_percentage, format_change_percentage, merge_timeseries};
pub use crate::error::{CovidError, Result};
pub use crate::loader::{CsvDirSource, DataSource, DatasetCache, LoaderConfig, StaticCsvSource};
pub use crate::markers::CoordinateOverrides;
pub use crate::model::{
    DailyPoint, DailySeries, DatasetKind, EntityStats, MarkerStats, Metric, Timeseries,
};
