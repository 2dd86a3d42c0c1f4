// crates/covid-core/src/db.rs

//! # Query Facade
//!
//! [`CovidDb`] is what collaborators (the CLI, an HTTP layer, a UI) talk to.
//! It owns the dataset cache and the injected lookup tables, and builds
//! every response fresh from the cached raw rows.

use crate::aggregate::{aggregate_global, aggregate_rows, rows_for_country, Aggregate, CountryGroups};
use crate::alias::{AliasTable, Normalizer};
use crate::derived::entity_stats;
use crate::error::{CovidError, Result};
use crate::loader::{CsvDirSource, DataSource, DatasetCache, LoaderConfig};
use crate::markers::{build_markers, CoordinateOverrides};
use crate::model::{DatasetKind, EntityStats, MarkerStats, Metric};
use crate::raw::Datasets;
use crate::text::contains_folded;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Name of the pseudo-entity that sums every row.
pub const GLOBAL: &str = "Global";

/// One date of a multi-country comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub date: String,
    /// Country → value at `date`; countries without a point are absent.
    pub values: BTreeMap<String, i64>,
}

/// Normalization + aggregation engine over a cached [`DataSource`].
pub struct CovidDb<S> {
    cache: DatasetCache<S>,
    normalizer: Normalizer,
    overrides: CoordinateOverrides,
}

/// Convenient alias for the filesystem-backed engine.
pub type DefaultCovidDb = CovidDb<CsvDirSource>;

impl CovidDb<CsvDirSource> {
    /// Engine over the CSV files described by `config`, with built-in tables.
    pub fn from_config(config: LoaderConfig) -> Self {
        CovidDb::new(CsvDirSource::new(config))
    }

    /// Engine over the bundled `data/` directory.
    pub fn with_default_data() -> Self {
        Self::from_config(LoaderConfig::default())
    }
}

impl<S: DataSource> CovidDb<S> {
    /// Engine over `source` with the built-in alias and coordinate tables.
    pub fn new(source: S) -> Self {
        Self::builder(source).build()
    }

    pub fn builder(source: S) -> CovidDbBuilder<S> {
        CovidDbBuilder {
            source,
            aliases: None,
            overrides: None,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn cache(&self) -> &DatasetCache<S> {
        &self.cache
    }

    /// Raw datasets, loading them on first use.
    pub fn datasets(&self) -> Result<Arc<Datasets>> {
        self.cache.load_all()
    }

    /// Distinct canonical names of the confirmed dataset, sorted.
    pub fn list_countries(&self) -> Result<Vec<String>> {
        let data = self.datasets()?;
        let groups = CountryGroups::build(&data.confirmed.rows, &self.normalizer);
        let names: BTreeSet<&str> = groups.names().collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    /// Stats and series for one country, or for [`GLOBAL`].
    ///
    /// `raw_name` is normalized first, so `"US"` and `"United States"` are
    /// the same query. Fails with [`CovidError::NotFound`] when the
    /// confirmed dataset has no matching row.
    pub fn get_country_data(&self, raw_name: &str) -> Result<EntityStats> {
        let data = self.datasets()?;
        let name = self.normalizer.normalize(raw_name);
        if name == GLOBAL {
            return global_stats(&data);
        }
        country_stats(&data, &self.normalizer, name)?
            .ok_or_else(|| CovidError::NotFound(raw_name.to_string()))
    }

    /// Shorthand for `get_country_data("Global")`.
    pub fn get_global_data(&self) -> Result<EntityStats> {
        let data = self.datasets()?;
        global_stats(&data)
    }

    /// Map markers for every country of the confirmed dataset.
    pub fn get_all_countries_stats(&self) -> Result<Vec<MarkerStats>> {
        let data = self.datasets()?;
        build_markers(&data, &self.normalizer, &self.overrides)
    }

    /// Countries ranked by `metric`, highest first, ties by name.
    pub fn top_countries(&self, metric: Metric, limit: usize) -> Result<Vec<EntityStats>> {
        let data = self.datasets()?;
        let mut all = Vec::new();
        for name in self.list_countries()? {
            if name == GLOBAL {
                continue;
            }
            if let Some(stats) = country_stats(&data, &self.normalizer, &name)? {
                all.push(stats);
            }
        }
        all.sort_by(|a, b| {
            b.metric(metric)
                .cmp(&a.metric(metric))
                .then_with(|| a.name.cmp(&b.name))
        });
        all.truncate(limit);
        debug!(%metric, limit, returned = all.len(), "ranked countries");
        Ok(all)
    }

    /// Listed names containing `query`, accent- and case-insensitive.
    pub fn search_countries(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        Ok(self
            .list_countries()?
            .into_iter()
            .filter(|name| contains_folded(name, query))
            .collect())
    }

    /// One row per date (sorted union) with each requested country's value.
    ///
    /// Names are compared after normalization, so `"US"` and
    /// `"United States"` in one request share a single column.
    pub fn compare_countries<N: AsRef<str>>(
        &self,
        names: &[N],
        series: DatasetKind,
    ) -> Result<Vec<ComparisonRow>> {
        let mut seen = BTreeSet::new();
        let mut by_date: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
        for raw in names {
            let raw = raw.as_ref();
            if !seen.insert(self.normalizer.normalize(raw)) {
                debug!(country = raw, "duplicate country in comparison");
                continue;
            }
            let stats = self.get_country_data(raw)?;
            for point in stats.timeseries.get(series) {
                by_date
                    .entry(point.date.clone())
                    .or_default()
                    .insert(stats.name.clone(), point.value);
            }
        }
        Ok(by_date
            .into_iter()
            .map(|(date, values)| ComparisonRow { date, values })
            .collect())
    }
}

fn global_stats(data: &Datasets) -> Result<EntityStats> {
    entity_stats(
        GLOBAL,
        aggregate_global(&data.confirmed)?,
        aggregate_global(&data.deaths)?,
        aggregate_global(&data.recovered)?,
    )
}

/// `None` when the confirmed dataset has no row for `name`.
fn country_stats(data: &Datasets, normalizer: &Normalizer, name: &str) -> Result<Option<EntityStats>> {
    let mut confirmed_rows = rows_for_country(&data.confirmed, normalizer, name).peekable();
    if confirmed_rows.peek().is_none() {
        return Ok(None);
    }
    let confirmed = aggregate_rows(confirmed_rows)?;
    let deaths: Aggregate = aggregate_rows(rows_for_country(&data.deaths, normalizer, name))?;
    let recovered = aggregate_rows(rows_for_country(&data.recovered, normalizer, name))?;
    debug!(country = name, "aggregated country");
    entity_stats(name, confirmed, deaths, recovered).map(Some)
}

/// Wires injected tables into a [`CovidDb`].
pub struct CovidDbBuilder<S> {
    source: S,
    aliases: Option<AliasTable>,
    overrides: Option<CoordinateOverrides>,
}

impl<S: DataSource> CovidDbBuilder<S> {
    pub fn aliases(mut self, table: AliasTable) -> Self {
        self.aliases = Some(table);
        self
    }

    pub fn coordinate_overrides(mut self, overrides: CoordinateOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn build(self) -> CovidDb<S> {
        CovidDb {
            cache: DatasetCache::new(self.source),
            normalizer: Normalizer::new(self.aliases.unwrap_or_else(AliasTable::builtin)),
            overrides: self
                .overrides
                .unwrap_or_else(CoordinateOverrides::builtin),
        }
    }
}
