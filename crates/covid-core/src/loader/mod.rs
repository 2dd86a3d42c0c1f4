// crates/covid-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (I/O, Decompression, CSV) behind the
//! [`DataSource`] trait, and owns the process-lifetime [`DatasetCache`].

use crate::error::{CovidError, Result};
use crate::model::DatasetKind;
use crate::raw::{Dataset, Datasets};
use once_cell::sync::OnceCell;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub mod common_io;

pub const CONFIRMED_FILE: &str = "time_series_19-covid-Confirmed_archived_0325.csv";
pub const DEATHS_FILE: &str = "time_series_19-covid-Deaths_archived_0325.csv";
pub const RECOVERED_FILE: &str = "time_series_19-covid-Recovered_archived_0325.csv";

/// Where the three CSV files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub data_dir: PathBuf,
    pub confirmed_file: String,
    pub deaths_file: String,
    pub recovered_file: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            data_dir: Self::default_data_dir(),
            confirmed_file: CONFIRMED_FILE.to_string(),
            deaths_file: DEATHS_FILE.to_string(),
            recovered_file: RECOVERED_FILE.to_string(),
        }
    }
}

impl LoaderConfig {
    /// `data/` next to this crate's manifest.
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_file(mut self, kind: DatasetKind, file_name: impl Into<String>) -> Self {
        let name = file_name.into();
        match kind {
            DatasetKind::Confirmed => self.confirmed_file = name,
            DatasetKind::Deaths => self.deaths_file = name,
            DatasetKind::Recovered => self.recovered_file = name,
        }
        self
    }

    pub fn path_for(&self, kind: DatasetKind) -> PathBuf {
        let file = match kind {
            DatasetKind::Confirmed => &self.confirmed_file,
            DatasetKind::Deaths => &self.deaths_file,
            DatasetKind::Recovered => &self.recovered_file,
        };
        self.data_dir.join(file)
    }
}

/// A read-only tabular source of the three wide-format datasets.
///
/// Reads must be side-effect free: the cache may call `read` for the same
/// kind from several threads during a cold start.
pub trait DataSource: Send + Sync {
    fn read(&self, kind: DatasetKind) -> Result<Dataset>;
}

impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    fn read(&self, kind: DatasetKind) -> Result<Dataset> {
        (**self).read(kind)
    }
}

/// Reads CSV (optionally gzipped) files from a directory.
#[derive(Debug, Clone, Default)]
pub struct CsvDirSource {
    config: LoaderConfig,
}

impl CsvDirSource {
    pub fn new(config: LoaderConfig) -> Self {
        CsvDirSource { config }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(LoaderConfig::default().with_dir(dir.as_ref()))
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

impl DataSource for CsvDirSource {
    #[tracing::instrument(level = "debug", skip(self))]
    fn read(&self, kind: DatasetKind) -> Result<Dataset> {
        let path = self.config.path_for(kind);
        let reader = common_io::open_stream(&path).map_err(|e| {
            CovidError::load(
                kind,
                std::io::Error::new(e.kind(), format!("{}: {e}", path.display())),
            )
        })?;
        common_io::read_dataset(reader, kind)
    }
}

/// CSV text held in memory; handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCsvSource {
    pub confirmed: String,
    pub deaths: String,
    pub recovered: String,
}

impl StaticCsvSource {
    pub fn new(
        confirmed: impl Into<String>,
        deaths: impl Into<String>,
        recovered: impl Into<String>,
    ) -> Self {
        StaticCsvSource {
            confirmed: confirmed.into(),
            deaths: deaths.into(),
            recovered: recovered.into(),
        }
    }
}

impl DataSource for StaticCsvSource {
    fn read(&self, kind: DatasetKind) -> Result<Dataset> {
        let text = match kind {
            DatasetKind::Confirmed => &self.confirmed,
            DatasetKind::Deaths => &self.deaths,
            DatasetKind::Recovered => &self.recovered,
        };
        common_io::read_dataset(Cursor::new(text.as_bytes()), kind)
    }
}

/// Process-lifetime cache of the three datasets.
///
/// Populated once by the first successful [`DatasetCache::load_all`], never
/// refreshed or evicted. Concurrent first callers block on a single load;
/// a failed load leaves the cache empty so the next call starts cold.
pub struct DatasetCache<S> {
    source: S,
    cell: OnceCell<Arc<Datasets>>,
}

impl<S: DataSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        DatasetCache {
            source,
            cell: OnceCell::new(),
        }
    }

    /// All three datasets, reading them in parallel on the first call.
    pub fn load_all(&self) -> Result<Arc<Datasets>> {
        if let Some(cached) = self.cell.get() {
            debug!("dataset cache hit");
            return Ok(Arc::clone(cached));
        }
        self.cell
            .get_or_try_init(|| self.load_from_source().map(Arc::new))
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    #[tracing::instrument(level = "info", skip(self))]
    fn load_from_source(&self) -> Result<Datasets> {
        let start = Instant::now();
        let (confirmed, (deaths, recovered)) = rayon::join(
            || self.source.read(DatasetKind::Confirmed),
            || {
                rayon::join(
                    || self.source.read(DatasetKind::Deaths),
                    || self.source.read(DatasetKind::Recovered),
                )
            },
        );
        let datasets = Datasets {
            confirmed: confirmed?,
            deaths: deaths?,
            recovered: recovered?,
        };
        info!(
            confirmed = datasets.confirmed.len(),
            deaths = datasets.deaths.len(),
            recovered = datasets.recovered.len(),
            elapsed = ?start.elapsed(),
            "datasets loaded"
        );
        Ok(datasets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CSV: &str = "Province/State,Country/Region,Lat,Long,1/22/20\n,Chile,-35,-71,4\n";

    struct CountingSource {
        reads: AtomicUsize,
        fail_deaths: bool,
    }

    impl DataSource for CountingSource {
        fn read(&self, kind: DatasetKind) -> Result<Dataset> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_deaths && kind == DatasetKind::Deaths {
                return Err(CovidError::load(kind, "disk on fire"));
            }
            common_io::read_dataset(Cursor::new(CSV), kind)
        }
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let cache = DatasetCache::new(CountingSource {
            reads: AtomicUsize::new(0),
            fail_deaths: false,
        });
        assert!(!cache.is_loaded());

        let first = cache.load_all().unwrap();
        let second = cache.load_all().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().reads.load(Ordering::SeqCst), 3);
        assert!(cache.is_loaded());
    }

    #[test]
    fn failed_load_leaves_cache_cold() {
        let cache = DatasetCache::new(CountingSource {
            reads: AtomicUsize::new(0),
            fail_deaths: true,
        });
        let err = cache.load_all().unwrap_err();
        assert!(err.is_load_failure());
        assert!(!cache.is_loaded());

        // retried from scratch, not served partially
        assert!(cache.load_all().is_err());
        assert_eq!(cache.source().reads.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn missing_directory_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(CsvDirSource::from_dir(dir.path().join("nope")));
        let err = cache.load_all().unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn config_resolves_paths() {
        let cfg = LoaderConfig::default()
            .with_dir("/srv/covid")
            .with_file(DatasetKind::Deaths, "deaths.csv.gz");
        assert_eq!(cfg.path_for(DatasetKind::Deaths), PathBuf::from("/srv/covid/deaths.csv.gz"));
        assert_eq!(
            cfg.path_for(DatasetKind::Confirmed),
            PathBuf::from("/srv/covid").join(CONFIRMED_FILE)
        );
    }
}
