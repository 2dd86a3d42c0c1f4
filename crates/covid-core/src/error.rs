// crates/covid-core/src/error.rs
use crate::model::DatasetKind;
use thiserror::Error;

/// Errors surfaced by the aggregation engine.
///
/// Nothing in the crate swallows these: every failure travels back to the
/// caller, which decides how to present it (the CLI prints it and exits
/// non-zero).
#[derive(Debug, Error)]
pub enum CovidError {
    /// A source dataset could not be read or is structurally broken.
    /// The cache stays cold so the next call retries from scratch.
    #[error("failed to load {dataset} dataset: {source}")]
    LoadFailure {
        dataset: DatasetKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The requested country has no rows in the confirmed dataset.
    #[error("No data found for country: {0}")]
    NotFound(String),

    /// A header looks like a date column but is not a calendar date.
    #[error("invalid date column `{0}`")]
    DateParse(String),

    /// A cell inside a date column is not an integer count.
    #[error("invalid count `{value}` in column `{column}`")]
    InvalidCount { column: String, value: String },

    /// Summing or differencing counts left the `i64` range.
    #[error("count overflow while computing {0}")]
    CountOverflow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CovidError {
    pub(crate) fn load(
        dataset: DatasetKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CovidError::LoadFailure {
            dataset,
            source: source.into(),
        }
    }

    pub(crate) fn overflow(what: impl Into<String>) -> Self {
        CovidError::CountOverflow(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CovidError::NotFound(_))
    }

    pub fn is_load_failure(&self) -> bool {
        matches!(self, CovidError::LoadFailure { .. })
    }

    /// True for the data-integrity family (bad date header, bad or overflowing count).
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            CovidError::DateParse(_)
                | CovidError::InvalidCount { .. }
                | CovidError::CountOverflow(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CovidError>;
