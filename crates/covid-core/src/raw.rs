// crates/covid-core/src/raw.rs

//! Raw rows exactly as they come out of the wide-format CSV files.
//!
//! Schema of one row:
//!
//! | column           | meaning                                   |
//! |------------------|-------------------------------------------|
//! | `Province/State` | sub-region, empty for a country-level row |
//! | `Country/Region` | raw country label (not yet normalized)    |
//! | `Lat`, `Long`    | decimal coordinates                       |
//! | `M/D/YY` ...     | one cumulative count per calendar day     |

use crate::error::{CovidError, Result};
use crate::model::DatasetKind;
use std::sync::Arc;

pub const PROVINCE_STATE: &str = "Province/State";
pub const COUNTRY_REGION: &str = "Country/Region";
pub const LAT: &str = "Lat";
pub const LONG: &str = "Long";

/// Ordered mapping from column name to cell value.
///
/// The header list is shared by every row of a [`Dataset`], so iteration
/// order is the left-to-right order of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RawRow {
    pub fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        RawRow { headers, values }
    }

    /// Builds a row from `(column, value)` pairs, keeping their order.
    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let (headers, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        RawRow {
            headers: headers.into(),
            values,
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Column names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn country(&self) -> &str {
        self.get(COUNTRY_REGION).unwrap_or("")
    }

    pub fn province(&self) -> &str {
        self.get(PROVINCE_STATE).unwrap_or("")
    }

    /// A row without a sub-region carries the country-level figures itself.
    ///
    /// Only a truly empty cell counts: `" "` is a (nameless) sub-region.
    pub fn is_main_row(&self) -> bool {
        self.province().is_empty()
    }

    /// Coordinate cell as `f64`; empty or unparseable cells read as `0.0`.
    pub fn coordinate(&self, column: &str) -> f64 {
        let raw = self.get(column).unwrap_or("").trim();
        if raw.is_empty() {
            return 0.0;
        }
        match raw.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(column, value = raw, country = self.country(), "unparseable coordinate");
                0.0
            }
        }
    }

    /// Count stored in `column`, parsed with [`parse_count`].
    pub fn count(&self, column: &str) -> Result<i64> {
        parse_count(column, self.get(column).unwrap_or(""))
    }

    /// Like [`RawRow::count`] but tries position `idx` first.
    ///
    /// Rows of one dataset share their header list, so the position found on
    /// the first row is valid for all of them; the name lookup only runs for
    /// rows built elsewhere.
    pub fn count_at(&self, idx: usize, column: &str) -> Result<i64> {
        match self.headers.get(idx) {
            Some(h) if h == column => {
                parse_count(column, self.values.get(idx).map(String::as_str).unwrap_or(""))
            }
            _ => self.count(column),
        }
    }
}

/// 2^63: the first float past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Parses a cumulative count cell.
///
/// Empty cells count as zero. Decimal notation (`"12.0"`) is accepted and
/// truncated as long as it fits in `i64`; anything else is an
/// [`CovidError::InvalidCount`].
pub fn parse_count(column: &str, raw: &str) -> Result<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(0);
    }
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && (-I64_BOUND..I64_BOUND).contains(&v.trunc()) => {
            Ok(v.trunc() as i64)
        }
        _ => Err(CovidError::InvalidCount {
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// One of the three source datasets, with a homogeneous column set.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub headers: Arc<[String]>,
    pub rows: Vec<RawRow>,
}

impl Dataset {
    pub fn new(kind: DatasetKind, headers: Vec<String>) -> Self {
        Dataset {
            kind,
            headers: headers.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row sharing this dataset's header list.
    pub fn push_values(&mut self, values: Vec<String>) {
        self.rows.push(RawRow::new(Arc::clone(&self.headers), values));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three datasets as held by the cache.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub confirmed: Dataset,
    pub deaths: Dataset,
    pub recovered: Dataset,
}

impl Datasets {
    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Confirmed => &self.confirmed,
            DatasetKind::Deaths => &self.deaths,
            DatasetKind::Recovered => &self.recovered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawRow {
        RawRow::from_pairs([
            (PROVINCE_STATE, ""),
            (COUNTRY_REGION, "France"),
            (LAT, "46.2"),
            (LONG, "oops"),
            ("1/22/20", "3"),
        ])
    }

    #[test]
    fn keys_keep_source_order() {
        let r = row();
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec![PROVINCE_STATE, COUNTRY_REGION, LAT, LONG, "1/22/20"]);
    }

    #[test]
    fn empty_province_marks_main_row() {
        let r = row();
        assert!(r.is_main_row());
        assert_eq!(r.country(), "France");
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn coordinates_fall_back_to_zero() {
        let r = row();
        assert_eq!(r.coordinate(LAT), 46.2);
        assert_eq!(r.coordinate(LONG), 0.0);
        assert_eq!(r.coordinate("absent"), 0.0);
    }

    #[test]
    fn counts_accept_blank_and_decimal_cells() {
        assert_eq!(parse_count("1/1/20", "").unwrap(), 0);
        assert_eq!(parse_count("1/1/20", " 42 ").unwrap(), 42);
        assert_eq!(parse_count("1/1/20", "12.0").unwrap(), 12);
        assert_eq!(parse_count("1/1/20", "-3").unwrap(), -3);
        let err = parse_count("1/1/20", "n/a").unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn counts_outside_i64_are_rejected() {
        assert!(parse_count("1/1/20", "1e30").unwrap_err().is_parse_failure());
        assert!(parse_count("1/1/20", "-1e30").unwrap_err().is_parse_failure());
        assert!(parse_count("1/1/20", "9223372036854775808").is_err());
        assert_eq!(parse_count("1/1/20", "9223372036854775807").unwrap(), i64::MAX);
        assert_eq!(parse_count("1/1/20", "1e3").unwrap(), 1000);
    }

    #[test]
    fn whitespace_province_is_a_sub_row() {
        let r = RawRow::from_pairs([(PROVINCE_STATE, " "), (COUNTRY_REGION, "Chile")]);
        assert!(!r.is_main_row());
        let r = RawRow::from_pairs([(COUNTRY_REGION, "Chile")]);
        assert!(r.is_main_row());
    }
}
