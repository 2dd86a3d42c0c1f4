// crates/covid-core/src/model.rs

//! # Output Model
//!
//! The shapes handed to collaborators. Everything here is built fresh per
//! query from the cached raw rows and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the three parallel source datasets a row collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Confirmed,
    Deaths,
    Recovered,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Confirmed,
        DatasetKind::Deaths,
        DatasetKind::Recovered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Confirmed => "confirmed",
            DatasetKind::Deaths => "deaths",
            DatasetKind::Recovered => "recovered",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(DatasetKind::Confirmed),
            "deaths" => Ok(DatasetKind::Deaths),
            "recovered" => Ok(DatasetKind::Recovered),
            other => Err(format!("unknown dataset `{other}`")),
        }
    }
}

/// One `(date, value)` sample of a long-format series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Cumulative count as reported. Not guaranteed monotonic.
    pub value: i64,
}

/// Chronological series, one point per date column of the source dataset.
pub type DailySeries = Vec<DailyPoint>;

/// The three series carried by an [`EntityStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeseries {
    pub confirmed: DailySeries,
    pub deaths: DailySeries,
    pub recovered: DailySeries,
}

impl Timeseries {
    pub fn get(&self, kind: DatasetKind) -> &DailySeries {
        match kind {
            DatasetKind::Confirmed => &self.confirmed,
            DatasetKind::Deaths => &self.deaths,
            DatasetKind::Recovered => &self.recovered,
        }
    }
}

/// Summary statistics plus time series for one country or for `Global`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStats {
    pub name: String,
    pub confirmed: i64,
    pub new_confirmed: i64,
    pub deaths: i64,
    pub new_deaths: i64,
    pub recovered: i64,
    pub new_recovered: i64,
    /// May be negative when the source data is inconsistent.
    pub active: i64,
    pub new_active: i64,
    pub timeseries: Timeseries,
}

impl EntityStats {
    /// Reads the field selected by `metric`.
    pub fn metric(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::NewConfirmed => self.new_confirmed,
            Metric::Deaths => self.deaths,
            Metric::NewDeaths => self.new_deaths,
            Metric::Recovered => self.recovered,
            Metric::NewRecovered => self.new_recovered,
            Metric::Active => self.active,
            Metric::NewActive => self.new_active,
        }
    }
}

/// One map marker: coordinates plus latest totals for a canonical country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStats {
    pub country: String,
    pub lat: f64,
    pub long: f64,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

/// Sort key for rankings; mirrors the numeric fields of [`EntityStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Confirmed,
    NewConfirmed,
    Deaths,
    NewDeaths,
    Recovered,
    NewRecovered,
    Active,
    NewActive,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::NewConfirmed => "newConfirmed",
            Metric::Deaths => "deaths",
            Metric::NewDeaths => "newDeaths",
            Metric::Recovered => "recovered",
            Metric::NewRecovered => "newRecovered",
            Metric::Active => "active",
            Metric::NewActive => "newActive",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the camelCase field names as well as snake/kebab case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "confirmed" => Ok(Metric::Confirmed),
            "newconfirmed" => Ok(Metric::NewConfirmed),
            "deaths" => Ok(Metric::Deaths),
            "newdeaths" => Ok(Metric::NewDeaths),
            "recovered" => Ok(Metric::Recovered),
            "newrecovered" => Ok(Metric::NewRecovered),
            "active" => Ok(Metric::Active),
            "newactive" => Ok(Metric::NewActive),
            _ => Err(format!("unknown metric `{s}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_stats_serializes_camel_case() {
        let stats = EntityStats {
            name: "France".into(),
            confirmed: 10,
            new_confirmed: 2,
            deaths: 1,
            new_deaths: 0,
            recovered: 3,
            new_recovered: 1,
            active: 6,
            new_active: 1,
            timeseries: Timeseries::default(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["newConfirmed"], 2);
        assert_eq!(json["newActive"], 1);
        assert!(json["timeseries"]["confirmed"].is_array());
    }

    #[test]
    fn metric_parses_loose_spellings() {
        assert_eq!("newConfirmed".parse::<Metric>(), Ok(Metric::NewConfirmed));
        assert_eq!("new_deaths".parse::<Metric>(), Ok(Metric::NewDeaths));
        assert_eq!("new-active".parse::<Metric>(), Ok(Metric::NewActive));
        assert!("population".parse::<Metric>().is_err());
    }

    #[test]
    fn dataset_kind_round_trips_through_display() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.to_string().parse::<DatasetKind>(), Ok(kind));
        }
    }
}
