// crates/covid-core/src/markers.rs

//! Map markers: one coordinate + latest totals record per country.

use crate::aggregate::CountryGroups;
use crate::alias::Normalizer;
use crate::dates::date_columns;
use crate::error::{CovidError, Result};
use crate::model::MarkerStats;
use crate::raw::{Dataset, Datasets, RawRow, LAT, LONG};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Countries whose source coordinates point at an overseas territory or
/// are otherwise off: pinned to the mainland centroid.
pub const DEFAULT_COORDINATES: &[(&str, f64, f64)] = &[
    ("France", 46.603354, 1.888334),
    ("United Kingdom", 54.7023545, -3.2765753),
    ("Netherlands", 52.132633, 5.291266),
];

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// Fixed coordinates that win over anything found in the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateOverrides {
    entries: HashMap<String, Coordinates>,
}

impl CoordinateOverrides {
    pub fn builtin() -> Self {
        DEFAULT_COORDINATES
            .iter()
            .map(|&(name, lat, long)| (name.to_string(), Coordinates { lat, long }))
            .collect()
    }

    /// Loads `{ "France": { "lat": 46.6, "long": 1.9 }, ... }`.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let entries: HashMap<String, Coordinates> = serde_json::from_reader(reader)?;
        Ok(CoordinateOverrides { entries })
    }

    pub fn get(&self, country: &str) -> Option<Coordinates> {
        self.entries.get(country).copied()
    }
}

impl FromIterator<(String, Coordinates)> for CoordinateOverrides {
    fn from_iter<I: IntoIterator<Item = (String, Coordinates)>>(iter: I) -> Self {
        CoordinateOverrides {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Value at the row's own last date column (0 when it has none).
fn last_value(row: &RawRow) -> Result<i64> {
    match date_columns(row).last() {
        Some(col) => row.count(col),
        None => Ok(0),
    }
}

fn add_count(total: i64, value: i64, country: &str) -> Result<i64> {
    total
        .checked_add(value)
        .ok_or_else(|| CovidError::overflow(format!("marker total for {country}")))
}

fn marker_for_group(
    country: &str,
    rows: &[&RawRow],
    overrides: &CoordinateOverrides,
) -> Result<MarkerStats> {
    let fixed = overrides.get(country);

    let (lat, long, confirmed) = match rows.iter().find(|r| r.is_main_row()) {
        Some(main) => (main.coordinate(LAT), main.coordinate(LONG), last_value(main)?),
        None => {
            let mut lat_sum = 0.0;
            let mut long_sum = 0.0;
            let mut confirmed = 0;
            for row in rows {
                confirmed = add_count(confirmed, last_value(row)?, country)?;
                lat_sum += row.coordinate(LAT);
                long_sum += row.coordinate(LONG);
            }
            let count = rows.len() as f64;
            let avg = |sum: f64| if rows.is_empty() { 0.0 } else { sum / count };
            (avg(lat_sum), avg(long_sum), confirmed)
        }
    };

    Ok(MarkerStats {
        country: country.to_string(),
        lat: fixed.map_or(lat, |c| c.lat),
        long: fixed.map_or(long, |c| c.long),
        confirmed,
        deaths: 0,
        recovered: 0,
    })
}

/// Adds each row's last value to the marker of its country, if one exists.
fn add_latest(
    markers: &mut [MarkerStats],
    index: &HashMap<String, usize>,
    dataset: &Dataset,
    normalizer: &Normalizer,
    field: fn(&mut MarkerStats) -> &mut i64,
) -> Result<()> {
    for row in &dataset.rows {
        if let Some(&i) = index.get(normalizer.normalize(row.country())) {
            let marker = &mut markers[i];
            let total = add_count(*field(marker), last_value(row)?, &marker.country)?;
            *field(marker) = total;
        }
    }
    Ok(())
}

/// One [`MarkerStats`] per canonical country of the confirmed dataset.
///
/// Coordinates: override, else the main row, else the mean over the group.
/// Confirmed: the main row's last value, else the sum of every row's own
/// last value. Deaths and recovered are summed from their datasets but only
/// for countries already present in confirmed; the rest are dropped.
pub fn build_markers(
    data: &Datasets,
    normalizer: &Normalizer,
    overrides: &CoordinateOverrides,
) -> Result<Vec<MarkerStats>> {
    let groups = CountryGroups::build(&data.confirmed.rows, normalizer);

    let mut markers = groups
        .iter()
        .map(|(country, rows)| marker_for_group(country, rows, overrides))
        .collect::<Result<Vec<_>>>()?;
    let index: HashMap<String, usize> = markers
        .iter()
        .enumerate()
        .map(|(i, m)| (m.country.clone(), i))
        .collect();

    add_latest(&mut markers, &index, &data.deaths, normalizer, |m| &mut m.deaths)?;
    add_latest(&mut markers, &index, &data.recovered, normalizer, |m| &mut m.recovered)?;

    tracing::debug!(markers = markers.len(), "built map markers");
    Ok(markers)
}
