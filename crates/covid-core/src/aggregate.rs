// crates/covid-core/src/aggregate.rs

//! # Aggregation
//!
//! Collapses wide-format rows into one daily series: per canonical country
//! ([`aggregate_by_country`]) or across the whole dataset
//! ([`aggregate_global`]). Both share [`aggregate_rows`], a column-wise sum
//! followed by the latest/delta/timeseries reduction.

use crate::alias::Normalizer;
use crate::dates::{format_date, is_date_column};
use crate::error::{CovidError, Result};
use crate::model::{DailyPoint, DailySeries};
use crate::raw::{Dataset, RawRow};
use serde::Serialize;
use std::collections::HashMap;

/// Intermediate result for one dataset kind and one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Total at the last date column.
    pub latest: i64,
    /// `latest` minus the total at the second-to-last date column.
    pub new_cases: i64,
    pub timeseries: DailySeries,
}

/// Rows grouped by canonical country name, in order of first appearance.
#[derive(Debug, Default)]
pub struct CountryGroups<'a> {
    groups: Vec<(String, Vec<&'a RawRow>)>,
}

impl<'a> CountryGroups<'a> {
    /// Groups `rows` by `normalize(row["Country/Region"])`.
    pub fn build(rows: impl IntoIterator<Item = &'a RawRow>, normalizer: &Normalizer) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<&'a RawRow>)> = Vec::new();
        for row in rows {
            let name = normalizer.normalize(row.country());
            match index.get(name) {
                Some(&i) => groups[i].1.push(row),
                None => {
                    index.insert(name.to_string(), groups.len());
                    groups.push((name.to_string(), vec![row]));
                }
            }
        }
        CountryGroups { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[&'a RawRow]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a RawRow])> {
        self.groups.iter().map(|(n, r)| (n.as_str(), r.as_slice()))
    }
}

/// Sums `rows` column-wise over the date columns of the first row.
///
/// An empty input yields [`Aggregate::default`] (0, 0, no points). With a
/// single date column `new_cases` is 0.
pub fn aggregate_rows<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> Result<Aggregate> {
    let mut rows = rows.into_iter().peekable();
    let Some(first) = rows.peek() else {
        return Ok(Aggregate::default());
    };

    let columns: Vec<(usize, String)> = first
        .keys()
        .enumerate()
        .filter(|(_, k)| is_date_column(k))
        .map(|(i, k)| (i, k.to_string()))
        .collect();

    let mut totals = vec![0i64; columns.len()];
    for row in rows {
        for (slot, (idx, col)) in totals.iter_mut().zip(&columns) {
            let value = row.count_at(*idx, col)?;
            *slot = slot
                .checked_add(value)
                .ok_or_else(|| CovidError::overflow(format!("total for {col}")))?;
        }
    }

    finish(&columns, totals)
}

fn finish(columns: &[(usize, String)], totals: Vec<i64>) -> Result<Aggregate> {
    let timeseries = columns
        .iter()
        .zip(&totals)
        .map(|((_, col), value)| {
            Ok(DailyPoint {
                date: format_date(col)?,
                value: *value,
            })
        })
        .collect::<Result<DailySeries>>()?;

    let latest = totals.last().copied().unwrap_or(0);
    let previous = match totals.len() {
        n if n >= 2 => totals[n - 2],
        _ => latest,
    };

    let new_cases = latest
        .checked_sub(previous)
        .ok_or_else(|| CovidError::overflow("daily delta"))?;

    Ok(Aggregate {
        latest,
        new_cases,
        timeseries,
    })
}

/// Every row of the dataset, ungrouped: the `Global` pseudo-entity.
pub fn aggregate_global(dataset: &Dataset) -> Result<Aggregate> {
    aggregate_rows(&dataset.rows)
}

/// One [`Aggregate`] per canonical country, in order of first appearance.
///
/// With `filter` set, only the group whose canonical name equals it is
/// aggregated (the result then holds at most one entry).
pub fn aggregate_by_country(
    dataset: &Dataset,
    normalizer: &Normalizer,
    filter: Option<&str>,
) -> Result<Vec<(String, Aggregate)>> {
    let groups = CountryGroups::build(&dataset.rows, normalizer);
    groups
        .iter()
        .filter(|(name, _)| filter.map_or(true, |f| f == *name))
        .map(|(name, rows)| Ok((name.to_string(), aggregate_rows(rows.iter().copied())?)))
        .collect()
}

/// Rows of `dataset` whose normalized country equals `canonical`.
pub fn rows_for_country<'a>(
    dataset: &'a Dataset,
    normalizer: &'a Normalizer,
    canonical: &'a str,
) -> impl Iterator<Item = &'a RawRow> + 'a {
    dataset
        .rows
        .iter()
        .filter(move |row| normalizer.normalize(row.country()) == canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatasetKind;

    fn dataset(rows: &[(&str, &str, &[&str])], dates: &[&str]) -> Dataset {
        let mut headers: Vec<String> = ["Province/State", "Country/Region", "Lat", "Long"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        headers.extend(dates.iter().map(|d| d.to_string()));
        let mut ds = Dataset::new(DatasetKind::Confirmed, headers);
        for (province, country, values) in rows {
            let mut v = vec![province.to_string(), country.to_string(), "0".into(), "0".into()];
            v.extend(values.iter().map(|s| s.to_string()));
            ds.push_values(v);
        }
        ds
    }

    #[test]
    fn sub_rows_sum_per_date() {
        let ds = dataset(
            &[
                ("Hubei", "Mainland China", &["10", "15", "30"]),
                ("Beijing", "China", &["1", "2", "3"]),
                ("", "Italy", &["0", "1", "4"]),
            ],
            &["1/22/20", "1/23/20", "1/24/20"],
        );
        let n = Normalizer::default();
        let out = aggregate_by_country(&ds, &n, None).unwrap();

        assert_eq!(out.len(), 2);
        let (name, china) = &out[0];
        assert_eq!(name, "China");
        let values: Vec<i64> = china.timeseries.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![11, 17, 33]);
        assert_eq!(china.latest, 33);
        assert_eq!(china.new_cases, 16);
        assert_eq!(china.timeseries[0].date, "2020-01-22");
    }

    #[test]
    fn single_date_column_has_no_new_cases() {
        let ds = dataset(&[("", "Chile", &["9"])], &["3/1/20"]);
        let agg = aggregate_global(&ds).unwrap();
        assert_eq!(agg.latest, 9);
        assert_eq!(agg.new_cases, 0);
        assert_eq!(agg.timeseries.len(), 1);
    }

    #[test]
    fn decreasing_series_are_passed_through() {
        let ds = dataset(&[("", "Spain", &["50", "40"])], &["4/1/20", "4/2/20"]);
        let agg = aggregate_global(&ds).unwrap();
        assert_eq!(agg.new_cases, -10);
    }

    #[test]
    fn no_rows_give_default() {
        let ds = dataset(&[], &["3/1/20"]);
        assert_eq!(aggregate_global(&ds).unwrap(), Aggregate::default());
    }

    #[test]
    fn filter_keeps_one_canonical_group() {
        let ds = dataset(
            &[("", "US", &["1", "2"]), ("", "Canada", &["5", "6"])],
            &["3/1/20", "3/2/20"],
        );
        let n = Normalizer::default();
        let out = aggregate_by_country(&ds, &n, Some("United States")).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "United States");
        assert_eq!(out[0].1.latest, 2);
        assert!(aggregate_by_country(&ds, &n, Some("US")).unwrap().is_empty());
    }

    #[test]
    fn global_sums_every_row() {
        let ds = dataset(
            &[("", "A", &["10", "20"]), ("", "B", &["5", "15"])],
            &["3/1/20", "3/2/20"],
        );
        let agg = aggregate_global(&ds).unwrap();
        let values: Vec<i64> = agg.timeseries.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![15, 35]);
        assert_eq!(agg.latest, 35);
        assert_eq!(agg.new_cases, 20);
    }

    #[test]
    fn bad_count_propagates() {
        let ds = dataset(&[("", "Peru", &["x"])], &["3/1/20"]);
        assert!(aggregate_global(&ds).unwrap_err().is_parse_failure());
    }

    #[test]
    fn sums_past_i64_fail_instead_of_wrapping() {
        let max = i64::MAX.to_string();
        let ds = dataset(
            &[("", "A", &["1", max.as_str()]), ("", "B", &["1", "1"])],
            &["3/1/20", "3/2/20"],
        );
        let err = aggregate_global(&ds).unwrap_err();
        assert!(matches!(err, CovidError::CountOverflow(_)));

        let min = i64::MIN.to_string();
        let ds = dataset(&[("", "A", &["1", min.as_str()])], &["3/1/20", "3/2/20"]);
        assert!(aggregate_global(&ds).unwrap_err().is_parse_failure());
    }
}
