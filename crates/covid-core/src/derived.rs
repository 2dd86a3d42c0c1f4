// crates/covid-core/src/derived.rs

//! Metrics computed from aggregates rather than read from the source.

use crate::aggregate::Aggregate;
use crate::error::{CovidError, Result};
use crate::model::{DailySeries, EntityStats, Timeseries};
use serde::Serialize;
use std::collections::HashMap;

/// Active cases, latest value and day-over-day delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Active {
    pub latest: i64,
    pub new_cases: i64,
}

/// `confirmed − (deaths + recovered)` for both latest and delta.
///
/// No floor at zero: inconsistent source data shows up as a negative value.
/// Fails with [`CovidError::CountOverflow`] when the result leaves `i64`.
pub fn active(confirmed: &Aggregate, deaths: &Aggregate, recovered: &Aggregate) -> Result<Active> {
    let diff = |c: i64, d: i64, r: i64| {
        d.checked_add(r)
            .and_then(|closed| c.checked_sub(closed))
            .ok_or_else(|| CovidError::overflow("active cases"))
    };
    Ok(Active {
        latest: diff(confirmed.latest, deaths.latest, recovered.latest)?,
        new_cases: diff(confirmed.new_cases, deaths.new_cases, recovered.new_cases)?,
    })
}

/// Assembles the response object for one entity.
pub fn entity_stats(
    name: impl Into<String>,
    confirmed: Aggregate,
    deaths: Aggregate,
    recovered: Aggregate,
) -> Result<EntityStats> {
    let active = active(&confirmed, &deaths, &recovered)?;
    Ok(EntityStats {
        name: name.into(),
        confirmed: confirmed.latest,
        new_confirmed: confirmed.new_cases,
        deaths: deaths.latest,
        new_deaths: deaths.new_cases,
        recovered: recovered.latest,
        new_recovered: recovered.new_cases,
        active: active.latest,
        new_active: active.new_cases,
        timeseries: Timeseries {
            confirmed: confirmed.timeseries,
            deaths: deaths.timeseries,
            recovered: recovered.timeseries,
        },
    })
}

/// Percentage change from `previous` to `current`; `0.0` when there is no base.
pub fn change_percentage(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// [`change_percentage`] rendered with an explicit sign and one decimal.
pub fn format_change_percentage(current: i64, previous: i64) -> String {
    let pct = change_percentage(current, previous);
    let sign = if pct >= 0.0 { "+" } else { "" };
    format!("{sign}{pct:.1}%")
}

/// One date with all three series side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedPoint {
    pub date: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

/// Zips the three series by date for a combined chart.
///
/// Dates appear in first-seen order (confirmed, then deaths, then
/// recovered); a series without a point for some date contributes 0.
pub fn merge_timeseries(ts: &Timeseries) -> Vec<MergedPoint> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<MergedPoint> = Vec::new();

    let series: [(&DailySeries, fn(&mut MergedPoint, i64)); 3] = [
        (&ts.confirmed, |m, v| m.confirmed = v),
        (&ts.deaths, |m, v| m.deaths = v),
        (&ts.recovered, |m, v| m.recovered = v),
    ];

    for (points, set) in series {
        for p in points {
            let i = *index.entry(p.date.as_str()).or_insert_with(|| {
                out.push(MergedPoint {
                    date: p.date.clone(),
                    ..Default::default()
                });
                out.len() - 1
            });
            set(&mut out[i], p.value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DailyPoint;

    fn agg(latest: i64, new_cases: i64) -> Aggregate {
        Aggregate {
            latest,
            new_cases,
            timeseries: Vec::new(),
        }
    }

    fn pt(date: &str, value: i64) -> DailyPoint {
        DailyPoint {
            date: date.into(),
            value,
        }
    }

    #[test]
    fn active_is_confirmed_minus_closed_cases() {
        let a = active(&agg(100, 10), &agg(5, 1), &agg(20, 4)).unwrap();
        assert_eq!(a, Active { latest: 75, new_cases: 5 });
    }

    #[test]
    fn active_is_not_clamped() {
        let a = active(&agg(10, 0), &agg(8, 2), &agg(7, 3)).unwrap();
        assert_eq!(a.latest, -5);
        assert_eq!(a.new_cases, -5);
    }

    #[test]
    fn entity_stats_carries_all_fields() {
        let s = entity_stats("Peru", agg(30, 3), agg(2, 1), agg(8, 0)).unwrap();
        assert_eq!(s.name, "Peru");
        assert_eq!((s.confirmed, s.new_confirmed), (30, 3));
        assert_eq!((s.active, s.new_active), (20, 2));
    }

    #[test]
    fn active_overflow_is_an_error() {
        let err = active(&agg(i64::MIN, 0), &agg(1, 0), &agg(0, 0)).unwrap_err();
        assert!(matches!(err, CovidError::CountOverflow(_)));
        let err = active(&agg(0, 0), &agg(i64::MAX, 0), &agg(1, 0)).unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn change_percentage_handles_extremes() {
        let pct = change_percentage(i64::MAX, -1);
        assert!(pct.is_finite() && pct < 0.0);
        assert!(change_percentage(i64::MIN, i64::MAX) < -199.0);
    }

    #[test]
    fn change_percentage_handles_zero_base() {
        assert_eq!(change_percentage(150, 100), 50.0);
        assert_eq!(change_percentage(5, 0), 0.0);
        assert_eq!(format_change_percentage(150, 100), "+50.0%");
        assert_eq!(format_change_percentage(90, 100), "-10.0%");
        assert_eq!(format_change_percentage(1, 0), "+0.0%");
    }

    #[test]
    fn merge_fills_missing_with_zero() {
        let ts = Timeseries {
            confirmed: vec![pt("2020-03-01", 5), pt("2020-03-02", 8)],
            deaths: vec![pt("2020-03-02", 1)],
            recovered: vec![pt("2020-03-03", 2)],
        };
        let merged = merge_timeseries(&ts);
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged[1],
            MergedPoint {
                date: "2020-03-02".into(),
                confirmed: 8,
                deaths: 1,
                recovered: 0
            }
        );
        assert_eq!(merged[2].date, "2020-03-03");
        assert_eq!(merged[2].confirmed, 0);
        assert_eq!(merged[2].recovered, 2);
    }
}
