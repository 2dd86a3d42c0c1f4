// crates/covid-core/src/dates.rs

//! Date-column detection and `M/D/YY` → ISO-8601 formatting.

use crate::error::{CovidError, Result};
use crate::raw::RawRow;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Any `digits/digits/digits` header is a date column.
static DATE_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+/\d+/\d+").expect("valid date column regex"));

/// Two-digit years below this pivot belong to the 2000s, the rest to the 1900s.
const CENTURY_PIVOT: u32 = 50;

#[inline]
pub fn is_date_column(name: &str) -> bool {
    DATE_COLUMN_RE.is_match(name)
}

/// Date columns of `row`, in the row's left-to-right order.
pub fn date_columns(row: &RawRow) -> Vec<&str> {
    row.keys().filter(|k| is_date_column(k)).collect()
}

/// Same as [`date_columns`] but over a bare header list.
pub fn date_headers(headers: &[String]) -> Vec<&str> {
    headers
        .iter()
        .map(String::as_str)
        .filter(|h| is_date_column(h))
        .collect()
}

/// Parses an `M/D/YY` header into a calendar date.
///
/// A four-digit year is taken literally; anything else goes through the
/// century pivot.
pub fn parse_date_column(col: &str) -> Result<NaiveDate> {
    let bad = || CovidError::DateParse(col.to_string());

    let mut parts = col.trim().split('/');
    let (Some(m), Some(d), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };

    let month: u32 = m.trim().parse().map_err(|_| bad())?;
    let day: u32 = d.trim().parse().map_err(|_| bad())?;
    let y = y.trim();
    let year_short: u32 = y.parse().map_err(|_| bad())?;
    let year = if y.len() > 2 {
        year_short as i32
    } else if year_short < CENTURY_PIVOT {
        2000 + year_short as i32
    } else {
        1900 + year_short as i32
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// `"1/22/20"` → `"2020-01-22"`.
pub fn format_date(col: &str) -> Result<String> {
    Ok(parse_date_column(col)?.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{COUNTRY_REGION, LAT, LONG, PROVINCE_STATE};

    #[test]
    fn detects_date_columns_in_order() {
        let row = RawRow::from_pairs([
            (PROVINCE_STATE, ""),
            (COUNTRY_REGION, "Italy"),
            (LAT, "43"),
            (LONG, "12"),
            ("1/22/20", "0"),
            ("1/23/20", "0"),
            ("12/1/20", "5"),
        ]);
        assert_eq!(date_columns(&row), vec!["1/22/20", "1/23/20", "12/1/20"]);
    }

    #[test]
    fn formats_with_padding_and_century_pivot() {
        assert_eq!(format_date("1/22/20").unwrap(), "2020-01-22");
        assert_eq!(format_date("12/3/49").unwrap(), "2049-12-03");
        assert_eq!(format_date("7/4/76").unwrap(), "1976-07-04");
        assert_eq!(format_date("3/9/2021").unwrap(), "2021-03-09");
    }

    #[test]
    fn malformed_dates_are_parse_failures() {
        for col in ["13/1/20", "2/30/20", "a/b/c", "1/2", "1/2/3/4"] {
            let err = format_date(col).unwrap_err();
            assert!(err.is_parse_failure(), "{col} should fail");
        }
    }
}
