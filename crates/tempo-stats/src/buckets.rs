use chrono::{DateTime, Datelike, Utc};

/// Calendar-day bucket key, `"YYYY-MM-DD"`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempo_stats::day_key;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 7, 22, 15, 0).unwrap();
/// assert_eq!(day_key(ts), "2024-03-07");
/// ```
#[must_use]
pub fn day_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// ISO 8601 week bucket key, `"YYYY-Www"`.
///
/// Uses the ISO week-based year, so dates near January 1 can key into the
/// neighboring year's week numbering.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempo_stats::week_key;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
/// assert_eq!(week_key(ts), "2024-W10");
///
/// let new_year = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(week_key(new_year), "2020-W53");
/// ```
#[must_use]
pub fn week_key(ts: DateTime<Utc>) -> String {
    let week = ts.date_naive().iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Calendar-month bucket key, `"YYYY-MM"`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempo_stats::month_key;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
/// assert_eq!(month_key(ts), "2024-03");
/// ```
#[must_use]
pub fn month_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m").to_string()
}

/// Calendar-year bucket key, `"YYYY"`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempo_stats::year_key;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
/// assert_eq!(year_key(ts), "2024");
/// ```
#[must_use]
pub fn year_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn day_key_zero_pads() {
        assert_eq!(day_key(ts(2024, 1, 5)), "2024-01-05");
        assert_eq!(day_key(ts(2024, 11, 25)), "2024-11-25");
    }

    #[test]
    fn week_key_zero_pads_week_number() {
        assert_eq!(week_key(ts(2024, 1, 8)), "2024-W02");
        assert_eq!(week_key(ts(2024, 6, 12)), "2024-W24");
    }

    #[test]
    fn week_key_uses_iso_year_at_boundaries() {
        // Dec 30 2024 is a Monday and opens week 1 of ISO year 2025.
        assert_eq!(week_key(ts(2024, 12, 30)), "2025-W01");
        // Jan 1 2021 is a Friday inside week 53 of ISO year 2020.
        assert_eq!(week_key(ts(2021, 1, 1)), "2020-W53");
    }

    #[test]
    fn month_and_year_keys() {
        assert_eq!(month_key(ts(2024, 2, 29)), "2024-02");
        assert_eq!(year_key(ts(1999, 12, 31)), "1999");
    }
}
