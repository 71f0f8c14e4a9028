use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::state::series::IndexKey;

impl IndexKey for NaiveDateTime {
    fn to_axis(&self) -> f64 {
        // Preserve subsecond precision via milliseconds
        self.and_utc().timestamp_millis() as f64 / 1000.0
    }

    fn is_datetime() -> bool {
        true
    }
}

impl IndexKey for DateTime<Utc> {
    fn to_axis(&self) -> f64 {
        self.timestamp_millis() as f64 / 1000.0
    }

    fn is_datetime() -> bool {
        true
    }
}

impl IndexKey for NaiveDate {
    fn to_axis(&self) -> f64 {
        self.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp() as f64)
            .unwrap_or(f64::NAN)
    }

    fn is_datetime() -> bool {
        true
    }
}

/// Format a Unix timestamp as a human-readable datetime string.
/// Shows milliseconds when the timestamp has a fractional component.
pub fn format_timestamp(ts: f64) -> String {
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1_000_000_000.0) as u32;
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(dt) => {
            if nanos == 0 {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
            }
        }
        None => format!("{ts:.3}"),
    }
}

/// Short tick label for a timestamp, picking the precision from the span
/// of the visible axis range (seconds).
pub fn format_axis_tick(ts: f64, span: f64) -> String {
    let secs = ts.floor() as i64;
    let Some(dt) = DateTime::<Utc>::from_timestamp(secs, 0) else {
        return format!("{ts:.0}");
    };
    let fmt = if span > 2.0 * 365.0 * 86_400.0 {
        "%Y"
    } else if span > 60.0 * 86_400.0 {
        "%Y-%m"
    } else if span > 2.0 * 86_400.0 {
        "%m-%d"
    } else if span > 3_600.0 {
        "%d %H:%M"
    } else {
        "%H:%M:%S"
    };
    dt.format(fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_date_maps_to_midnight_utc() {
        let d = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(d.to_axis(), 86_400.0);
        assert!(NaiveDate::is_datetime());
    }

    #[test]
    fn datetime_keeps_milliseconds() {
        let dt = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_milli_opt(0, 0, 1, 500)
            .unwrap();
        assert_eq!(dt.to_axis(), 1.5);
    }

    #[test]
    fn format_timestamp_whole_seconds() {
        assert_eq!(format_timestamp(0.0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1.25), "1970-01-01 00:00:01.250");
    }

    #[test]
    fn tick_precision_follows_span() {
        assert_eq!(format_axis_tick(0.0, 10.0 * 365.0 * 86_400.0), "1970");
        assert_eq!(format_axis_tick(86_400.0 * 31.0, 30.0 * 86_400.0), "02-01");
        assert_eq!(format_axis_tick(90.0, 120.0), "00:01:30");
    }
}
