use chrono::{DateTime, Utc};

/// Timestamp with microsecond precision and a `Z` suffix
/// (e.g. `2025-09-20T20:21:35.414962Z`), used for trigger keys and alert JSON.
///
/// # Examples
///
/// ```
/// use caseiro_common::time::iso_micros;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2025, 9, 20, 20, 21, 35).unwrap();
/// assert_eq!(iso_micros(ts), "2025-09-20T20:21:35.000000Z");
/// ```
pub fn iso_micros(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// `yyyy/mm/dd` path segment for date-partitioned keys.
pub fn date_path(ts: DateTime<Utc>) -> String {
    ts.format("%Y/%m/%d").to_string()
}

/// Splits a timestamp into display `(YYYY-MM-DD, HH:MM:SS)`.
pub fn display_parts(ts: DateTime<Utc>) -> (String, String) {
    (
        ts.format("%Y-%m-%d").to_string(),
        ts.format("%H:%M:%S").to_string(),
    )
}
