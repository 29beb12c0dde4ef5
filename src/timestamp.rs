// Integers in torrent files are often Unix times ("creation date"). The viewer
// offers a UTC rendering for any integer in the signed 32-bit positive range.

use chrono::DateTime;

const MAX_TIMESTAMP: i64 = i32::MAX as i64;

/// `YYYY-MM-DDTHH:MM:SS` for `secs` seconds after the Unix epoch, or `None`
/// when `secs` is outside `0..=2147483647`.
pub fn utc_iso8601(secs: i64) -> Option<String> {
    if !(0..=MAX_TIMESTAMP).contains(&secs) {
        return None;
    }
    DateTime::from_timestamp(secs, 0).map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
}
