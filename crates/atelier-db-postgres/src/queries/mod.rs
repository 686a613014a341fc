//! SQL query implementations.
//!
//! Every query takes a generic executor so the same statement runs against
//! the pool or inside an open transaction.

pub mod items;
pub mod settings;

use chrono::{DateTime, Utc};
use time::OffsetDateTime;

/// Converts chrono DateTime to time OffsetDateTime.
pub(crate) fn chrono_to_time(dt: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(dt.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH)
        + time::Duration::nanoseconds(i64::from(dt.timestamp_subsec_nanos()))
}

/// Converts time OffsetDateTime to chrono DateTime.
pub(crate) fn time_to_chrono(dt: OffsetDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_timestamp_conversion_keeps_nanos() {
        let original = datetime!(2025-03-14 09:26:53.589793 UTC);
        assert_eq!(chrono_to_time(time_to_chrono(original)), original);
    }
}
