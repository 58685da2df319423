use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch; a missing timestamp counts as the epoch itself.
pub fn millis_or_epoch(dt: Option<DateTime<Utc>>) -> i64 {
    dt.map(|value| value.timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_timestamp_is_epoch() {
        assert_eq!(millis_or_epoch(None), 0);
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(millis_or_epoch(Some(dt)), dt.timestamp_millis());
    }
}
