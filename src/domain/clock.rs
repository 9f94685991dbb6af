use chrono::{DateTime, SecondsFormat, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats a timestamp the way stored records carry it, e.g. `2026-02-20T10:00:00.000Z`.
pub fn to_iso8601(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{parse_iso8601, to_iso8601};

    #[test]
    fn formats_with_millisecond_precision() {
        let timestamp = Utc
            .timestamp_millis_opt(1_700_000_000_123)
            .single()
            .expect("timestamp should be valid");
        assert_eq!(to_iso8601(timestamp), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn parses_offsets_into_utc() {
        let parsed = parse_iso8601("2026-02-20T12:00:00+02:00").expect("should parse");
        assert_eq!(to_iso8601(parsed), "2026-02-20T10:00:00.000Z");
        assert_eq!(parse_iso8601("yesterday"), None);
    }
}
