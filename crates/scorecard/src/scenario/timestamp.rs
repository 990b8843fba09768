//! Timestamp parsing for scenario documents. Documents written by older tooling
//! carry offset-less ISO timestamps; those are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub(crate) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("failed to parse '{raw}' as an ISO-8601 timestamp ({err})"))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::parse;
    use chrono::{TimeZone, Utc};

    #[test]
    fn accepts_rfc3339_and_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(parse("2025-03-14T09:30:00Z").unwrap(), expected);
        assert_eq!(parse("2025-03-14T10:30:00+01:00").unwrap(), expected);
        assert_eq!(parse("2025-03-14T09:30:00").unwrap(), expected);
        assert!(parse("14/03/2025").is_err());
    }
}
