//! Time utilities for serializing timestamps.
use chrono::{DateTime, Local};
use serde::{self, Deserialize, Deserializer, Serializer};
use std::time::SystemTime;

/// Serializes a `SystemTime` to an RFC 3339 string.
pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let datetime: DateTime<Local> = (*time).into();
    serializer.serialize_str(&datetime.to_rfc3339())
}

/// Deserializes an RFC 3339 string to a `SystemTime`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(SystemTime::from)
        .map_err(serde::de::Error::custom)
}

/// Milliseconds elapsed since `start`, saturating at `u64::MAX`.
pub fn elapsed_ms(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
