//! Lenient timestamp resolution for API date strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Resolve an API date string to a point in time.
///
/// Accepts RFC 3339 (`2024-03-05T10:00:00Z`, `...+02:00`), naive date-times
/// with a `T` or space separator (read as UTC) and bare `YYYY-MM-DD`
/// (midnight UTC). Anything else resolves to `None`.
pub fn resolve_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde helpers for `#[serde(deserialize_with = "de::...")]` on API records.
///
/// A wrongly typed value in one record degrades to the field's empty value
/// instead of failing the whole snapshot.
pub mod de {
    use chrono::{DateTime, SecondsFormat};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// String kept verbatim, number read as epoch milliseconds, anything
    /// else `None`.
    pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            _ => None,
        })
    }

    /// Number, or a string holding one. Anything else is `0.0`.
    pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(amount.filter(|a| a.is_finite()).unwrap_or(0.0))
    }

    /// Open status enum from a string; `null` or a non-string is the default.
    pub fn lenient_status<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String> + Default,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => T::from(s),
            _ => T::default(),
        })
    }
}
