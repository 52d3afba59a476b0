//! Freshness window resolution.

use std::fmt;
use std::time::Duration;

use crate::{Error, duration};

/// Freshness window applied when a query does not specify one.
pub const DEFAULT_REVALIDATE: &str = "1 day";

/// How long fetched data stays fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidate {
    /// A millisecond count. Only positive counts are valid.
    Millis(i64),
    /// A duration string such as `"10s"` or `"2 days"`.
    Text(String),
}

impl fmt::Display for Revalidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revalidate::Millis(ms) => write!(f, "{ms}"),
            Revalidate::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Revalidate {
    fn from(ms: i64) -> Self {
        Revalidate::Millis(ms)
    }
}

impl From<&str> for Revalidate {
    fn from(text: &str) -> Self {
        Revalidate::Text(text.to_string())
    }
}

impl From<String> for Revalidate {
    fn from(text: String) -> Self {
        Revalidate::Text(text)
    }
}

impl From<Duration> for Revalidate {
    fn from(duration: Duration) -> Self {
        Revalidate::Millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Resolve a freshness window to a positive number of milliseconds.
///
/// `None` resolves [`DEFAULT_REVALIDATE`]. Parsed durations are rounded to the nearest
/// millisecond.
///
/// # Errors
///
/// Returns `Error::InvalidRevalidateValue` if the value is zero, negative, or a string that
/// does not parse as a duration.
pub fn resolve(revalidate: Option<&Revalidate>) -> Result<u64, Error> {
    let default = Revalidate::Text(DEFAULT_REVALIDATE.to_string());
    let revalidate = revalidate.unwrap_or(&default);

    let resolved = match revalidate {
        Revalidate::Millis(ms) => u64::try_from(*ms).ok().filter(|ms| *ms > 0),
        Revalidate::Text(text) => duration::parse(text)
            .ok()
            .map(f64::round)
            .filter(|ms| ms.is_finite() && *ms >= 1.0)
            .map(|ms| ms as u64),
    };

    resolved.ok_or_else(|| Error::InvalidRevalidateValue(revalidate.to_string()))
}
