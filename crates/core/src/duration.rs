//! Human-readable duration parsing.
//!
//! Accepts a number followed by an optional unit: `"10s"`, `"10 s"`, `"2m"`, `"1.5 hours"`,
//! `"7 Days"`. Units are case-insensitive and a bare number is read as milliseconds.
//! Only a single number/unit pair is accepted.

use std::sync::LazyLock;

use regex::Regex;

const MAX_INPUT_LEN: usize = 100;

const SECOND: f64 = 1000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(-?(?:[0-9]+)?\.?[0-9]+) *(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$",
    )
    .unwrap()
});

/// Errors from [`parse`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("duration is empty")]
    Empty,

    #[error("duration exceeds 100 characters")]
    TooLong,

    #[error("unrecognized duration: {0:?}")]
    Invalid(String),
}

/// Parse a duration string into milliseconds.
///
/// The result keeps any fractional part and sign of the input (`"1.5ms"` is `1.5`,
/// `"-1s"` is `-1000.0`); callers decide which values they accept.
///
/// # Errors
///
/// Returns `ParseDurationError` if the text is blank, longer than 100 characters, or not a
/// number with a recognized unit.
pub fn parse(text: &str) -> Result<f64, ParseDurationError> {
    if text.trim().is_empty() {
        return Err(ParseDurationError::Empty);
    }
    if text.len() > MAX_INPUT_LEN {
        return Err(ParseDurationError::TooLong);
    }

    let invalid = || ParseDurationError::Invalid(text.to_string());
    let caps = DURATION_RE.captures(text).ok_or_else(invalid)?;
    let value: f64 = caps[1].parse().map_err(|_| invalid())?;
    let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());

    let multiplier = match unit.as_deref() {
        Some("years" | "year" | "yrs" | "yr" | "y") => YEAR,
        Some("weeks" | "week" | "w") => WEEK,
        Some("days" | "day" | "d") => DAY,
        Some("hours" | "hour" | "hrs" | "hr" | "h") => HOUR,
        Some("minutes" | "minute" | "mins" | "min" | "m") => MINUTE,
        Some("seconds" | "second" | "secs" | "sec" | "s") => SECOND,
        Some("milliseconds" | "millisecond" | "msecs" | "msec" | "ms") | None => 1.0,
        Some(_) => return Err(invalid()),
    };

    Ok(value * multiplier)
}
