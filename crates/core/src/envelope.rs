//! Data envelopes that carry their own staleness deadline.
//!
//! The persisted layout of every cached record is the JSON form of [`WrappedData`]:
//! `{"data": ..., "staleAt": <ms since Unix epoch>}`.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value paired with the instant at which it becomes stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedData<T> {
    pub data: T,
    pub stale_at: i64,
}

impl<T> WrappedData<T> {
    /// Whether the data is still fresh at `now_ms`.
    pub fn is_fresh_at(&self, now_ms: i64) -> bool {
        self.stale_at > now_ms
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Wrap `data` so it goes stale `revalidate_ms` from now.
pub fn wrap<T>(data: T, revalidate_ms: u64) -> WrappedData<T> {
    wrap_at(data, revalidate_ms, now_ms())
}

/// Wrap `data` so it goes stale `revalidate_ms` after `now_ms`.
pub fn wrap_at<T>(data: T, revalidate_ms: u64, now_ms: i64) -> WrappedData<T> {
    let window = i64::try_from(revalidate_ms).unwrap_or(i64::MAX);
    WrappedData { data, stale_at: now_ms.saturating_add(window) }
}

/// Unwrap an envelope, returning `None` when it is absent or stale.
pub fn unwrap<T>(wrapped: Option<WrappedData<T>>) -> Option<T> {
    unwrap_at(wrapped, now_ms())
}

/// Unwrap an envelope as seen at `now_ms`.
pub fn unwrap_at<T>(wrapped: Option<WrappedData<T>>, now_ms: i64) -> Option<T> {
    wrapped
        .filter(|wrapped| wrapped.is_fresh_at(now_ms))
        .map(|wrapped| wrapped.data)
}

/// Decode a raw stored value into an envelope.
///
/// Returns `None` if the value is not an object with a `data` field of the expected type
/// and an integer `staleAt`. The `data` key must be present even when `T` would accept
/// its absence, such as an `Option`.
pub fn decode<T: DeserializeOwned>(raw: Value) -> Option<WrappedData<T>> {
    raw.get("data")?;
    serde_json::from_value(raw).ok()
}
