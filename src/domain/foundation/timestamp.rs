//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// Engine code reads time through the `Clock` port instead.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Adds minutes, returning `None` if the result is not representable.
    pub fn checked_plus_minutes(&self, minutes: i64) -> Option<Self> {
        Duration::try_minutes(minutes)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Adds seconds, returning `None` if the result is not representable.
    pub fn checked_plus_secs(&self, secs: i64) -> Option<Self> {
        Duration::try_seconds(secs)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Creates a new timestamp by adding the specified number of minutes.
    ///
    /// Negative values subtract minutes. Saturates at the representable range.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.checked_plus_minutes(minutes)
            .unwrap_or_else(|| Self::saturated(minutes))
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    ///
    /// Saturates at the representable range.
    pub fn plus_secs(&self, secs: i64) -> Self {
        self.checked_plus_secs(secs)
            .unwrap_or_else(|| Self::saturated(secs))
    }

    fn saturated(direction: i64) -> Self {
        if direction < 0 {
            Self(DateTime::<Utc>::MIN_UTC)
        } else {
            Self(DateTime::<Utc>::MAX_UTC)
        }
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` for values chrono cannot represent.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
