//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! This module provides the [`Timestamp`] type for representing points in time
//! on records that travel through the platform API (creation, updates, audit
//! log entries).
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(60);
//!
//! assert!(later.is_after(&now));
//! ```

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>` with the operations the negotiation records
/// need. The platform API exchanges timestamps as ISO 8601 strings, which is
/// exactly what the transparent serde representation produces.
///
/// # Invariants
///
/// - Always in UTC timezone
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::timestamp::Timestamp;
///
/// let ts = Timestamp::from_secs(1704067200).unwrap();
/// assert_eq!(ts.to_iso8601(), "2024-01-01T00:00:00+00:00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// # Returns
    ///
    /// `Some(Timestamp)` if the value is valid, `None` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1704067200).unwrap();
    /// assert_eq!(ts.timestamp_secs(), 1704067200);
    /// ```
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// # Returns
    ///
    /// `Some(Timestamp)` if the value is valid, `None` otherwise.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Adds seconds to the timestamp.
    ///
    /// # Arguments
    ///
    /// * `secs` - Number of seconds to add (can be negative)
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns the calendar date (UTC) of this timestamp.
    ///
    /// Entity identifiers embed the creation date in `yyyymmdd` form, which
    /// is derived through this method.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1704067200).unwrap();
    /// assert_eq!(ts.date().to_string(), "2024-01-01");
    /// ```
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Formats the timestamp as ISO 8601.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn now_creates_current_time() {
            let before = Utc::now();
            let ts = Timestamp::now();
            let after = Utc::now();

            assert!(ts.0 >= before);
            assert!(ts.0 <= after);
        }

        #[test]
        fn from_secs_works() {
            let ts = Timestamp::from_secs(1704067200).unwrap();
            assert_eq!(ts.timestamp_secs(), 1704067200);
        }

        #[test]
        fn from_millis_works() {
            let ts = Timestamp::from_millis(1704067200000).unwrap();
            assert_eq!(ts.timestamp_secs(), 1704067200);
        }

        #[test]
        fn default_is_now() {
            let before = Utc::now();
            let ts = Timestamp::default();
            let after = Utc::now();

            assert!(ts.0 >= before);
            assert!(ts.0 <= after);
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn add_secs_works() {
            let ts = Timestamp::from_secs(1000).unwrap();
            let later = ts.add_secs(60);
            assert_eq!(later.timestamp_secs(), 1060);
        }

        #[test]
        fn add_negative_secs() {
            let ts = Timestamp::from_secs(1000).unwrap();
            let earlier = ts.add_secs(-60);
            assert_eq!(earlier.timestamp_secs(), 940);
        }
    }

    mod comparison {
        use super::*;

        #[test]
        fn is_before() {
            let ts1 = Timestamp::from_secs(1000).unwrap();
            let ts2 = Timestamp::from_secs(2000).unwrap();
            assert!(ts1.is_before(&ts2));
            assert!(!ts2.is_before(&ts1));
        }

        #[test]
        fn is_after() {
            let ts1 = Timestamp::from_secs(1000).unwrap();
            let ts2 = Timestamp::from_secs(2000).unwrap();
            assert!(ts2.is_after(&ts1));
            assert!(!ts1.is_after(&ts2));
        }

        #[test]
        fn ordering() {
            let ts1 = Timestamp::from_secs(1000).unwrap();
            let ts2 = Timestamp::from_secs(2000).unwrap();
            assert!(ts1 < ts2);
            assert!(ts2 > ts1);
        }
    }

    mod formatting {
        use super::*;

        #[test]
        fn to_iso8601() {
            let ts = Timestamp::from_secs(1704067200).unwrap();
            let iso = ts.to_iso8601();
            assert!(iso.contains("T"));
            assert!(iso.ends_with("Z") || iso.contains("+00:00"));
        }

        #[test]
        fn date_extraction() {
            let ts = Timestamp::from_secs(1704067200).unwrap();
            assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        }

        #[test]
        fn display_format() {
            let ts = Timestamp::from_secs(1704067200).unwrap();
            let display = ts.to_string();
            assert!(display.contains("T"));
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            let ts = Timestamp::from_millis(1704067200123).unwrap();
            let json = serde_json::to_string(&ts).unwrap();
            let deserialized: Timestamp = serde_json::from_str(&json).unwrap();
            assert_eq!(ts, deserialized);
        }

        #[test]
        fn serde_iso8601_format() {
            let ts = Timestamp::from_secs(1704067200).unwrap();
            let json = serde_json::to_string(&ts).unwrap();
            assert!(json.contains("2024"));
        }
    }

    mod conversion {
        use super::*;

        #[test]
        fn from_datetime() {
            let dt = Utc::now();
            let ts: Timestamp = dt.into();
            assert_eq!(ts.as_datetime(), &dt);
        }

        #[test]
        fn into_datetime() {
            let ts = Timestamp::now();
            let dt: DateTime<Utc> = ts.into();
            assert_eq!(&dt, ts.as_datetime());
        }
    }
}
