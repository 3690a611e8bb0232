//! DateTime type for temporal data in the trade system.
//!
//! This module provides a [`DateTime`] type that represents UTC timestamps with
//! subsecond precision. It wraps `time::PrimitiveDateTime` and ensures all
//! serialization happens in RFC3339 format for consistency across the system.

use std::{borrow::Borrow, fmt::Display};
use time::format_description::well_known::Rfc3339;

/// A type that represents a UTC datetime with subsecond precision.
///
/// Timestamps are used for order lifecycle events, activity windows, coupon
/// validity and payment expiry. Storing the primitive (offset-free) value keeps
/// SQLite comparisons lexicographically correct.
///
/// # Examples
///
/// ```
/// # use shop_core::models::DateTime;
/// # use time::OffsetDateTime;
/// let now = OffsetDateTime::now_utc();
/// let datetime = DateTime::from(now);
/// println!("{}", datetime); // Prints in RFC3339 format
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "DateTimeDto", into = "DateTimeDto")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct DateTime(time::PrimitiveDateTime);

impl DateTime {
    /// The current time
    pub fn now() -> Self {
        time::OffsetDateTime::now_utc().into()
    }

    /// Shift this timestamp forward by `duration`.
    pub fn plus(self, duration: std::time::Duration) -> Self {
        Self(self.0 + duration)
    }

    /// Shift this timestamp backward by `duration`.
    pub fn minus(self, duration: std::time::Duration) -> Self {
        Self(self.0 - duration)
    }

    /// Format as `yyyyMMddHHmmss`, as used by order numbers.
    pub fn compact(&self) -> String {
        format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: time::OffsetDateTime = (*self).into();
        match value.format(&Rfc3339) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl<T: Borrow<time::OffsetDateTime>> From<T> for DateTime {
    fn from(value: T) -> Self {
        let utc = value.borrow().to_offset(time::UtcOffset::UTC);
        Self(time::PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl From<DateTime> for time::OffsetDateTime {
    fn from(value: DateTime) -> Self {
        value.0.assume_utc()
    }
}

// This is a helper type that ensures (de)serialization happens with respect to RFC3339
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct DateTimeDto(#[serde(with = "time::serde::rfc3339")] time::OffsetDateTime);

#[cfg(feature = "serde")]
impl From<DateTimeDto> for DateTime {
    fn from(value: DateTimeDto) -> Self {
        value.0.into()
    }
}

#[cfg(feature = "serde")]
impl From<DateTime> for DateTimeDto {
    fn from(value: DateTime) -> Self {
        DateTimeDto(value.into())
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for DateTime {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> std::borrow::Cow<'static, str> {
        "DateTime".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "format": "date-time",
        })
    }
}
