use core::ops::{Add, Sub};

use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

/// A JSON numeric date: seconds since the Unix epoch, ignoring leap
/// seconds.
///
/// <https://www.rfc-editor.org/rfc/rfc7519#section-2>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericDate(pub i64);

impl NumericDate {
    pub fn now() -> Self {
        Self(UNIX_EPOCH.elapsed().expect("system clock before 1970").as_secs() as i64)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    #[cfg(feature = "chrono")]
    pub fn from_chrono_date_time(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt.timestamp())
    }

    #[cfg(feature = "time")]
    pub fn from_offset_date_time(odt: time::OffsetDateTime) -> Self {
        Self(odt.unix_timestamp())
    }
}

impl From<i64> for NumericDate {
    fn from(i: i64) -> Self {
        Self(i)
    }
}

impl From<NumericDate> for i64 {
    fn from(date: NumericDate) -> Self {
        date.0
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::DateTime<chrono::Utc>> for NumericDate {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::from_chrono_date_time(dt)
    }
}

#[cfg(feature = "time")]
impl From<time::OffsetDateTime> for NumericDate {
    fn from(odt: time::OffsetDateTime) -> Self {
        Self::from_offset_date_time(odt)
    }
}

impl Add<i64> for NumericDate {
    type Output = Self;
    fn add(self, rhs: i64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl Sub<i64> for NumericDate {
    type Output = Self;
    fn sub(self, rhs: i64) -> Self::Output {
        Self(self.0 - rhs)
    }
}

impl Add<core::time::Duration> for NumericDate {
    type Output = Self;
    fn add(self, rhs: core::time::Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs.as_secs() as i64))
    }
}

impl Sub<core::time::Duration> for NumericDate {
    type Output = Self;
    fn sub(self, rhs: core::time::Duration) -> Self::Output {
        Self(self.0.saturating_sub(rhs.as_secs() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_is_a_bare_number() {
        let date = NumericDate(1300819380);
        assert_eq!(serde_json::to_string(&date).unwrap(), "1300819380");
        let parsed: NumericDate = serde_json::from_str("1300819380").unwrap();
        assert_eq!(parsed, date);
    }

    #[test]
    fn test_arithmetic() {
        let date = NumericDate(100);
        assert_eq!(date + 20, NumericDate(120));
        assert_eq!(date - 20, NumericDate(80));
        assert_eq!(date + core::time::Duration::from_secs(5), NumericDate(105));
        assert!(NumericDate(1) < NumericDate(2));
    }
}
