//! Calendar values stored by DATE and DATETIME postings.
//!
//! Both types hold whole seconds (or whole days) only, which is exactly what
//! the binary layout can carry, so encoding and decoding are lossless.

use std::fmt;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use crate::{CoreError, CoreResult};

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Largest offset magnitude in minutes (just under a day).
const MAX_OFFSET_MINUTES: i16 = 1439;

fn year_in_range(year: i32) -> bool {
    (1..=9999).contains(&year)
}

/// A calendar date, stored as days since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    days: i64,
}

impl Date {
    /// Create a date from its day ordinal relative to 1970-01-01.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the date falls outside years
    /// 1 through 9999.
    pub fn from_epoch_days(days: i64) -> CoreResult<Self> {
        let date = days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(|ce| i32::try_from(ce).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .filter(|d| year_in_range(chrono::Datelike::year(d)));
        match date {
            Some(_) => Ok(Self { days }),
            None => Err(CoreError::validation(format!("date ordinal {days} out of range"))),
        }
    }

    /// Create a date from year, month and day.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for impossible or out-of-range dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CoreError::validation(format!("invalid date {year}-{month}-{day}")))?;
        Self::from_naive(date)
    }

    /// Convert from a chrono date.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] outside years 1 through 9999.
    pub fn from_naive(date: NaiveDate) -> CoreResult<Self> {
        let ce = chrono::Datelike::num_days_from_ce(&date);
        Self::from_epoch_days(i64::from(ce) - UNIX_EPOCH_DAYS_FROM_CE)
    }

    /// Days since 1970-01-01.
    #[must_use]
    pub const fn epoch_days(self) -> i64 {
        self.days
    }

    /// The chrono date. Always valid, checked on construction.
    #[must_use]
    pub fn to_naive(self) -> NaiveDate {
        i32::try_from(self.days + UNIX_EPOCH_DAYS_FROM_CE)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Parse `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the text is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| CoreError::validation(format!("invalid date {s:?}: {e}")))?;
        Self::from_naive(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_naive().format("%Y-%m-%d"))
    }
}

/// An instant with second precision and an optional display offset.
///
/// `offset_minutes == None` means the value was given in UTC with no explicit
/// offset and renders with a `Z` suffix. `Some(0)` renders as `+00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    secs: i64,
    offset_minutes: Option<i16>,
}

impl DateTime {
    /// Create a UTC instant from seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] outside years 1 through 9999.
    pub fn from_unix(secs: i64) -> CoreResult<Self> {
        Self::with_offset(secs, None)
    }

    /// Create an instant carrying an explicit offset in minutes east of UTC.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the offset is not in
    /// `-1439..=1439`, equals `-1` (reserved for "UTC"), or the local time
    /// falls outside years 1 through 9999.
    pub fn with_offset(secs: i64, offset_minutes: Option<i16>) -> CoreResult<Self> {
        if let Some(m) = offset_minutes {
            if m == -1 || !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&m) {
                return Err(CoreError::validation(format!("offset {m} minutes not representable")));
            }
        }
        let value = Self { secs, offset_minutes };
        let utc = chrono::DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| CoreError::validation(format!("timestamp {secs} out of range")))?;
        let local = utc.with_timezone(&value.fixed_offset());
        if !year_in_range(chrono::Datelike::year(&local)) {
            return Err(CoreError::validation(format!("timestamp {secs} out of range")));
        }
        Ok(value)
    }

    /// Convert from a chrono date-time, dropping sub-second precision.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the offset is not a whole number of
    /// minutes or the value is out of range.
    pub fn from_chrono(dt: &chrono::DateTime<FixedOffset>) -> CoreResult<Self> {
        let offset_secs = dt.offset().local_minus_utc();
        if offset_secs % 60 != 0 {
            return Err(CoreError::validation(format!("offset {offset_secs}s is not whole minutes")));
        }
        let minutes = i16::try_from(offset_secs / 60)
            .map_err(|_| CoreError::validation("offset out of range"))?;
        Self::with_offset(dt.timestamp(), Some(minutes))
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub const fn unix_seconds(self) -> i64 {
        self.secs
    }

    /// Explicit offset in minutes, `None` for UTC (`Z`).
    #[must_use]
    pub const fn offset_minutes(self) -> Option<i16> {
        self.offset_minutes
    }

    fn fixed_offset(self) -> FixedOffset {
        let secs = i32::from(self.offset_minutes.unwrap_or(0)) * 60;
        FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
    }

    /// The chrono date-time in its own offset.
    #[must_use]
    pub fn to_chrono(self) -> chrono::DateTime<FixedOffset> {
        let utc = chrono::DateTime::from_timestamp(self.secs, 0).unwrap_or_default();
        utc.with_timezone(&self.fixed_offset())
    }

    /// Parse RFC 3339 (`2005-05-02T15:04:05Z`, `...+05:30`) or a naive
    /// `YYYY-MM-DDTHH:MM:SS`, which is read as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the text is not a date-time.
    pub fn parse(s: &str) -> CoreResult<Self> {
        if s.ends_with('Z') || s.ends_with('z') {
            let dt = chrono::DateTime::parse_from_rfc3339(s)
                .map_err(|e| CoreError::validation(format!("invalid datetime {s:?}: {e}")))?;
            return Self::from_unix(dt.timestamp()).and_then(|v| reject_fraction(v, &dt, s));
        }
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
            return Self::from_chrono(&dt).and_then(|v| reject_fraction(v, &dt, s));
        }
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| CoreError::validation(format!("invalid datetime {s:?}: {e}")))?;
        Self::from_unix(naive.and_utc().timestamp())
    }
}

fn reject_fraction(
    value: DateTime,
    dt: &chrono::DateTime<FixedOffset>,
    s: &str,
) -> CoreResult<DateTime> {
    if dt.timestamp_subsec_nanos() != 0 {
        return Err(CoreError::validation(format!("datetime {s:?} has sub-second precision")));
    }
    Ok(value)
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.to_chrono();
        match self.offset_minutes {
            None => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            Some(_) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%:z")),
        }
    }
}
