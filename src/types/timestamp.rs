use crate::types::TimestampError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Sub;
use std::str::FromStr;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M"
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A transaction instant, normalised to a naive UTC date/time.
///
/// Offsets are honoured when present (RFC 3339) and discarded after conversion,
/// so values coming from mixed sources still order correctly against each other.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Sub for Timestamp {
    type Output = TimeDelta;

    fn sub(self, rhs: Timestamp) -> TimeDelta {
        self.0 - rhs.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(TimestampError::Empty);
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
            return Ok(Timestamp(with_offset.naive_utc()));
        }

        for format in DATE_TIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Timestamp(parsed));
            }
        }

        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|date| Timestamp(date.and_time(NaiveTime::MIN)))
            .map_err(|_| TimestampError::InvalidFormat(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Timestamp::from_str(&value).map_err(de::Error::custom)
    }
}
