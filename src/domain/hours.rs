use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    #[error("invalid time of day {0:?}, expected HH:MM")]
    BadTime(String),
    #[error("{day:?} opens at {open} but closes at {close}")]
    ClosesBeforeOpening { day: Weekday, open: ClockTime, close: ClockTime },
}

/// Wall-clock time of day with minute precision, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// # Errors
    /// Returns `HoursError::BadTime` if the hour or minute is out of range.
    pub fn new(hour: u8, minute: u8) -> Result<Self, HoursError> {
        if hour > 23 || minute > 59 {
            return Err(HoursError::BadTime(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || HoursError::BadTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        if h.len() != 2 || m.len() != 2 || !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let hour = h.parse::<u8>().map_err(|_| bad())?;
        let minute = m.parse::<u8>().map_err(|_| bad())?;
        Self::new(hour, minute).map_err(|_| bad())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = HoursError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningHours {
    pub open: ClockTime,
    pub close: ClockTime,
}

/// Opening hours per weekday. Days missing from the map are closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyHours(pub BTreeMap<Weekday, OpeningHours>);

impl WeeklyHours {
    /// # Errors
    /// Returns `HoursError::ClosesBeforeOpening` for the first day whose range is empty or inverted.
    pub fn validate(&self) -> Result<(), HoursError> {
        for (day, hours) in &self.0 {
            if hours.open >= hours.close {
                return Err(HoursError::ClosesBeforeOpening { day: *day, open: hours.open, close: hours.close });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn on(&self, day: Weekday) -> Option<OpeningHours> {
        self.0.get(&day).copied()
    }

    #[must_use]
    pub fn is_open_at(&self, day: Weekday, at: ClockTime) -> bool {
        self.on(day).is_some_and(|h| h.open <= at && at < h.close)
    }
}
