use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike as _};
use serde::Serialize;

use crate::errors::ModelError;

/// Hours assumed for a session whose start or end time can't be read.
pub const DEFAULT_SESSION_HOURS: f64 = 2.0;

pub const DEFAULT_START_TIME: &str = "18:00";
pub const DEFAULT_END_TIME: &str = "20:00";

/// Wall-clock time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ModelError> {
        if hour > 23 || minute > 59 {
            return Err(ModelError::MalformedTime(format!("{hour}:{minute}")));
        }
        Ok(WallTime { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn total_minutes(&self) -> i32 {
        i32::from(self.hour) * 60 + i32::from(self.minute)
    }
}

impl FromStr for WallTime {
    type Err = ModelError;

    /// Accepts `HH:MM` and `HH:MM:SS`; seconds are ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || ModelError::MalformedTime(value.to_owned());
        let mut parts = value.trim().split(':');
        let hour = parts
            .next()
            .and_then(|h| h.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        let minute = parts
            .next()
            .and_then(|m| m.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        match parts.next() {
            None => {}
            Some(seconds) if seconds.parse::<u8>().map(|s| s < 60).unwrap_or(false) => {}
            Some(_) => return Err(malformed()),
        }
        if parts.next().is_some() {
            return Err(malformed());
        }
        WallTime::new(hour, minute).map_err(|_| malformed())
    }
}

impl From<NaiveTime> for WallTime {
    fn from(time: NaiveTime) -> Self {
        WallTime {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Length of a session in hours, rounded to one decimal.
pub fn try_session_duration_hours(start: &str, end: &str) -> Result<f64, ModelError> {
    let start = start.parse::<WallTime>()?;
    let end = end.parse::<WallTime>()?;
    let minutes = end.total_minutes() - start.total_minutes();
    Ok(round_tenths(f64::from(minutes) / 60.0))
}

/// Like [`try_session_duration_hours`], falling back to [`DEFAULT_SESSION_HOURS`]
/// when either time is malformed.
pub fn session_duration_hours(start: &str, end: &str) -> f64 {
    match try_session_duration_hours(start, end) {
        Ok(hours) => hours,
        Err(err) => {
            log::debug!("Using default session duration: {}", err);
            DEFAULT_SESSION_HOURS
        }
    }
}
