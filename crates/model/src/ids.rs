use std::{fmt, str::FromStr};

use chrono::{Datelike as _, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }
    };
}

string_id!(ClubId);
string_id!(EventId);
string_id!(MemberId);
string_id!(CoachId);
string_id!(SubgroupId);

/// A calendar day. The time of day is pinned to noon so that stepping by whole
/// days never lands on a neighbouring date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayId(NaiveDateTime);

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time")
}

impl DayId {
    pub fn new(date: NaiveDate) -> Self {
        DayId(date.and_time(noon()))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ModelError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(DayId::new)
            .ok_or_else(|| ModelError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parses `YYYY-MM-DD`. A full timestamp is accepted as well, only its date part is used.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        let date_part = value.get(..10).unwrap_or(value);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(DayId::new)
            .map_err(|_| ModelError::InvalidDate(value.to_owned()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.0
    }

    pub fn week_day(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn next(&self) -> Self {
        DayId(self.0 + Duration::days(1))
    }

    pub fn prev(&self) -> Self {
        DayId(self.0 - Duration::days(1))
    }

    pub fn add_days(&self, days: i64) -> Self {
        DayId(self.0 + Duration::days(days))
    }

    /// Whole days from `self` to `other`, negative when `other` is earlier.
    pub fn days_until(&self, other: DayId) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// `dd.mm.yyyy`
    pub fn short_format(&self) -> String {
        self.0.format("%d.%m.%Y").to_string()
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayId::parse(s)
    }
}

impl TryFrom<String> for DayId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DayId::parse(&value)
    }
}

impl From<DayId> for String {
    fn from(day: DayId) -> Self {
        day.to_string()
    }
}

impl From<NaiveDate> for DayId {
    fn from(date: NaiveDate) -> Self {
        DayId::new(date)
    }
}

impl From<NaiveDateTime> for DayId {
    fn from(date_time: NaiveDateTime) -> Self {
        DayId::new(date_time.date())
    }
}
