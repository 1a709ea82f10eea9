use std::fmt;

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::{errors::ModelError, ids::DayId};

/// Inclusive range of calendar days `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: DayId,
    end: DayId,
}

impl DateWindow {
    pub fn new(start: DayId, end: DayId) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateWindow { start, end })
    }

    pub fn single_day(day: DayId) -> Self {
        DateWindow {
            start: day,
            end: day,
        }
    }

    /// First to last day of the given month.
    pub fn month(year: i32, month: u32) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidDate(format!("{year:04}-{month:02}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;
        DateWindow::new(DayId::new(first), DayId::new(last))
    }

    /// The `days` days ending at `end`, both ends inclusive.
    pub fn ending_at(end: DayId, days: u32) -> Self {
        let start = end.add_days(-(i64::from(days.max(1)) - 1));
        DateWindow { start, end }
    }

    pub fn start(&self) -> DayId {
        self.start
    }

    pub fn end(&self) -> DayId {
        self.end
    }

    pub fn contains(&self, day: DayId) -> bool {
        self.start <= day && day <= self.end
    }

    /// Narrows the start of the window to `from` if it is later. Returns `None`
    /// when nothing of the window remains.
    pub fn starting_from(&self, from: DayId) -> Option<DateWindow> {
        let start = self.start.max(from);
        if start > self.end {
            None
        } else {
            Some(DateWindow {
                start,
                end: self.end,
            })
        }
    }

    pub fn days(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Iterator over every day of a window, earliest first.
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<DayId>,
    end: DayId,
}

impl Iterator for Days {
    type Item = DayId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.end {
            Some(current.next())
        } else {
            None
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> DayId {
        DayId::parse(value).unwrap()
    }

    #[test]
    fn test_month_window() {
        let window = DateWindow::month(2024, 2).unwrap();
        assert_eq!(window.start(), day("2024-02-01"));
        assert_eq!(window.end(), day("2024-02-29"));

        let window = DateWindow::month(2023, 12).unwrap();
        assert_eq!(window.end(), day("2023-12-31"));

        assert!(DateWindow::month(2024, 13).is_err());
    }

    #[test]
    fn test_window_rejects_reversed_bounds() {
        assert!(DateWindow::new(day("2024-03-05"), day("2024-03-01")).is_err());
        assert!(DateWindow::new(day("2024-03-05"), day("2024-03-05")).is_ok());
    }

    #[test]
    fn test_days_are_inclusive() {
        let window = DateWindow::new(day("2024-03-30"), day("2024-04-02")).unwrap();
        let days = window.days().map(|d| d.to_string()).collect::<Vec<_>>();
        assert_eq!(
            days,
            vec!["2024-03-30", "2024-03-31", "2024-04-01", "2024-04-02"]
        );
        assert!(window.contains(day("2024-03-30")));
        assert!(window.contains(day("2024-04-02")));
        assert!(!window.contains(day("2024-04-03")));
    }

    #[test]
    fn test_starting_from() {
        let window = DateWindow::month(2024, 3).unwrap();
        let narrowed = window.starting_from(day("2024-03-10")).unwrap();
        assert_eq!(narrowed.start(), day("2024-03-10"));
        assert_eq!(window.starting_from(day("2024-02-10")), Some(window));
        assert_eq!(window.starting_from(day("2024-04-01")), None);
    }

    #[test]
    fn test_ending_at() {
        let window = DateWindow::ending_at(day("2024-03-14"), 14);
        assert_eq!(window.start(), day("2024-03-01"));
        assert_eq!(window.end(), day("2024-03-14"));
        assert_eq!(DateWindow::ending_at(day("2024-03-14"), 1).start(), day("2024-03-14"));
    }
}
