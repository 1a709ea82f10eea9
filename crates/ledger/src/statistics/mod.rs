//! Dashboard figures computed from attendance records. Everything here is pure:
//! the current day or time is passed in by the caller.

pub mod activity;
pub mod today;
pub mod training;

use model::{attendance::EventAttendance, ids::DayId};

/// Records that carry a day, newest first. Records on the same day keep their order.
pub(crate) fn dated_newest_first(records: &[EventAttendance]) -> Vec<(DayId, &EventAttendance)> {
    let mut dated = records
        .iter()
        .filter_map(|record| record.day().map(|day| (day, record)))
        .collect::<Vec<_>>();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated
}
