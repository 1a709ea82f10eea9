use serde::Serialize;

use crate::{event::Occurrence, ids::EventId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainingStatus {
    Upcoming,
    Running,
    Finished { attendees: u32 },
    MissingAttendance,
}

/// A training taking place today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayTraining {
    pub event_id: EventId,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub attendees: u32,
    pub status: TrainingStatus,
}

impl TodayTraining {
    pub fn new(occurrence: &Occurrence, attendees: u32, status: TrainingStatus) -> Self {
        TodayTraining {
            event_id: occurrence.event_id.clone(),
            title: occurrence.title.clone(),
            start_time: occurrence.start_time.clone(),
            end_time: occurrence.end_time.clone(),
            attendees,
            status,
        }
    }
}
