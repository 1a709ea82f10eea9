use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::Serialize;

use crate::ids::{CoachId, DayId, EventId, MemberId, SubgroupId};

/// The three generations of coach-hours encoding found on session attendance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CoachHoursSource {
    Explicit(BTreeMap<CoachId, f64>),
    /// Each listed coach worked the whole session.
    LegacyIdList(Vec<CoachId>),
    /// The one coach worked the whole session.
    LegacySingleId(CoachId),
}

impl CoachHoursSource {
    /// Normalizes to hours per coach; legacy shapes get `session_hours` each.
    pub fn resolve(&self, session_hours: f64) -> BTreeMap<CoachId, f64> {
        match self {
            CoachHoursSource::Explicit(hours) => hours.clone(),
            CoachHoursSource::LegacyIdList(ids) => ids
                .iter()
                .map(|id| (id.clone(), session_hours))
                .collect(),
            CoachHoursSource::LegacySingleId(id) => {
                BTreeMap::from([(id.clone(), session_hours)])
            }
        }
    }
}

/// Attendance of an event, per occurrence for recurring events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAttendance {
    pub event_id: EventId,
    pub occurrence_date: Option<DayId>,
    pub present: BTreeSet<MemberId>,
    pub coach_hours: BTreeMap<CoachId, f64>,
    /// Creation day of the record, used when it carries no occurrence date.
    pub recorded_on: Option<DayId>,
}

impl EventAttendance {
    /// The day the record is attributed to.
    pub fn day(&self) -> Option<DayId> {
        self.occurrence_date.or(self.recorded_on)
    }
}

/// Attendance of a legacy training session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAttendance {
    pub date: DayId,
    pub session_id: Option<EventId>,
    pub subgroup_id: Option<SubgroupId>,
    pub present: BTreeSet<MemberId>,
    pub coaches: Option<CoachHoursSource>,
}

impl SessionAttendance {
    /// Session id, or the subgroup id for records saved before sessions had ids.
    pub fn reference(&self) -> Option<&str> {
        self.session_id
            .as_ref()
            .map(EventId::as_str)
            .or_else(|| self.subgroup_id.as_ref().map(SubgroupId::as_str))
    }
}

/// Lookup key of an attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttendanceKey {
    Event {
        event_id: EventId,
        occurrence_date: Option<DayId>,
    },
    Session {
        date: DayId,
        reference: String,
    },
}

impl AttendanceKey {
    pub fn event(event_id: &EventId, occurrence_date: Option<DayId>) -> Self {
        AttendanceKey::Event {
            event_id: event_id.clone(),
            occurrence_date,
        }
    }

    pub fn session(date: DayId, reference: impl Into<String>) -> Self {
        AttendanceKey::Session {
            date,
            reference: reference.into(),
        }
    }
}

impl fmt::Display for AttendanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceKey::Event {
                event_id,
                occurrence_date: Some(date),
            } => write!(f, "{}_{}", event_id, date),
            AttendanceKey::Event {
                event_id,
                occurrence_date: None,
            } => write!(f, "{}", event_id),
            AttendanceKey::Session { date, reference } => write!(f, "{}_{}", date, reference),
        }
    }
}
