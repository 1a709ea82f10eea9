use serde::Serialize;

use crate::{
    ids::{DayId, EventId, SubgroupId},
    recurrence::RecurrenceRule,
    time::session_duration_hours,
};

/// Where a template comes from. Sessions are the legacy per-subgroup trainings,
/// events are the current calendar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    Session,
    Event,
}

/// Stored definition of a training session or event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTemplate {
    pub id: EventId,
    pub title: String,
    pub kind: OccurrenceKind,
    /// Sole occurrence of a single template, first possible one of a recurring template.
    pub start_date: DayId,
    pub start_time: String,
    pub end_time: String,
    /// Empty means the whole club.
    pub subgroup_ids: Vec<SubgroupId>,
    pub is_cancelled: bool,
    pub rule: Option<RecurrenceRule>,
}

impl EventTemplate {
    pub fn is_recurring(&self) -> bool {
        self.rule.is_some()
    }

    pub fn duration_hours(&self) -> f64 {
        session_duration_hours(&self.start_time, &self.end_time)
    }

    pub fn occurrence(&self, date: DayId, template_index: usize) -> Occurrence {
        Occurrence {
            event_id: self.id.clone(),
            date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            title: self.title.clone(),
            subgroup_ids: self.subgroup_ids.clone(),
            kind: self.kind,
            is_recurring: self.is_recurring(),
            template_index,
        }
    }
}

/// One dated instance of a template. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub event_id: EventId,
    pub date: DayId,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    pub subgroup_ids: Vec<SubgroupId>,
    pub kind: OccurrenceKind,
    pub is_recurring: bool,
    /// Position of the source template in the input, used to order same-day occurrences.
    pub template_index: usize,
}

impl Occurrence {
    pub fn is_event(&self) -> bool {
        self.kind == OccurrenceKind::Event
    }

    pub fn duration_hours(&self) -> f64 {
        session_duration_hours(&self.start_time, &self.end_time)
    }

    /// The target group shown for the occurrence, if any.
    pub fn primary_subgroup(&self) -> Option<&SubgroupId> {
        self.subgroup_ids.first()
    }
}
