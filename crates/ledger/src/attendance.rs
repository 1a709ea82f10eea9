use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};
use model::{
    attendance::{AttendanceKey, EventAttendance, SessionAttendance},
    event::{EventTemplate, Occurrence, OccurrenceKind},
    ids::{CoachId, DayId, EventId, MemberId, SubgroupId},
    time::DEFAULT_SESSION_HOURS,
};

static NOBODY: BTreeSet<MemberId> = BTreeSet::new();

/// Normalized attendance of one occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFacts {
    pub present: BTreeSet<MemberId>,
    pub coach_hours: BTreeMap<CoachId, f64>,
}

/// Attendance records of one report, indexed by [`AttendanceKey`].
///
/// Built once from the stored records and never changed afterwards. Records with
/// the same key replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct AttendanceLedger {
    records: BTreeMap<AttendanceKey, AttendanceFacts>,
}

impl AttendanceLedger {
    /// `sessions` are the session templates of the window; they give the duration
    /// credited to coaches on legacy records.
    pub fn build(
        events: impl IntoIterator<Item = EventAttendance>,
        session_records: impl IntoIterator<Item = SessionAttendance>,
        sessions: &[EventTemplate],
    ) -> Self {
        let durations = SessionDurations::new(sessions);
        let mut records = BTreeMap::new();

        for record in events {
            let key = AttendanceKey::event(&record.event_id, record.occurrence_date);
            records.insert(
                key,
                AttendanceFacts {
                    present: record.present,
                    coach_hours: record.coach_hours,
                },
            );
        }

        for record in session_records {
            let Some(reference) = record.reference() else {
                warn!(
                    "Skipping session attendance of {}: no session or subgroup",
                    record.date
                );
                continue;
            };
            let key = AttendanceKey::session(record.date, reference);
            let coach_hours = match &record.coaches {
                Some(source) => source.resolve(durations.hours(&record)),
                None => BTreeMap::new(),
            };
            records.insert(
                key,
                AttendanceFacts {
                    present: record.present,
                    coach_hours,
                },
            );
        }

        debug!("Attendance ledger built with {} records", records.len());
        AttendanceLedger { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &AttendanceKey) -> Option<&AttendanceFacts> {
        self.records.get(key)
    }

    /// Record of an event occurrence. Recurring events only match the record of that
    /// exact occurrence; single events also accept a record saved without a date.
    pub fn event_facts(
        &self,
        event_id: &EventId,
        date: DayId,
        is_recurring: bool,
    ) -> Option<&AttendanceFacts> {
        let exact = self.records.get(&AttendanceKey::event(event_id, Some(date)));
        if exact.is_some() || is_recurring {
            return exact;
        }
        self.records.get(&AttendanceKey::event(event_id, None))
    }

    /// Record of a session occurrence. Legacy records saved without a session id
    /// are keyed by the subgroup of that day.
    pub fn session_facts(&self, occurrence: &Occurrence) -> Option<&AttendanceFacts> {
        self.records
            .get(&AttendanceKey::session(occurrence.date, occurrence.event_id.as_str()))
            .or_else(|| {
                let subgroup = occurrence.primary_subgroup()?;
                self.records.get(&AttendanceKey::session(occurrence.date, subgroup.as_str()))
            })
    }

    pub fn facts(&self, occurrence: &Occurrence) -> Option<&AttendanceFacts> {
        match occurrence.kind {
            OccurrenceKind::Event => {
                self.event_facts(&occurrence.event_id, occurrence.date, occurrence.is_recurring)
            }
            OccurrenceKind::Session => self.session_facts(occurrence),
        }
    }

    pub fn lookup_presence(
        &self,
        event_id: &EventId,
        date: DayId,
        is_recurring: bool,
    ) -> &BTreeSet<MemberId> {
        self.event_facts(event_id, date, is_recurring)
            .map(|facts| &facts.present)
            .unwrap_or(&NOBODY)
    }

    /// Hours a coach is credited for the record under `key`, 0 when absent.
    pub fn lookup_coach_hours(&self, key: &AttendanceKey, coach: &CoachId) -> f64 {
        self.records
            .get(key)
            .and_then(|facts| facts.coach_hours.get(coach))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn present(&self, occurrence: &Occurrence) -> &BTreeSet<MemberId> {
        self.facts(occurrence)
            .map(|facts| &facts.present)
            .unwrap_or(&NOBODY)
    }

    pub fn is_present(&self, occurrence: &Occurrence, member: &MemberId) -> bool {
        self.present(occurrence).contains(member)
    }

    pub fn coach_hours(&self, occurrence: &Occurrence, coach: &CoachId) -> f64 {
        self.facts(occurrence)
            .and_then(|facts| facts.coach_hours.get(coach))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Duration of the session a legacy record belongs to.
struct SessionDurations<'a> {
    by_id: HashMap<&'a EventId, &'a EventTemplate>,
    by_day: HashMap<(DayId, &'a SubgroupId), &'a EventTemplate>,
}

impl<'a> SessionDurations<'a> {
    fn new(sessions: &'a [EventTemplate]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_day = HashMap::new();
        for session in sessions
            .iter()
            .filter(|t| t.kind == OccurrenceKind::Session)
        {
            by_id.insert(&session.id, session);
            for subgroup in &session.subgroup_ids {
                by_day.entry((session.start_date, subgroup)).or_insert(session);
            }
        }
        SessionDurations { by_id, by_day }
    }

    fn hours(&self, record: &SessionAttendance) -> f64 {
        let by_id = record.session_id.as_ref().and_then(|id| self.by_id.get(id));
        let by_day = || {
            record
                .subgroup_id
                .as_ref()
                .and_then(|subgroup| self.by_day.get(&(record.date, subgroup)))
        };
        by_id
            .or_else(by_day)
            .map(|session| session.duration_hours())
            .unwrap_or(DEFAULT_SESSION_HOURS)
    }
}
