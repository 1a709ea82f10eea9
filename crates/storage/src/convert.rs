use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use model::{
    attendance::{CoachHoursSource, EventAttendance, SessionAttendance},
    errors::ModelError,
    event::{EventTemplate, OccurrenceKind},
    ids::{ClubId, CoachId, DayId, EventId, MemberId, SubgroupId},
    recurrence::{RecurrenceRule, RepeatKind},
    roster::{Club, Coach, Member, Subgroup},
    time::{WallTime, DEFAULT_END_TIME, DEFAULT_START_TIME},
};

use crate::rows::{
    ClubRow, EventAttendanceRow, EventRow, ProfileRow, SessionAttendanceRow, SessionRow,
    SubgroupRow,
};

/// Converts every row, logging and dropping the ones that fail.
pub fn convert_all<R, T>(
    rows: impl IntoIterator<Item = R>,
    what: &str,
    convert: impl Fn(R) -> Result<T, ModelError>,
) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match convert(row) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Skipping {}: {}", what, err);
                None
            }
        })
        .collect()
}

fn parse_day(id: &str, field: &str, value: Option<&str>) -> Result<DayId, ModelError> {
    let value =
        value.ok_or_else(|| ModelError::invalid_template(id, format!("{field} is missing")))?;
    DayId::parse(value)
        .map_err(|err| ModelError::invalid_template(id, format!("{field}: {err}")))
}

fn unique_subgroups(ids: impl IntoIterator<Item = String>) -> Vec<SubgroupId> {
    let mut seen = BTreeSet::new();
    ids.into_iter()
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .map(SubgroupId::from)
        .collect()
}

/// Readable times are normalized to `HH:MM`; unreadable ones are kept so the
/// duration falls back later.
fn time_or(value: Option<String>, default: &str) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .parse::<WallTime>()
            .map(|time| time.to_string())
            .unwrap_or(value),
        None => default.to_owned(),
    }
}

impl TryFrom<EventRow> for EventTemplate {
    type Error = ModelError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let start_date = parse_day(&row.id, "start_date", row.start_date.as_deref())?;
        let rule = match row.event_type.as_deref() {
            None | Some("single") => None,
            Some("recurring") => {
                let kind = row.repeat_type.as_deref().ok_or_else(|| {
                    ModelError::invalid_template(&row.id, "repeat_type is missing")
                })?;
                let kind = kind.parse::<RepeatKind>().map_err(|_| {
                    ModelError::invalid_template(
                        &row.id,
                        ModelError::UnknownRepeatType(kind.to_owned()).to_string(),
                    )
                })?;
                let mut rule = RecurrenceRule::new(kind);
                if let Some(end) = row.repeat_end_date.as_deref() {
                    rule = rule.until(parse_day(&row.id, "repeat_end_date", Some(end))?);
                }
                let excluded = row.excluded_dates.unwrap_or_default();
                let excluded = convert_all(excluded, "excluded date", |date| DayId::parse(&date));
                Some(rule.excluding(excluded))
            }
            Some(other) => {
                return Err(ModelError::invalid_template(
                    &row.id,
                    format!("unknown event_type {other}"),
                ))
            }
        };

        Ok(EventTemplate {
            title: row.title.unwrap_or_default(),
            kind: OccurrenceKind::Event,
            start_date,
            start_time: time_or(row.start_time, DEFAULT_START_TIME),
            end_time: time_or(row.end_time, DEFAULT_END_TIME),
            subgroup_ids: unique_subgroups(row.target_subgroup_ids.unwrap_or_default()),
            is_cancelled: row.cancelled.unwrap_or(false),
            rule,
            id: EventId::from(row.id),
        })
    }
}

impl TryFrom<SessionRow> for EventTemplate {
    type Error = ModelError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let start_date = parse_day(&row.id, "date", row.date.as_deref())?;
        Ok(EventTemplate {
            title: String::new(),
            kind: OccurrenceKind::Session,
            start_date,
            start_time: time_or(row.start_time, DEFAULT_START_TIME),
            end_time: time_or(row.end_time, DEFAULT_END_TIME),
            subgroup_ids: unique_subgroups(row.subgroup_id),
            is_cancelled: row.cancelled.unwrap_or(false),
            rule: None,
            id: EventId::from(row.id),
        })
    }
}

impl TryFrom<EventAttendanceRow> for EventAttendance {
    type Error = ModelError;

    fn try_from(row: EventAttendanceRow) -> Result<Self, Self::Error> {
        let occurrence_date = row
            .occurrence_date
            .as_deref()
            .map(DayId::parse)
            .transpose()?;
        // A broken creation timestamp only loses the fallback date.
        let recorded_on = row
            .created_at
            .as_deref()
            .and_then(|value| DayId::parse(value).ok());
        Ok(EventAttendance {
            event_id: EventId::from(row.event_id),
            occurrence_date,
            present: row
                .present_user_ids
                .unwrap_or_default()
                .into_iter()
                .map(MemberId::from)
                .collect(),
            coach_hours: row
                .coach_hours
                .unwrap_or_default()
                .into_iter()
                .map(|(id, hours)| (CoachId::from(id), hours))
                .collect(),
            recorded_on,
        })
    }
}

/// Picks the coach-hours shape of a legacy record, newest shape first.
fn coach_source(row: &mut SessionAttendanceRow) -> Option<CoachHoursSource> {
    if let Some(coaches) = row.coaches.take().filter(|c| !c.is_empty()) {
        let hours = coaches
            .into_iter()
            .map(|entry| (CoachId::from(entry.id), entry.hours.unwrap_or(0.0)))
            .collect::<BTreeMap<_, _>>();
        return Some(CoachHoursSource::Explicit(hours));
    }
    if let Some(ids) = row.coach_ids.take().filter(|ids| !ids.is_empty()) {
        return Some(CoachHoursSource::LegacyIdList(
            ids.into_iter().map(CoachId::from).collect(),
        ));
    }
    row.coach_id
        .take()
        .filter(|id| !id.is_empty())
        .map(|id| CoachHoursSource::LegacySingleId(CoachId::from(id)))
}

impl TryFrom<SessionAttendanceRow> for SessionAttendance {
    type Error = ModelError;

    fn try_from(mut row: SessionAttendanceRow) -> Result<Self, Self::Error> {
        let date = row
            .date
            .as_deref()
            .ok_or_else(|| ModelError::InvalidDate("attendance date is missing".to_owned()))
            .and_then(DayId::parse)?;
        let coaches = coach_source(&mut row);
        Ok(SessionAttendance {
            date,
            session_id: row.session_id.filter(|id| !id.is_empty()).map(EventId::from),
            subgroup_id: row.subgroup_id.filter(|id| !id.is_empty()).map(SubgroupId::from),
            present: row
                .present_player_ids
                .unwrap_or_default()
                .into_iter()
                .map(MemberId::from)
                .collect(),
            coaches,
        })
    }
}

impl From<ProfileRow> for Member {
    fn from(row: ProfileRow) -> Self {
        Member {
            id: MemberId::from(row.id),
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            subgroup_ids: row
                .subgroup_ids
                .unwrap_or_default()
                .into_iter()
                .map(SubgroupId::from)
                .collect(),
        }
    }
}

impl From<ProfileRow> for Coach {
    fn from(row: ProfileRow) -> Self {
        Coach {
            id: CoachId::from(row.id),
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
        }
    }
}

impl From<SubgroupRow> for Subgroup {
    fn from(row: SubgroupRow) -> Self {
        Subgroup {
            name: row.name.filter(|n| !n.is_empty()).unwrap_or_else(|| row.id.clone()),
            id: SubgroupId::from(row.id),
        }
    }
}

impl From<ClubRow> for Club {
    fn from(row: ClubRow) -> Self {
        Club {
            name: row.name.unwrap_or_else(|| row.id.clone()),
            id: ClubId::from(row.id),
        }
    }
}
