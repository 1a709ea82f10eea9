use chrono::NaiveDateTime;
use model::{
    event::{EventTemplate, Occurrence},
    ids::DayId,
    statistics::day::{TodayTraining, TrainingStatus},
    time::WallTime,
    window::DateWindow,
};

use crate::{attendance::AttendanceLedger, expander::expand_all};

fn status(occurrence: &Occurrence, attendees: u32, now: WallTime) -> TrainingStatus {
    let (Ok(start), Ok(end)) = (
        occurrence.start_time.parse::<WallTime>(),
        occurrence.end_time.parse::<WallTime>(),
    ) else {
        return TrainingStatus::Upcoming;
    };
    if start <= now && now <= end {
        TrainingStatus::Running
    } else if now > end {
        if attendees > 0 {
            TrainingStatus::Finished { attendees }
        } else {
            TrainingStatus::MissingAttendance
        }
    } else {
        TrainingStatus::Upcoming
    }
}

/// Trainings taking place on the day of `now`, by start time.
pub fn todays_trainings(
    templates: &[EventTemplate],
    ledger: &AttendanceLedger,
    now: NaiveDateTime,
) -> Vec<TodayTraining> {
    let today = DateWindow::single_day(DayId::from(now));
    let clock = WallTime::from(now.time());

    let mut occurrences = expand_all(templates, &today);
    occurrences.sort_by_key(|occ| occ.start_time.parse::<WallTime>().ok());

    occurrences
        .iter()
        .map(|occ| {
            let attendees = ledger.present(occ).len() as u32;
            TodayTraining::new(occ, attendees, status(occ, attendees, clock))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use model::{
        attendance::EventAttendance,
        ids::{EventId, MemberId},
        recurrence::{RecurrenceRule, RepeatKind},
    };

    use super::*;
    use crate::aggregator::tests::{day, event};

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn timed(id: &str, date: &str, start: &str, end: &str) -> EventTemplate {
        let mut template = event(id, date, None);
        template.start_time = start.to_owned();
        template.end_time = end.to_owned();
        template
    }

    fn attended(id: &str, date: Option<&str>, present: &[&str]) -> EventAttendance {
        EventAttendance {
            event_id: EventId::from(id),
            occurrence_date: date.map(day),
            present: present
                .iter()
                .map(|m| MemberId::from(*m))
                .collect::<BTreeSet<_>>(),
            coach_hours: BTreeMap::new(),
            recorded_on: None,
        }
    }

    #[test]
    fn test_statuses_and_order() {
        let mut weekly = timed("weekly", "2024-03-13", "08:00", "09:00");
        weekly.rule = Some(RecurrenceRule::new(RepeatKind::Weekly));
        let templates = vec![
            timed("evening", "2024-03-20", "19:00", "20:30"),
            timed("noon", "2024-03-20", "12:00", "13:00"),
            weekly,
            timed("morning", "2024-03-20", "10:00", "11:00"),
            timed("tomorrow", "2024-03-21", "10:00", "11:00"),
        ];
        let ledger = AttendanceLedger::build(
            vec![
                attended("weekly", Some("2024-03-20"), &["m1", "m2"]),
                attended("weekly", None, &["m3"]),
            ],
            Vec::new(),
            &[],
        );
        let trainings = todays_trainings(&templates, &ledger, at("2024-03-20", "12:30"));
        let summary = trainings
            .iter()
            .map(|t| (t.event_id.as_str(), t.status))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("weekly", TrainingStatus::Finished { attendees: 2 }),
                ("morning", TrainingStatus::MissingAttendance),
                ("noon", TrainingStatus::Running),
                ("evening", TrainingStatus::Upcoming),
            ]
        );
    }

    #[test]
    fn test_unreadable_times_are_upcoming() {
        let templates = vec![timed("odd", "2024-03-20", "soon", "later")];
        let ledger = AttendanceLedger::default();
        let trainings = todays_trainings(&templates, &ledger, at("2024-03-20", "23:00"));
        assert_eq!(trainings[0].status, TrainingStatus::Upcoming);
        assert_eq!(trainings[0].attendees, 0);
    }
}
