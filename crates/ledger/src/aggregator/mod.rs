pub mod render;

use std::collections::BTreeMap;

use model::{
    event::{EventTemplate, Occurrence},
    ids::DayId,
    roster::{sort_members, Coach, Member},
    statistics::user::MemberSummary,
    time::round_tenths,
    window::DateWindow,
};
use serde::Serialize;

use crate::{attendance::AttendanceLedger, expander::expand_all};

/// ARGB fills for days with more than one occurrence, used in turn.
pub const PALETTE: [&str; 4] = ["FFFFEB99", "FFB3E5FC", "FFC8E6C9", "FFFFCCBC"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRow {
    pub member: Member,
    /// One per occurrence; `None` when the member is not expected there.
    pub cells: Vec<Option<bool>>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachRow {
    pub coach: Coach,
    pub hours: Vec<f64>,
    pub total: f64,
}

/// Member and coach attendance over the occurrences of a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    pub occurrences: Vec<Occurrence>,
    pub highlights: Vec<Option<&'static str>>,
    pub members: Vec<MemberRow>,
    pub coaches: Vec<CoachRow>,
    /// Present members per occurrence, coaches not counted.
    pub headcount: Vec<u32>,
}

impl Matrix {
    pub fn has_shared_days(&self) -> bool {
        self.highlights.iter().any(Option::is_some)
    }
}

/// Whether a member is expected at an occurrence. Events concern the whole
/// exported population, sessions only their subgroups.
pub fn in_scope(occurrence: &Occurrence, member: &Member) -> bool {
    occurrence.is_event() || member.in_any(&occurrence.subgroup_ids)
}

/// Members that are in scope for at least one occurrence, by name. Events only
/// pull in members of their target groups, or everybody when they have none.
pub fn population(members: &[Member], occurrences: &[Occurrence]) -> Vec<Member> {
    let mut population = members
        .iter()
        .filter(|member| {
            occurrences.iter().any(|occ| {
                (occ.is_event() && occ.subgroup_ids.is_empty()) || member.in_any(&occ.subgroup_ids)
            })
        })
        .cloned()
        .collect::<Vec<_>>();
    sort_members(&mut population);
    population
}

/// Colours days that carry more than one occurrence, in date order.
pub fn highlights(occurrences: &[Occurrence]) -> Vec<Option<&'static str>> {
    let mut per_day = BTreeMap::<DayId, usize>::new();
    for occ in occurrences {
        *per_day.entry(occ.date).or_default() += 1;
    }
    let colours = per_day
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .enumerate()
        .map(|(index, (day, _))| (day, PALETTE[index % PALETTE.len()]))
        .collect::<BTreeMap<_, _>>();
    occurrences
        .iter()
        .map(|occ| colours.get(&occ.date).copied())
        .collect()
}

pub struct AttendanceAggregator<'a> {
    ledger: &'a AttendanceLedger,
}

impl<'a> AttendanceAggregator<'a> {
    pub fn new(ledger: &'a AttendanceLedger) -> Self {
        AttendanceAggregator { ledger }
    }

    /// Expands `templates` over `window` and lays the attendance out per member and
    /// coach. Rows follow the order of `members` and `coaches`.
    pub fn build_matrix(
        &self,
        templates: &[EventTemplate],
        window: &DateWindow,
        members: &[Member],
        coaches: &[Coach],
    ) -> Matrix {
        self.matrix(expand_all(templates, window), members, coaches)
    }

    pub fn matrix(
        &self,
        occurrences: Vec<Occurrence>,
        members: &[Member],
        coaches: &[Coach],
    ) -> Matrix {
        let mut headcount = vec![0u32; occurrences.len()];

        let members = members
            .iter()
            .map(|member| {
                let cells = occurrences
                    .iter()
                    .map(|occ| {
                        in_scope(occ, member).then(|| self.ledger.is_present(occ, &member.id))
                    })
                    .collect::<Vec<_>>();
                for (count, cell) in headcount.iter_mut().zip(&cells) {
                    if *cell == Some(true) {
                        *count += 1;
                    }
                }
                MemberRow {
                    member: member.clone(),
                    total: cells.iter().filter(|cell| **cell == Some(true)).count() as u32,
                    cells,
                }
            })
            .collect();

        let coaches = coaches
            .iter()
            .map(|coach| {
                let hours = occurrences
                    .iter()
                    .map(|occ| self.ledger.coach_hours(occ, &coach.id))
                    .collect::<Vec<_>>();
                CoachRow {
                    coach: coach.clone(),
                    total: round_tenths(hours.iter().sum()),
                    hours,
                }
            })
            .collect();

        Matrix {
            highlights: highlights(&occurrences),
            occurrences,
            members,
            coaches,
            headcount,
        }
    }

    /// Attendance totals per member against every occurrence of the window. Most
    /// frequent first, ties by name.
    pub fn build_summary(
        &self,
        occurrences: &[Occurrence],
        members: &[Member],
    ) -> Vec<MemberSummary> {
        let total = occurrences.len() as u32;
        let mut members = members.to_vec();
        sort_members(&mut members);
        let mut summary = members
            .into_iter()
            .map(|member| {
                let count = occurrences
                    .iter()
                    .filter(|occ| self.ledger.is_present(occ, &member.id))
                    .count() as u32;
                MemberSummary::new(member.id.clone(), member.full_name(), count, total)
            })
            .collect::<Vec<_>>();
        summary.sort_by(|a, b| b.attendance_count.cmp(&a.attendance_count));
        summary
    }
}
