use std::sync::Arc;

use chrono::NaiveDateTime;
use eyre::{Context as _, Result};
use futures::try_join;
use log::info;
use model::{
    attendance::EventAttendance,
    event::EventTemplate,
    ids::{ClubId, DayId, EventId},
    roster::{sort_members, Member},
    statistics::{activity::ActivityReport, day::TodayTraining, training::TrainingAnalysis},
    window::DateWindow,
};
use storage::{convert::convert_all, AttendanceSource};

use super::{cache::Clock, SubgroupFilter};
use crate::{
    attendance::AttendanceLedger,
    statistics::{activity, today, training},
};

#[derive(Clone)]
pub struct Statistics {
    source: Arc<dyn AttendanceSource>,
    clock: Arc<dyn Clock>,
}

impl Statistics {
    pub(crate) fn new(source: Arc<dyn AttendanceSource>, clock: Arc<dyn Clock>) -> Self {
        Statistics { source, clock }
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now().naive_local()
    }

    async fn event_records(
        &self,
        club: &ClubId,
        filter: &SubgroupFilter,
        limit: Option<usize>,
    ) -> Result<Vec<EventAttendance>> {
        let events = self.source.events(club).await?;
        let ids = events
            .iter()
            .filter(|row| filter.admits_event(row))
            .map(|row| EventId::from(row.id.as_str()))
            .collect::<Vec<_>>();
        let rows = self.source.event_attendance(&ids, limit).await?;
        Ok(convert_all(rows, "event attendance", EventAttendance::try_from))
    }

    pub async fn training_analysis(
        &self,
        club: &ClubId,
        filter: &SubgroupFilter,
    ) -> Result<TrainingAnalysis> {
        let records = self
            .event_records(club, filter, None)
            .await
            .with_context(|| format!("Failed to load training analysis of club {}", club))?;
        let analysis = training::training_analysis(&records, DayId::from(self.now()));
        info!(
            "Training analysis of club {} ({}): {} records",
            club, filter, analysis.total_trainings
        );
        Ok(analysis)
    }

    pub async fn activity(&self, club: &ClubId, filter: &SubgroupFilter) -> Result<ActivityReport> {
        let (members, records) = try_join!(
            self.source.members(club),
            self.event_records(club, filter, Some(activity::RECENT_RECORDS)),
        )
        .with_context(|| format!("Failed to load activity of club {}", club))?;
        let mut members = members
            .into_iter()
            .map(Member::from)
            .filter(|member| filter.admits(member))
            .collect::<Vec<_>>();
        sort_members(&mut members);
        let report = activity::activity_report(&members, &records, DayId::from(self.now()));
        info!(
            "Activity of club {} ({}): {} inactive of {}",
            club,
            filter,
            report.inactive.len(),
            members.len()
        );
        Ok(report)
    }

    pub async fn today(&self, club: &ClubId) -> Result<Vec<TodayTraining>> {
        let now = self.now();
        let window = DateWindow::single_day(DayId::from(now));
        let (single, recurring) = try_join!(
            self.source.single_events(club, &window),
            self.source.recurring_events(club, &window),
        )
        .with_context(|| format!("Failed to load today's events of club {}", club))?;
        let mut templates = convert_all(single, "event", EventTemplate::try_from);
        templates.extend(convert_all(recurring, "recurring event", EventTemplate::try_from));

        let ids = templates.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        let rows = self.source.event_attendance(&ids, None).await?;
        let ledger = AttendanceLedger::build(
            convert_all(rows, "event attendance", EventAttendance::try_from),
            Vec::new(),
            &[],
        );
        Ok(today::todays_trainings(&templates, &ledger, now))
    }
}
