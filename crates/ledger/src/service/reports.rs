use std::{collections::HashMap, sync::Arc};

use eyre::{Context as _, Result};
use futures::try_join;
use log::info;
use model::{
    attendance::{EventAttendance, SessionAttendance},
    event::EventTemplate,
    ids::{ClubId, SubgroupId},
    roster::{sort_coaches, Coach, Member, Subgroup},
    statistics::user::MemberSummary,
    table::{matrix_file_name, summary_file_name, Export},
    window::DateWindow,
};
use storage::{convert::convert_all, AttendanceSource};

use super::SubgroupFilter;
use crate::{
    aggregator::{
        population,
        render::{matrix_table, summary_table},
        AttendanceAggregator, Matrix,
    },
    attendance::AttendanceLedger,
    expander::expand_all,
};

/// Inputs of a report over one window, already normalized.
pub struct ReportData {
    pub window: DateWindow,
    /// Sessions first, then single events, then recurring events.
    pub templates: Vec<EventTemplate>,
    pub ledger: AttendanceLedger,
    /// Members admitted by the filter, in storage order.
    pub members: Vec<Member>,
    /// By name.
    pub coaches: Vec<Coach>,
    pub subgroup_names: HashMap<SubgroupId, String>,
}

#[derive(Clone)]
pub struct Reports {
    source: Arc<dyn AttendanceSource>,
}

impl Reports {
    pub(crate) fn new(source: Arc<dyn AttendanceSource>) -> Self {
        Reports { source }
    }

    pub async fn load(
        &self,
        club: &ClubId,
        window: DateWindow,
        filter: &SubgroupFilter,
    ) -> Result<ReportData> {
        let subgroup = filter.subgroup();
        let (sessions, single_events, recurring_events, members, coaches, subgroups) = try_join!(
            self.source.sessions(club, &window, subgroup),
            self.source.single_events(club, &window),
            self.source.recurring_events(club, &window),
            self.source.members(club),
            self.source.coaches(club),
            self.source.subgroups(club),
        )
        .with_context(|| format!("Failed to load report data of club {}", club))?;

        let mut templates = convert_all(sessions, "session", EventTemplate::try_from);
        let session_count = templates.len();
        templates.extend(convert_all(single_events, "event", EventTemplate::try_from));
        templates.extend(convert_all(
            recurring_events,
            "recurring event",
            EventTemplate::try_from,
        ));

        let event_ids = templates[session_count..]
            .iter()
            .map(|template| template.id.clone())
            .collect::<Vec<_>>();
        let (event_rows, session_rows) = try_join!(
            self.source.event_attendance(&event_ids, None),
            self.source.session_attendance(club, &window, subgroup),
        )
        .with_context(|| format!("Failed to load attendance of club {}", club))?;

        let ledger = AttendanceLedger::build(
            convert_all(event_rows, "event attendance", EventAttendance::try_from),
            convert_all(session_rows, "session attendance", SessionAttendance::try_from),
            &templates[..session_count],
        );

        let members = members
            .into_iter()
            .map(Member::from)
            .filter(|member| filter.admits(member))
            .collect::<Vec<_>>();
        let mut coaches = coaches.into_iter().map(Coach::from).collect::<Vec<_>>();
        sort_coaches(&mut coaches);
        let subgroup_names = subgroups
            .into_iter()
            .map(Subgroup::from)
            .map(|subgroup| (subgroup.id, subgroup.name))
            .collect();

        info!(
            "Loaded club {} {} ({}): {} templates, {} attendance records, {} members, {} coaches",
            club,
            window,
            filter,
            templates.len(),
            ledger.len(),
            members.len(),
            coaches.len()
        );
        Ok(ReportData {
            window,
            templates,
            ledger,
            members,
            coaches,
            subgroup_names,
        })
    }

    pub async fn matrix(
        &self,
        club: &ClubId,
        year: i32,
        month: u32,
        filter: &SubgroupFilter,
    ) -> Result<Matrix> {
        let data = self.load(club, DateWindow::month(year, month)?, filter).await?;
        Ok(build_matrix(&data))
    }

    pub async fn matrix_export(
        &self,
        club: &ClubId,
        year: i32,
        month: u32,
        filter: &SubgroupFilter,
    ) -> Result<Export> {
        let data = self.load(club, DateWindow::month(year, month)?, filter).await?;
        let matrix = build_matrix(&data);
        Ok(Export {
            file_name: matrix_file_name(year, month),
            table: matrix_table(&matrix, &data.subgroup_names, sheet_name(&data.window)),
        })
    }

    pub async fn summary(
        &self,
        club: &ClubId,
        year: i32,
        month: u32,
        filter: &SubgroupFilter,
    ) -> Result<Vec<MemberSummary>> {
        let data = self.load(club, DateWindow::month(year, month)?, filter).await?;
        let occurrences = expand_all(&data.templates, &data.window);
        let summary =
            AttendanceAggregator::new(&data.ledger).build_summary(&occurrences, &data.members);
        info!(
            "Summary of club {} {}: {} members over {} occurrences",
            club,
            data.window,
            summary.len(),
            occurrences.len()
        );
        Ok(summary)
    }

    pub async fn summary_export(
        &self,
        club: &ClubId,
        year: i32,
        month: u32,
        filter: &SubgroupFilter,
    ) -> Result<Export> {
        let summary = self.summary(club, year, month, filter).await?;
        Ok(Export {
            file_name: summary_file_name(year, month),
            table: summary_table(&summary),
        })
    }
}

fn build_matrix(data: &ReportData) -> Matrix {
    let occurrences = expand_all(&data.templates, &data.window);
    let members = population(&data.members, &occurrences);
    let matrix =
        AttendanceAggregator::new(&data.ledger).matrix(occurrences, &members, &data.coaches);
    info!(
        "Matrix {}: {} occurrences, {} members, {} coaches",
        data.window,
        matrix.occurrences.len(),
        matrix.members.len(),
        matrix.coaches.len()
    );
    matrix
}

/// `March 2024`
fn sheet_name(window: &DateWindow) -> String {
    window.start().date().format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use model::{
        ids::MemberId,
        table::{Cell, RowKind},
    };

    use super::*;
    use crate::{aggregator::PALETTE, service::tests::store};

    fn reports() -> Reports {
        Reports::new(Arc::new(store()))
    }

    fn club() -> ClubId {
        ClubId::from("club")
    }

    #[tokio::test]
    async fn test_month_matrix() {
        let matrix = reports()
            .matrix(&club(), 2024, 3, &SubgroupFilter::All)
            .await
            .unwrap();
        let columns = matrix
            .occurrences
            .iter()
            .map(|occ| format!("{}:{}", occ.date, occ.event_id))
            .collect::<Vec<_>>();
        assert_eq!(
            columns,
            vec![
                "2024-03-04:s1",
                "2024-03-04:s2",
                "2024-03-04:r1",
                "2024-03-09:e1",
                "2024-03-18:r1"
            ]
        );

        let members = matrix
            .members
            .iter()
            .map(|row| (row.member.id.as_str(), row.total))
            .collect::<Vec<_>>();
        assert_eq!(members, vec![("m1", 2), ("m3", 1), ("m2", 3)]);
        assert_eq!(
            matrix.members[0].cells,
            vec![Some(true), None, Some(false), Some(true), Some(false)]
        );
        assert_eq!(matrix.headcount, vec![2, 1, 1, 2, 0]);

        let coaches = matrix
            .coaches
            .iter()
            .map(|row| (row.coach.id.as_str(), row.total))
            .collect::<Vec<_>>();
        assert_eq!(coaches, vec![("c2", 3.0), ("c1", 4.0)]);
        assert_eq!(matrix.coaches[1].hours, vec![2.0, 0.0, 0.0, 2.0, 0.0]);

        assert_eq!(matrix.highlights[..3], [Some(PALETTE[0]); 3]);
        assert_eq!(matrix.highlights[3], None);
    }

    #[tokio::test]
    async fn test_matrix_export() {
        let export = reports()
            .matrix_export(&club(), 2024, 3, &SubgroupFilter::All)
            .await
            .unwrap();
        assert_eq!(export.file_name, "Attendance_2024_03.xlsx");
        assert_eq!(export.table.sheet_name, "March 2024");
        let labels = &export.table.rows[1].cells;
        assert_eq!(labels[2], Cell::text("Juniors (18:00-20:00)"));
        assert_eq!(labels[3], Cell::text("Seniors (17:00-18:30)"));
        assert_eq!(labels[4], Cell::text("Seniors match (19:00-21:00)"));
        assert_eq!(export.table.rows_of(RowKind::Member).count(), 3);
        assert_eq!(export.table.rows_of(RowKind::Legend).count(), 5);
    }

    #[tokio::test]
    async fn test_subgroup_filter() {
        let filter = SubgroupFilter::Only(SubgroupId::from("g1"));
        let matrix = reports().matrix(&club(), 2024, 3, &filter).await.unwrap();
        let ids = matrix
            .occurrences
            .iter()
            .map(|occ| occ.event_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["s1", "r1", "e1", "r1"]);
        let members = matrix
            .members
            .iter()
            .map(|row| row.member.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(members, vec![MemberId::from("m1"), MemberId::from("m3")]);
    }

    #[tokio::test]
    async fn test_summary() {
        let summary = reports()
            .summary(&club(), 2024, 3, &SubgroupFilter::All)
            .await
            .unwrap();
        let rows = summary
            .iter()
            .map(|row| (row.member_id.as_str(), row.attendance_count, row.rate_percent()))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                ("m2", 3, "60.0%".to_owned()),
                ("m1", 2, "40.0%".to_owned()),
                ("m3", 1, "20.0%".to_owned())
            ]
        );

        let export = reports()
            .summary_export(&club(), 2024, 3, &SubgroupFilter::All)
            .await
            .unwrap();
        assert_eq!(export.file_name, "Attendance_Summary_2024_03.xlsx");
        assert_eq!(export.table.rows.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_month() {
        let matrix = reports()
            .matrix(&club(), 2024, 7, &SubgroupFilter::All)
            .await
            .unwrap();
        assert!(matrix.occurrences.is_empty());
        assert!(matrix.members.is_empty());
        assert_eq!(matrix.coaches.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_month() {
        assert!(reports()
            .matrix(&club(), 2024, 13, &SubgroupFilter::All)
            .await
            .is_err());
    }
}
