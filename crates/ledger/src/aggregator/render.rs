use std::collections::HashMap;

use model::{
    event::Occurrence,
    ids::SubgroupId,
    statistics::user::MemberSummary,
    table::{Cell, ColumnMeta, Row, RowKind, Table},
};

use super::Matrix;

const NAME_COLUMNS: usize = 2;
const HEADCOUNT_LABEL: &str = "Members per day (excluding coaches)";

fn legend(shared_days: bool) -> Vec<Row> {
    let mut lines = vec![
        vec!["Legend:"],
        vec!["Members:", "checked = present, unchecked = absent"],
        vec!["Coaches:", "hours present (e.g. 2.5)"],
        vec!["Total:", "members = number of trainings, coaches = sum of hours"],
    ];
    if shared_days {
        lines.push(vec![
            "Coloured columns",
            "= several trainings on the same day (same colour = same day)",
        ]);
    }
    lines
        .into_iter()
        .map(|line| Row::new(RowKind::Legend, line.into_iter().map(Cell::text).collect()))
        .collect()
}

/// Title shown under the date. Sessions have none and use their subgroup.
fn label(occurrence: &Occurrence, subgroup_names: &HashMap<SubgroupId, String>) -> String {
    let name = if occurrence.is_event() {
        occurrence.title.clone()
    } else {
        occurrence
            .primary_subgroup()
            .map(|id| {
                subgroup_names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| id.to_string())
            })
            .unwrap_or_else(|| occurrence.title.clone())
    };
    format!(
        "{} ({}-{})",
        name, occurrence.start_time, occurrence.end_time
    )
}

fn with_names(kind: RowKind, first: Cell, second: Cell, mut cells: Vec<Cell>, total: Cell) -> Row {
    let mut row = Vec::with_capacity(cells.len() + NAME_COLUMNS + 1);
    row.push(first);
    row.push(second);
    row.append(&mut cells);
    row.push(total);
    Row::new(kind, row)
}

pub fn matrix_table(
    matrix: &Matrix,
    subgroup_names: &HashMap<SubgroupId, String>,
    sheet_name: impl Into<String>,
) -> Table {
    let mut rows = Vec::new();

    rows.push(with_names(
        RowKind::Header,
        Cell::text("Last name"),
        Cell::text("First name"),
        matrix
            .occurrences
            .iter()
            .map(|occ| Cell::text(occ.date.short_format()))
            .collect(),
        Cell::text("Total"),
    ));
    rows.push(with_names(
        RowKind::Header,
        Cell::Blank,
        Cell::Blank,
        matrix
            .occurrences
            .iter()
            .map(|occ| Cell::Text(label(occ, subgroup_names)))
            .collect(),
        Cell::Blank,
    ));

    for row in &matrix.members {
        rows.push(with_names(
            RowKind::Member,
            Cell::text(row.member.last_name.as_str()),
            Cell::text(row.member.first_name.as_str()),
            row.cells
                .iter()
                .map(|cell| cell.map(Cell::Check).unwrap_or(Cell::Blank))
                .collect(),
            Cell::Count(u64::from(row.total)),
        ));
    }

    rows.push(Row::spacer());
    rows.push(Row::new(RowKind::Label, vec![Cell::text("Coaches")]));

    for row in &matrix.coaches {
        rows.push(with_names(
            RowKind::Coach,
            Cell::text(row.coach.last_name.as_str()),
            Cell::text(row.coach.first_name.as_str()),
            row.hours.iter().copied().map(Cell::hours).collect(),
            Cell::hours(row.total),
        ));
    }

    rows.push(with_names(
        RowKind::Headcount,
        Cell::text(HEADCOUNT_LABEL),
        Cell::Blank,
        matrix
            .headcount
            .iter()
            .map(|count| Cell::Count(u64::from(*count)))
            .collect(),
        Cell::Blank,
    ));

    rows.push(Row::spacer());
    rows.extend(legend(matrix.has_shared_days()));

    let columns = matrix
        .occurrences
        .iter()
        .zip(&matrix.highlights)
        .enumerate()
        .map(|(index, (occ, highlight))| ColumnMeta {
            index: index + NAME_COLUMNS,
            date: occ.date,
            event_id: occ.event_id.clone(),
            highlight: *highlight,
        })
        .collect();

    Table {
        sheet_name: sheet_name.into(),
        rows,
        columns,
    }
}

pub fn summary_table(summary: &[MemberSummary]) -> Table {
    let mut rows = vec![Row::new(
        RowKind::Header,
        vec![
            Cell::text("Member"),
            Cell::text("Attendances"),
            Cell::text("Attendance rate"),
        ],
    )];
    rows.extend(summary.iter().map(|entry| {
        Row::new(
            RowKind::Summary,
            vec![
                Cell::text(entry.name.as_str()),
                Cell::Count(u64::from(entry.attendance_count)),
                Cell::Text(entry.rate_percent()),
            ],
        )
    }));
    Table {
        sheet_name: "Summary".to_owned(),
        rows,
        columns: Vec::new(),
    }
}
