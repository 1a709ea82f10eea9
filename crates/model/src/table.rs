use serde::Serialize;
use strum::Display;

use crate::ids::{DayId, EventId};

/// A single spreadsheet cell as handed to the report writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Blank,
    Text(String),
    Number(f64),
    Count(u64),
    Check(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Hours, blank when zero.
    pub fn hours(value: f64) -> Self {
        if value == 0.0 {
            Cell::Blank
        } else {
            Cell::Number(value)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowKind {
    Header,
    Member,
    Spacer,
    Label,
    Coach,
    Headcount,
    Legend,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(kind: RowKind, cells: Vec<Cell>) -> Self {
        Row { kind, cells }
    }

    pub fn spacer() -> Self {
        Row::new(RowKind::Spacer, Vec::new())
    }
}

/// Occurrence column of a matrix table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeta {
    /// Zero based cell index within a row.
    pub index: usize,
    pub date: DayId,
    pub event_id: EventId,
    /// ARGB fill colour for days with more than one occurrence.
    pub highlight: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub sheet_name: String,
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnMeta>,
}

impl Table {
    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }
}

/// A table plus the file name the writer should use for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    pub file_name: String,
    pub table: Table,
}

pub fn matrix_file_name(year: i32, month: u32) -> String {
    format!("Attendance_{}_{:02}.xlsx", year, month)
}

pub fn summary_file_name(year: i32, month: u32) -> String {
    format!("Attendance_Summary_{}_{:02}.xlsx", year, month)
}
