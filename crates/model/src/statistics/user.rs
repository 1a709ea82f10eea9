use serde::Serialize;

use crate::ids::MemberId;

/// Attendance totals of one member over a report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub member_id: MemberId,
    pub name: String,
    pub attendance_count: u32,
    pub total_occurrences: u32,
    /// Between 0 and 1.
    pub attendance_rate: f64,
}

impl MemberSummary {
    pub fn new(member_id: MemberId, name: String, attendance_count: u32, total: u32) -> Self {
        let attendance_rate = if total == 0 {
            0.0
        } else {
            (f64::from(attendance_count) / f64::from(total)).clamp(0.0, 1.0)
        };
        MemberSummary {
            member_id,
            name,
            attendance_count,
            total_occurrences: total,
            attendance_rate,
        }
    }

    /// `66.7%`
    pub fn rate_percent(&self) -> String {
        format!("{:.1}%", self.attendance_rate * 100.0)
    }
}
