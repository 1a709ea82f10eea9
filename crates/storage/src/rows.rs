use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubRow {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubgroupRow {
    pub id: String,
    pub club_id: Option<String>,
    pub name: Option<String>,
}

/// Row of the `events` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub club_id: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub target_subgroup_ids: Option<Vec<String>>,
    /// `single`, `recurring` or null.
    pub event_type: Option<String>,
    /// `daily`, `weekly` or `monthly`.
    pub repeat_type: Option<String>,
    pub repeat_end_date: Option<String>,
    pub excluded_dates: Option<Vec<String>>,
    pub cancelled: Option<bool>,
}

/// Row of the legacy `training_sessions` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: String,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub subgroup_id: Option<String>,
    pub club_id: Option<String>,
    pub cancelled: Option<bool>,
}

/// Row of the `event_attendance` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventAttendanceRow {
    pub event_id: String,
    pub occurrence_date: Option<String>,
    pub present_user_ids: Option<Vec<String>>,
    pub coach_hours: Option<BTreeMap<String, f64>>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachEntryRow {
    pub id: String,
    pub hours: Option<f64>,
}

/// Row of the legacy `attendance` table. Only one of `coaches`, `coach_ids`
/// and `coach_id` is expected to be filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAttendanceRow {
    pub club_id: Option<String>,
    pub date: Option<String>,
    pub session_id: Option<String>,
    pub subgroup_id: Option<String>,
    pub present_player_ids: Option<Vec<String>>,
    pub coaches: Option<Vec<CoachEntryRow>>,
    pub coach_ids: Option<Vec<String>>,
    pub coach_id: Option<String>,
}

/// Row of the `profiles` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub club_id: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub subgroup_ids: Option<Vec<String>>,
}

pub const MEMBER_ROLE: &str = "player";
pub const COACH_ROLES: [&str; 2] = ["coach", "head_coach"];

impl ProfileRow {
    pub fn is_member(&self) -> bool {
        self.role.as_deref() == Some(MEMBER_ROLE)
    }

    pub fn is_coach(&self) -> bool {
        self.role
            .as_deref()
            .map(|role| COACH_ROLES.contains(&role))
            .unwrap_or(false)
    }
}
