use std::fmt;

use serde::Serialize;

use crate::ids::MemberId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub member_id: MemberId,
    pub name: String,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "days", rename_all = "snake_case")]
pub enum LastSeen {
    Never,
    DaysAgo(i64),
}

impl fmt::Display for LastSeen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastSeen::Never => write!(f, "Never"),
            LastSeen::DaysAgo(0) => write!(f, "Today"),
            LastSeen::DaysAgo(1) => write!(f, "Yesterday"),
            LastSeen::DaysAgo(days) => write!(f, "{} days ago", days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InactiveMember {
    pub member_id: MemberId,
    pub name: String,
    pub last_seen: LastSeen,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ActivityReport {
    pub top_streaks: Vec<Streak>,
    pub inactive: Vec<InactiveMember>,
}
