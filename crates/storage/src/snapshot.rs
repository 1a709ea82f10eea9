use std::{cmp::Reverse, path::Path};

use async_trait::async_trait;
use eyre::{Context as _, Result};
use log::info;
use model::{
    ids::{ClubId, DayId, EventId, SubgroupId},
    window::DateWindow,
};
use serde::{Deserialize, Serialize};

use crate::{
    rows::{
        ClubRow, EventAttendanceRow, EventRow, ProfileRow, SessionAttendanceRow, SessionRow,
        SubgroupRow,
    },
    AttendanceSource,
};

/// Export of the club tables, one array per table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub clubs: Vec<ClubRow>,
    pub subgroups: Vec<SubgroupRow>,
    pub training_sessions: Vec<SessionRow>,
    pub events: Vec<EventRow>,
    pub event_attendance: Vec<EventAttendanceRow>,
    pub attendance: Vec<SessionAttendanceRow>,
    pub profiles: Vec<ProfileRow>,
}

/// [`AttendanceSource`] over an in-memory [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: Snapshot,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        SnapshotStore { snapshot }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        info!(
            "Loaded snapshot: {} events, {} sessions, {} profiles",
            snapshot.events.len(),
            snapshot.training_sessions.len(),
            snapshot.profiles.len()
        );
        Ok(SnapshotStore::new(snapshot))
    }
}

fn same_club(row_club: &Option<String>, club: &ClubId) -> bool {
    row_club.as_deref() == Some(club.as_str())
}

fn matches_subgroup(row_subgroup: &Option<String>, subgroup: Option<&SubgroupId>) -> bool {
    match subgroup {
        Some(subgroup) => row_subgroup.as_deref() == Some(subgroup.as_str()),
        None => true,
    }
}

/// Unreadable dates are let through so the conversion step can report them.
fn date_cmp(value: Option<&str>, check: impl Fn(DayId) -> bool) -> bool {
    match value.map(DayId::parse) {
        Some(Ok(day)) => check(day),
        Some(Err(_)) => true,
        None => false,
    }
}

fn in_window(value: Option<&str>, window: &DateWindow) -> bool {
    date_cmp(value, |day| window.contains(day))
}

fn is_active(cancelled: Option<bool>) -> bool {
    !cancelled.unwrap_or(false)
}

fn by_last_name(profiles: &mut [ProfileRow]) {
    profiles.sort_by(|a, b| a.last_name.cmp(&b.last_name));
}

#[async_trait]
impl AttendanceSource for SnapshotStore {
    async fn clubs(&self) -> Result<Vec<ClubRow>> {
        Ok(self.snapshot.clubs.clone())
    }

    async fn subgroups(&self, club: &ClubId) -> Result<Vec<SubgroupRow>> {
        Ok(self
            .snapshot
            .subgroups
            .iter()
            .filter(|row| same_club(&row.club_id, club))
            .cloned()
            .collect())
    }

    async fn sessions(
        &self,
        club: &ClubId,
        window: &DateWindow,
        subgroup: Option<&SubgroupId>,
    ) -> Result<Vec<SessionRow>> {
        let mut rows = self
            .snapshot
            .training_sessions
            .iter()
            .filter(|row| same_club(&row.club_id, club))
            .filter(|row| is_active(row.cancelled))
            .filter(|row| matches_subgroup(&row.subgroup_id, subgroup))
            .filter(|row| in_window(row.date.as_deref(), window))
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rows)
    }

    async fn single_events(&self, club: &ClubId, window: &DateWindow) -> Result<Vec<EventRow>> {
        let mut rows = self
            .snapshot
            .events
            .iter()
            .filter(|row| same_club(&row.club_id, club))
            .filter(|row| is_active(row.cancelled))
            .filter(|row| matches!(row.event_type.as_deref(), None | Some("single")))
            .filter(|row| in_window(row.start_date.as_deref(), window))
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(rows)
    }

    async fn recurring_events(
        &self,
        club: &ClubId,
        window: &DateWindow,
    ) -> Result<Vec<EventRow>> {
        Ok(self
            .snapshot
            .events
            .iter()
            .filter(|row| same_club(&row.club_id, club))
            .filter(|row| is_active(row.cancelled))
            .filter(|row| row.event_type.as_deref() == Some("recurring"))
            .filter(|row| date_cmp(row.start_date.as_deref(), |day| day <= window.end()))
            .filter(|row| {
                row.repeat_end_date.is_none()
                    || date_cmp(row.repeat_end_date.as_deref(), |day| {
                        day >= window.start()
                    })
            })
            .cloned()
            .collect())
    }

    async fn events(&self, club: &ClubId) -> Result<Vec<EventRow>> {
        Ok(self
            .snapshot
            .events
            .iter()
            .filter(|row| same_club(&row.club_id, club))
            .cloned()
            .collect())
    }

    async fn event_attendance(
        &self,
        event_ids: &[EventId],
        limit: Option<usize>,
    ) -> Result<Vec<EventAttendanceRow>> {
        let mut rows = self
            .snapshot
            .event_attendance
            .iter()
            .filter(|row| event_ids.iter().any(|id| id.as_str() == row.event_id))
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by_key(|row| {
            Reverse(
                row.occurrence_date
                    .clone()
                    .or_else(|| row.created_at.clone()),
            )
        });
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn session_attendance(
        &self,
        club: &ClubId,
        window: &DateWindow,
        subgroup: Option<&SubgroupId>,
    ) -> Result<Vec<SessionAttendanceRow>> {
        let mut rows = self
            .snapshot
            .attendance
            .iter()
            .filter(|row| same_club(&row.club_id, club))
            .filter(|row| matches_subgroup(&row.subgroup_id, subgroup))
            .filter(|row| in_window(row.date.as_deref(), window))
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rows)
    }

    async fn members(&self, club: &ClubId) -> Result<Vec<ProfileRow>> {
        let mut rows = self
            .snapshot
            .profiles
            .iter()
            .filter(|row| same_club(&row.club_id, club) && row.is_member())
            .cloned()
            .collect::<Vec<_>>();
        by_last_name(&mut rows);
        Ok(rows)
    }

    async fn coaches(&self, club: &ClubId) -> Result<Vec<ProfileRow>> {
        let mut rows = self
            .snapshot
            .profiles
            .iter()
            .filter(|row| same_club(&row.club_id, club) && row.is_coach())
            .cloned()
            .collect::<Vec<_>>();
        by_last_name(&mut rows);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "events": [
            {"id": "e1", "club_id": "club", "start_date": "2024-03-05", "event_type": "single"},
            {"id": "e2", "club_id": "club", "start_date": "2024-03-06"},
            {"id": "e3", "club_id": "club", "start_date": "2024-03-07", "cancelled": true},
            {"id": "e4", "club_id": "other", "start_date": "2024-03-08"},
            {"id": "r1", "club_id": "club", "start_date": "2024-01-01", "event_type": "recurring",
             "repeat_type": "weekly"},
            {"id": "r2", "club_id": "club", "start_date": "2024-01-01", "event_type": "recurring",
             "repeat_type": "weekly", "repeat_end_date": "2024-02-15"},
            {"id": "r3", "club_id": "club", "start_date": "2024-04-01", "event_type": "recurring",
             "repeat_type": "daily"}
        ],
        "event_attendance": [
            {"event_id": "e1", "occurrence_date": "2024-03-05", "present_user_ids": ["m1"]},
            {"event_id": "r1", "occurrence_date": "2024-03-11", "present_user_ids": ["m1", "m2"]},
            {"event_id": "r1", "occurrence_date": "2024-03-04", "present_user_ids": []}
        ],
        "profiles": [
            {"id": "m2", "club_id": "club", "role": "player", "last_name": "Young"},
            {"id": "m1", "club_id": "club", "role": "player", "last_name": "Adams"},
            {"id": "c1", "club_id": "club", "role": "head_coach", "last_name": "Miller"},
            {"id": "x1", "club_id": "club", "role": "admin", "last_name": "Root"}
        ]
    }"#;

    fn store() -> SnapshotStore {
        SnapshotStore::new(serde_json::from_str(SNAPSHOT).unwrap())
    }

    fn march() -> DateWindow {
        DateWindow::month(2024, 3).unwrap()
    }

    fn ids(rows: &[EventRow]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_event_queries() {
        let store = store();
        let club = ClubId::from("club");
        let single = store.single_events(&club, &march()).await.unwrap();
        assert_eq!(ids(&single), vec!["e1", "e2"]);

        let recurring = store.recurring_events(&club, &march()).await.unwrap();
        assert_eq!(ids(&recurring), vec!["r1"]);

        assert_eq!(store.events(&club).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_attendance_newest_first() {
        let store = store();
        let rows = store
            .event_attendance(&[EventId::from("r1")], Some(1))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].occurrence_date.as_deref(), Some("2024-03-11"));
    }

    #[tokio::test]
    async fn test_profiles_by_role() {
        let store = store();
        let club = ClubId::from("club");
        let members = store.members(&club).await.unwrap();
        let member_ids = members.iter().map(|m| m.id.as_str()).collect::<Vec<_>>();
        assert_eq!(member_ids, vec!["m1", "m2"]);
        let coaches = store.coaches(&club).await.unwrap();
        assert_eq!(coaches.len(), 1);
        assert_eq!(coaches[0].id, "c1");
    }
}
