pub mod convert;
pub mod mongo;
pub mod rows;
pub mod snapshot;

use async_trait::async_trait;
use eyre::Result;
use model::{
    ids::{ClubId, EventId, SubgroupId},
    window::DateWindow,
};
use rows::{
    ClubRow, EventAttendanceRow, EventRow, ProfileRow, SessionAttendanceRow, SessionRow,
    SubgroupRow,
};

pub use mongo::MongoStore;
pub use snapshot::{Snapshot, SnapshotStore};

/// Read side of the club database.
///
/// Every method is an independent query; callers are free to run them concurrently.
/// Subgroup arguments restrict the result to one subgroup when set.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    async fn clubs(&self) -> Result<Vec<ClubRow>>;

    async fn subgroups(&self, club: &ClubId) -> Result<Vec<SubgroupRow>>;

    /// Non-cancelled training sessions dated inside `window`, by date.
    async fn sessions(
        &self,
        club: &ClubId,
        window: &DateWindow,
        subgroup: Option<&SubgroupId>,
    ) -> Result<Vec<SessionRow>>;

    /// Non-cancelled single events starting inside `window`, by start date.
    async fn single_events(&self, club: &ClubId, window: &DateWindow) -> Result<Vec<EventRow>>;

    /// Non-cancelled recurring events that may repeat inside `window`. Their start
    /// date may lie before the window.
    async fn recurring_events(&self, club: &ClubId, window: &DateWindow)
        -> Result<Vec<EventRow>>;

    /// Every event of the club, cancelled ones included.
    async fn events(&self, club: &ClubId) -> Result<Vec<EventRow>>;

    /// Attendance of the given events, newest first.
    async fn event_attendance(
        &self,
        event_ids: &[EventId],
        limit: Option<usize>,
    ) -> Result<Vec<EventAttendanceRow>>;

    /// Legacy session attendance dated inside `window`.
    async fn session_attendance(
        &self,
        club: &ClubId,
        window: &DateWindow,
        subgroup: Option<&SubgroupId>,
    ) -> Result<Vec<SessionAttendanceRow>>;

    /// Player profiles by last name.
    async fn members(&self, club: &ClubId) -> Result<Vec<ProfileRow>>;

    /// Coach and head coach profiles by last name.
    async fn coaches(&self, club: &ClubId) -> Result<Vec<ProfileRow>>;
}
