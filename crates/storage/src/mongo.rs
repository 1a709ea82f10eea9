use std::ops::Deref;

use async_trait::async_trait;
use bson::{doc, Document};
use eyre::{Context as _, Error, Result};
use futures_util::TryStreamExt as _;
use log::info;
use model::{
    ids::{ClubId, EventId, SubgroupId},
    window::DateWindow,
};
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;

use crate::{
    rows::{
        ClubRow, EventAttendanceRow, EventRow, ProfileRow, SessionAttendanceRow, SessionRow,
        SubgroupRow, COACH_ROLES, MEMBER_ROLE,
    },
    AttendanceSource,
};

const CLUBS: &str = "clubs";
const SUBGROUPS: &str = "subgroups";
const SESSIONS: &str = "training_sessions";
const EVENTS: &str = "events";
const EVENT_ATTENDANCE: &str = "event_attendance";
const ATTENDANCE: &str = "attendance";
const PROFILES: &str = "profiles";

#[derive(Clone)]
pub struct Db {
    _client: Client,
    db: Database,
}

impl Db {
    pub(crate) async fn new(uri: &str, db_name: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 })
            .await
            .context("Failed to ping MongoDB")?;
        Ok(Db {
            _client: client,
            db,
        })
    }
}

impl Deref for Db {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// [`AttendanceSource`] over MongoDB collections that mirror the club tables.
/// Dates are stored as `YYYY-MM-DD` strings, so range filters compare lexically.
#[derive(Clone)]
pub struct MongoStore {
    db: Db,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let db = Db::new(uri, db_name).await?;
        info!("Reading club data from MongoDB database {}", db.name());
        Ok(MongoStore { db })
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    async fn find<T>(&self, name: &str, filter: Document, sort: Option<Document>) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        let collection = self.collection::<T>(name);
        let cursor = match sort {
            Some(sort) => collection.find(filter).sort(sort).await,
            None => collection.find(filter).await,
        }
        .with_context(|| format!("Failed to query {}", name))?;
        Ok(cursor.try_collect().await?)
    }
}

fn active() -> Document {
    doc! { "cancelled": { "$ne": true } }
}

fn date_range(field: &str, window: &DateWindow) -> Document {
    doc! {
        field: {
            "$gte": window.start().to_string(),
            "$lte": window.end().to_string(),
        }
    }
}

fn with_subgroup(mut filter: Document, subgroup: Option<&SubgroupId>) -> Document {
    if let Some(subgroup) = subgroup {
        filter.insert("subgroup_id", subgroup.as_str());
    }
    filter
}

#[async_trait]
impl AttendanceSource for MongoStore {
    async fn clubs(&self) -> Result<Vec<ClubRow>> {
        self.find(CLUBS, doc! {}, None).await
    }

    async fn subgroups(&self, club: &ClubId) -> Result<Vec<SubgroupRow>> {
        self.find(SUBGROUPS, doc! { "club_id": club.as_str() }, None)
            .await
    }

    async fn sessions(
        &self,
        club: &ClubId,
        window: &DateWindow,
        subgroup: Option<&SubgroupId>,
    ) -> Result<Vec<SessionRow>> {
        let filter = doc! {
            "$and": [
                { "club_id": club.as_str() },
                active(),
                date_range("date", window),
            ]
        };
        self.find(
            SESSIONS,
            with_subgroup(filter, subgroup),
            Some(doc! { "date": 1 }),
        )
        .await
    }

    async fn single_events(&self, club: &ClubId, window: &DateWindow) -> Result<Vec<EventRow>> {
        let filter = doc! {
            "$and": [
                { "club_id": club.as_str() },
                active(),
                { "$or": [ { "event_type": "single" }, { "event_type": null } ] },
                date_range("start_date", window),
            ]
        };
        self.find(EVENTS, filter, Some(doc! { "start_date": 1 }))
            .await
    }

    async fn recurring_events(
        &self,
        club: &ClubId,
        window: &DateWindow,
    ) -> Result<Vec<EventRow>> {
        let filter = doc! {
            "$and": [
                { "club_id": club.as_str() },
                active(),
                { "event_type": "recurring" },
                { "start_date": { "$lte": window.end().to_string() } },
                { "$or": [
                    { "repeat_end_date": { "$gte": window.start().to_string() } },
                    { "repeat_end_date": null },
                ] },
            ]
        };
        self.find(EVENTS, filter, None).await
    }

    async fn events(&self, club: &ClubId) -> Result<Vec<EventRow>> {
        self.find(EVENTS, doc! { "club_id": club.as_str() }, None)
            .await
    }

    async fn event_attendance(
        &self,
        event_ids: &[EventId],
        limit: Option<usize>,
    ) -> Result<Vec<EventAttendanceRow>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = event_ids
            .iter()
            .map(|id| id.as_str().to_owned())
            .collect::<Vec<_>>();
        let collection = self.collection::<EventAttendanceRow>(EVENT_ATTENDANCE);
        let find = collection
            .find(doc! { "event_id": { "$in": ids } })
            .sort(doc! { "occurrence_date": -1, "created_at": -1 });
        let cursor = match limit {
            Some(limit) => find.limit(limit as i64).await,
            None => find.await,
        }
        .context("Failed to query event attendance")?;
        Ok(cursor.try_collect().await?)
    }

    async fn session_attendance(
        &self,
        club: &ClubId,
        window: &DateWindow,
        subgroup: Option<&SubgroupId>,
    ) -> Result<Vec<SessionAttendanceRow>> {
        let filter = doc! {
            "$and": [
                { "club_id": club.as_str() },
                date_range("date", window),
            ]
        };
        self.find(
            ATTENDANCE,
            with_subgroup(filter, subgroup),
            Some(doc! { "date": 1 }),
        )
        .await
    }

    async fn members(&self, club: &ClubId) -> Result<Vec<ProfileRow>> {
        self.find(
            PROFILES,
            doc! { "club_id": club.as_str(), "role": MEMBER_ROLE },
            Some(doc! { "last_name": 1 }),
        )
        .await
    }

    async fn coaches(&self, club: &ClubId) -> Result<Vec<ProfileRow>> {
        self.find(
            PROFILES,
            doc! { "club_id": club.as_str(), "role": { "$in": COACH_ROLES.to_vec() } },
            Some(doc! { "last_name": 1 }),
        )
        .await
    }
}
