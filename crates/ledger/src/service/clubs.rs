use std::sync::Arc;

use eyre::{Context as _, Result};
use log::debug;
use model::{ids::ClubId, roster::Club};
use storage::AttendanceSource;

use super::cache::{Clock, TtlCache};

/// Club listing, cached for the configured TTL.
#[derive(Clone)]
pub struct Clubs {
    source: Arc<dyn AttendanceSource>,
    clock: Arc<dyn Clock>,
    cache: Arc<TtlCache<Vec<Club>>>,
}

impl Clubs {
    pub(crate) fn new(
        source: Arc<dyn AttendanceSource>,
        clock: Arc<dyn Clock>,
        cache: Arc<TtlCache<Vec<Club>>>,
    ) -> Self {
        Clubs {
            source,
            clock,
            cache,
        }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Club>>> {
        if let Some(clubs) = self.cache.get_value(self.clock.now()) {
            return Ok(clubs);
        }
        debug!("Reloading club list");
        let mut clubs = self
            .source
            .clubs()
            .await
            .context("Failed to load clubs")?
            .into_iter()
            .map(Club::from)
            .collect::<Vec<_>>();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(self.cache.set_value(clubs, self.clock.now()))
    }

    pub async fn get(&self, id: &ClubId) -> Result<Option<Club>> {
        Ok(self.list().await?.iter().find(|club| &club.id == id).cloned())
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
