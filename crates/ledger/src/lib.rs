use std::sync::Arc;

use chrono::Duration;
use service::{
    cache::{Clock, TtlCache},
    clubs::Clubs,
    reports::Reports,
    statistics::Statistics,
};
use storage::AttendanceSource;

pub mod aggregator;
pub mod attendance;
pub mod expander;
pub mod service;
pub mod statistics;

#[derive(Clone)]
pub struct Ledger {
    pub reports: Reports,
    pub statistics: Statistics,
    pub clubs: Clubs,
}

impl Ledger {
    pub fn new(
        source: Arc<dyn AttendanceSource>,
        clock: Arc<dyn Clock>,
        cache_ttl: Duration,
    ) -> Self {
        let reports = Reports::new(source.clone());
        let statistics = Statistics::new(source.clone(), clock.clone());
        let clubs = Clubs::new(source, clock, Arc::new(TtlCache::new(cache_ttl)));
        Ledger {
            reports,
            statistics,
            clubs,
        }
    }
}
