use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use parking_lot::RwLock;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to.
pub struct FixedClock {
    now: RwLock<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        FixedClock {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.read()
    }
}

struct CacheEntry<T> {
    stored_at: DateTime<Local>,
    value: Arc<T>,
}

/// A single value that expires `ttl` after it was stored.
pub struct TtlCache<T> {
    ttl: Duration,
    inner: RwLock<Option<CacheEntry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            inner: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn set_value(&self, value: T, now: DateTime<Local>) -> Arc<T> {
        let value = Arc::new(value);
        *self.inner.write() = Some(CacheEntry {
            stored_at: now,
            value: value.clone(),
        });
        value
    }

    pub fn get_value(&self, now: DateTime<Local>) -> Option<Arc<T>> {
        let entry = self.inner.read();
        let entry = entry.as_ref()?;
        if now - entry.stored_at < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn invalidate(&self) {
        self.inner.write().take();
    }
}
