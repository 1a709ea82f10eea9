use std::{env::var, sync::Arc, time::Duration};

use dotenv::dotenv;
use eyre::{bail, Context, Error};
use log::debug;

const DEFAULT_MONGO_DB: &str = "club_db";
const DEFAULT_RUST_LOG: &str = "info";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Clone)]
pub struct Env(Arc<EnvInner>);

#[derive(Clone)]
pub struct EnvInner {
    snapshot_path: Option<String>,
    mongo_url: Option<String>,
    mongo_db: String,
    rust_log: String,
    reference_cache_ttl: Duration,
}

impl Env {
    pub fn snapshot_path(&self) -> Option<&str> {
        self.0.snapshot_path.as_deref()
    }

    pub fn mongo_url(&self) -> Option<&str> {
        self.0.mongo_url.as_deref()
    }

    pub fn mongo_db(&self) -> &str {
        &self.0.mongo_db
    }

    pub fn rust_log(&self) -> &str {
        &self.0.rust_log
    }

    pub fn reference_cache_ttl(&self) -> Duration {
        self.0.reference_cache_ttl
    }

    pub fn load() -> Result<Env, Error> {
        if dotenv().is_err() {
            debug!(".env file not found");
        }
        Env::from_lookup(|name| var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Env, Error> {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let snapshot_path = value("SNAPSHOT_PATH");
        let mongo_url = value("MONGO_URL");
        if snapshot_path.is_none() && mongo_url.is_none() {
            bail!("Neither SNAPSHOT_PATH nor MONGO_URL is set");
        }
        let ttl_secs = match value("REFERENCE_CACHE_TTL_SECS") {
            Some(ttl) => ttl
                .trim()
                .parse::<u64>()
                .context("REFERENCE_CACHE_TTL_SECS is not a number of seconds")?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Env(Arc::new(EnvInner {
            snapshot_path,
            mongo_url,
            mongo_db: value("MONGO_DB").unwrap_or_else(|| DEFAULT_MONGO_DB.to_owned()),
            rust_log: value("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.to_owned()),
            reference_cache_ttl: Duration::from_secs(ttl_secs),
        })))
    }
}
