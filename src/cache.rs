//! The cache object
//!
//! `SpamTokenCache` is the explicitly constructed root of the subsystem:
//! store, fetcher, config and clock live here, injected so a test suite can
//! build a fresh arena per case instead of leaning on process-wide globals.
//! The refresh orchestration lives in `refresh`, the query modes in `query`.

use crate::config::CacheConfig;
use crate::fetch::{ HttpFetch, RawCacheStats, RawListFetcher, ReqwestFetch };
use crate::refresh::InFlightRefresh;
use crate::store::TokenStore;
use anyhow::Result;
use chrono::Utc;
use std::sync::{ Arc, Mutex, RwLock };

/// Injected wall clock, in milliseconds since epoch
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Production clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

pub struct SpamTokenCache {
    pub(crate) config: CacheConfig,
    pub(crate) fetcher: RawListFetcher,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) store: RwLock<TokenStore>,
    pub(crate) in_flight: Mutex<Option<InFlightRefresh>>,
}

impl SpamTokenCache {
    /// Build a cache with injected dependencies
    pub fn new(config: CacheConfig, http: Arc<dyn HttpFetch>, clock: Arc<dyn Clock>) -> Arc<Self> {
        let production = config.production;
        Arc::new(Self {
            config,
            fetcher: RawListFetcher::new(http, production),
            clock,
            store: RwLock::new(TokenStore::new()),
            in_flight: Mutex::new(None),
        })
    }

    /// Production wiring: reqwest client, system clock, env-aware config
    pub fn with_defaults() -> Result<Arc<Self>> {
        let http = Arc::new(ReqwestFetch::new()?);
        Ok(Self::new(CacheConfig::from_env(), http, Arc::new(SystemClock)))
    }

    pub fn last_refresh_at(&self) -> i64 {
        self.store.read().unwrap().last_refresh_at()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().unwrap().is_empty()
    }

    /// Raw-content cache counters, for observability
    pub fn raw_stats(&self) -> RawCacheStats {
        self.fetcher.stats()
    }
}
