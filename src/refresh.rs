//! Refresh orchestration
//!
//! Drives fetch+parse into the store for every catalog network. Two rules
//! hold the design together:
//!
//! 1. Single-flight: concurrent refresh triggers attach to the in-progress
//!    cycle instead of fanning out duplicate fetches. The in-flight handle
//!    is a shared future; observing-or-creating it happens under a mutex
//!    with no await point in between.
//! 2. Failure isolation: one network's failed fetch leaves that network's
//!    existing entry untouched and never blocks the rest of the cycle.

use crate::cache::SpamTokenCache;
use crate::logger::{ self, LogTag };
use crate::networks::{ self, NetworkDescriptor };
use crate::parser;
use futures::future::{ BoxFuture, Shared };
use futures::FutureExt;
use std::sync::Arc;

pub(crate) type InFlightRefresh = Shared<BoxFuture<'static, ()>>;

impl SpamTokenCache {
    /// Refresh when the cache is cold or older than the TTL
    pub async fn refresh_if_stale(self: &Arc<Self>) {
        let last = self.last_refresh_at();
        if last != 0 && self.clock.now_ms() - last <= self.config.ttl_ms() {
            return;
        }
        self.refresh().await;
    }

    /// Spawn the staleness check without blocking the caller
    pub fn trigger_refresh(self: &Arc<Self>) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            cache.refresh_if_stale().await;
        });
    }

    /// Run a full refresh cycle, attaching to an in-progress one if any
    pub async fn refresh(self: &Arc<Self>) {
        let handle = {
            // observe-or-create must not suspend between the check and the
            // write, so it all happens under this lock
            let mut slot = self.in_flight.lock().unwrap();
            match slot.as_ref() {
                Some(handle) => handle.clone(),
                None => {
                    let cache = Arc::clone(self);
                    let handle: InFlightRefresh = async move {
                        cache.run_refresh_cycle().await;
                        *cache.in_flight.lock().unwrap() = None;
                    }
                    .boxed()
                    .shared();
                    *slot = Some(handle.clone());
                    handle
                }
            }
        };
        handle.await;
    }

    async fn run_refresh_cycle(&self) {
        let catalog = networks::all();
        logger::info(
            LogTag::Refresh,
            &format!("Refreshing spam lists for {} networks", catalog.len()),
        );

        let tasks = catalog.iter().map(|network| self.refresh_network(network));
        let results = futures::future::join_all(tasks).await;
        let refreshed = results.iter().filter(|ok| **ok).count();

        // the cycle completes even when every network failed; staleness
        // arithmetic and the recent view both key off completion time
        {
            let mut store = self.store.write().unwrap();
            store.touch_refresh(self.clock.now_ms());
            store.rebuild_recent(self.config.recent_cap);
        }

        logger::info(
            LogTag::Refresh,
            &format!("Refresh cycle complete: {}/{} networks", refreshed, catalog.len()),
        );
    }

    async fn refresh_network(&self, network: &NetworkDescriptor) -> bool {
        match self.fetcher.fetch_raw(network.list_url).await {
            Ok(raw) => {
                let records = parser::parse_list(
                    &raw,
                    network,
                    self.config.refresh_limit,
                    self.clock.now_ms(),
                );
                logger::debug(
                    LogTag::Refresh,
                    &format!("{}: {} records", network.key, records.len()),
                );
                self.store.write().unwrap().set(network.key, records);
                true
            }
            Err(e) => {
                // existing entry stays as-is; a broken source only degrades
                // its own network's freshness
                logger::warning(
                    LogTag::Refresh,
                    &format!("Refresh failed for {}: {}", network.key, e),
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SpamTokenCache;
    use crate::config::CacheConfig;
    use crate::testutil::{ list_body, FixedClock, MockHttp };
    use std::time::Duration;

    fn cache_with(http: Arc<MockHttp>, clock: Arc<FixedClock>) -> Arc<SpamTokenCache> {
        SpamTokenCache::new(CacheConfig::default(), http, clock)
    }

    #[tokio::test]
    async fn refresh_populates_all_networks_and_recent_view() {
        let http = Arc::new(MockHttp::new());
        for network in networks::all() {
            http.ok(network.list_url, &list_body(network.chain_id, 3));
        }
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let cache = cache_with(http, clock.clone());

        cache.refresh().await;

        for network in networks::all() {
            let store = cache.store.read().unwrap();
            assert_eq!(store.get(network.key).len(), 3);
        }
        let store = cache.store.read().unwrap();
        assert_eq!(store.recent().len(), 18); // 6 networks x 3 records, under the cap
        assert_eq!(store.last_refresh_at(), 1_700_000_000_000);
    }

    #[tokio::test]
    async fn concurrent_triggers_share_one_cycle() {
        let http = Arc::new(MockHttp::new());
        for network in networks::all() {
            http.ok(network.list_url, &list_body(network.chain_id, 2));
        }
        // keep the first cycle in flight long enough for the second trigger
        http.set_delay(Duration::from_millis(50));
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let cache = cache_with(http.clone(), clock);

        tokio::join!(cache.refresh(), cache.refresh(), cache.refresh_if_stale());

        for network in networks::all() {
            assert_eq!(http.calls_for(network.list_url), 1, "{} fetched more than once", network.key);
        }
    }

    #[tokio::test]
    async fn failed_network_is_isolated() {
        let http = Arc::new(MockHttp::new());
        let beta = networks::by_key("bsc").unwrap();
        let gamma = networks::by_key("polygon").unwrap();
        for network in networks::all() {
            if network.key == beta.key {
                http.status(network.list_url, 500);
            } else {
                http.ok(network.list_url, &list_body(network.chain_id, 2));
            }
        }
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let cache = cache_with(http, clock);

        cache.refresh().await;

        let store = cache.store.read().unwrap();
        assert!(store.get(beta.key).is_empty());
        assert_eq!(store.get(gamma.key).len(), 2);
        // recent view only carries networks that actually refreshed
        assert!(store.recent().iter().all(|r| r.network_key != beta.key));
        assert!(store.recent().iter().any(|r| r.network_key == gamma.key));
        // the cycle still completed
        assert_eq!(store.last_refresh_at(), 1_700_000_000_000);
    }

    #[tokio::test]
    async fn refresh_if_stale_respects_ttl() {
        let http = Arc::new(MockHttp::new());
        for network in networks::all() {
            http.ok(network.list_url, &list_body(network.chain_id, 1));
        }
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let cache = SpamTokenCache::new(
            CacheConfig::with_ttl(Duration::from_millis(3_600_000)),
            http.clone(),
            clock.clone(),
        );

        cache.refresh_if_stale().await; // cold start refreshes
        let first_calls: u64 = networks::all().iter().map(|n| http.calls_for(n.list_url)).sum();
        assert_eq!(first_calls, networks::all().len() as u64);

        clock.advance(1_000);
        cache.refresh_if_stale().await; // within TTL, no-op
        let second_calls: u64 = networks::all().iter().map(|n| http.calls_for(n.list_url)).sum();
        assert_eq!(second_calls, first_calls);

        clock.advance(3_600_001);
        cache.refresh_if_stale().await; // stale again; raw cache absorbs the fetches
        let store = cache.store.read().unwrap();
        assert_eq!(store.last_refresh_at(), 1_700_000_000_000 + 1_000 + 3_600_001);
    }
}
