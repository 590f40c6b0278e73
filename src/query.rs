//! Query service
//!
//! The only surface external collaborators call. Three modes, each tagging
//! its response with a provenance marker so callers know how fresh the data
//! is without seeing cache internals. Every mode opportunistically kicks the
//! staleness check; only a completely empty store makes the recent/default
//! modes wait for it.

use crate::cache::SpamTokenCache;
use crate::errors::SpamScreenError;
use crate::logger::{ self, LogTag };
use crate::networks::{ self, NetworkDescriptor, MAJOR_NETWORK_KEYS };
use crate::parser;
use crate::types::{ sort_by_recency, QueryResponse, SourceTag, SpamTokenRecord };
use std::sync::Arc;

/// Records drawn per major network in default mode
const MAJOR_PICK: usize = 2;

const ERR_UNSUPPORTED: &str = "Network not supported";
const ERR_LIST_UNAVAILABLE: &str = "Failed to load spam token list";

impl SpamTokenCache {
    /// Spam tokens for one network, identified by its public chain id
    pub async fn query_by_network(self: &Arc<Self>, chain_id: &str) -> QueryResponse {
        let Some(network) = networks::by_chain_id(chain_id) else {
            let err = SpamScreenError::UnsupportedNetwork(chain_id.to_string());
            logger::debug(LogTag::Query, &err.to_string());
            return QueryResponse::failed(SourceTag::Cache, ERR_UNSUPPORTED);
        };

        let cached: Vec<SpamTokenRecord> = {
            let store = self.store.read().unwrap();
            store
                .get(network.key)
                .iter()
                .take(self.config.default_target)
                .cloned()
                .collect()
        };
        if !cached.is_empty() {
            self.trigger_refresh();
            return QueryResponse::ok(cached, SourceTag::Cache);
        }

        // cold for this network: fetch just its list, then let the
        // background refresh catch up on the rest (the raw-content cache
        // keeps it from re-fetching this url)
        let response = match self
            .fetch_network_records(network, self.config.network_query_limit)
            .await
        {
            Some(records) => {
                let top = records.into_iter().take(self.config.default_target).collect();
                QueryResponse::ok(top, SourceTag::Fresh)
            }
            None => QueryResponse::failed(SourceTag::Fresh, ERR_LIST_UNAVAILABLE),
        };
        self.trigger_refresh();
        response
    }

    /// Most recently flagged tokens across all networks
    pub async fn query_recent(self: &Arc<Self>) -> QueryResponse {
        self.ensure_fresh().await;

        let store = self.store.read().unwrap();
        let recent = store.recent();
        if !recent.is_empty() {
            let top = recent.iter().take(self.config.default_target).cloned().collect();
            return QueryResponse::ok(top, SourceTag::Cache);
        }

        // recent view not rebuilt yet: best-effort over whatever entries exist
        let mut merged = store.all_records();
        sort_by_recency(&mut merged);
        merged.truncate(self.config.default_target);
        QueryResponse::ok(merged, SourceTag::Generated)
    }

    /// No selector: a small cross-section of the major networks
    pub async fn query_default(self: &Arc<Self>) -> QueryResponse {
        self.ensure_fresh().await;

        let mut picked: Vec<SpamTokenRecord> = Vec::new();
        let mut missing: Vec<&'static NetworkDescriptor> = Vec::new();
        {
            let store = self.store.read().unwrap();
            for key in MAJOR_NETWORK_KEYS {
                let entry = store.get(key);
                if entry.is_empty() {
                    if let Some(network) = networks::by_key(key) {
                        missing.push(network);
                    }
                } else {
                    picked.extend(entry.iter().take(MAJOR_PICK).cloned());
                }
            }
        }

        if picked.len() >= self.config.default_target {
            sort_by_recency(&mut picked);
            picked.truncate(self.config.default_target);
            return QueryResponse::ok(picked, SourceTag::Cache);
        }

        // top up the missing majors concurrently with a small slice each
        let fetched = futures::future::join_all(
            missing
                .iter()
                .map(|network| self.fetch_network_records(network, self.config.default_mode_limit)),
        )
        .await;
        for records in fetched.into_iter().flatten() {
            picked.extend(records.into_iter().take(MAJOR_PICK));
        }

        sort_by_recency(&mut picked);
        picked.truncate(self.config.default_target);
        QueryResponse::ok(picked, SourceTag::Mixed)
    }

    /// Block on the refresh only when there is nothing at all to serve
    async fn ensure_fresh(self: &Arc<Self>) {
        if self.is_empty() {
            self.refresh_if_stale().await;
        } else {
            self.trigger_refresh();
        }
    }

    /// Fetch+parse one network's list and replace its cache entry.
    /// Returns `None` on fetch failure (the entry is left untouched).
    async fn fetch_network_records(
        &self,
        network: &NetworkDescriptor,
        limit: usize,
    ) -> Option<Vec<SpamTokenRecord>> {
        match self.fetcher.fetch_raw(network.list_url).await {
            Ok(raw) => {
                let records = parser::parse_list(&raw, network, limit, self.clock.now_ms());
                self.store.write().unwrap().set(network.key, records.clone());
                Some(records)
            }
            Err(e) => {
                logger::warning(
                    LogTag::Query,
                    &format!("In-query fetch failed for {}: {}", network.key, e),
                );
                None
            }
        }
    }
}
