//! In-memory token cache store
//!
//! Per-network record lists plus the derived recent view and the cache
//! clock. The store itself is plain data; `SpamTokenCache` wraps it in a
//! lock and owns all concurrency concerns.

use crate::types::{ sort_by_recency, SpamTokenRecord };
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TokenStore {
    entries: HashMap<String, Vec<SpamTokenRecord>>,
    recent: Vec<SpamTokenRecord>,
    last_refresh_ms: i64,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for one network, newest-first; empty when never populated
    pub fn get(&self, network_key: &str) -> &[SpamTokenRecord] {
        self.entries
            .get(network_key)
            .map(|records| records.as_slice())
            .unwrap_or(&[])
    }

    /// Replace a network's entry wholesale
    pub fn set(&mut self, network_key: &str, records: Vec<SpamTokenRecord>) {
        self.entries.insert(network_key.to_string(), records);
    }

    /// The derived global recent view (stale until the next rebuild)
    pub fn recent(&self) -> &[SpamTokenRecord] {
        &self.recent
    }

    /// Rebuild the recent view from every populated entry
    ///
    /// Called once per completed refresh cycle, never per query, so query
    /// latency stays independent of total cached volume.
    pub fn rebuild_recent(&mut self, cap: usize) {
        let mut merged: Vec<SpamTokenRecord> = self
            .entries
            .values()
            .flat_map(|records| records.iter().cloned())
            .collect();
        sort_by_recency(&mut merged);
        merged.truncate(cap);
        self.recent = merged;
    }

    /// True while no network has any cached records
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|records| records.is_empty())
    }

    /// Timestamp of the last completed refresh cycle (0 = never)
    pub fn last_refresh_at(&self) -> i64 {
        self.last_refresh_ms
    }

    /// Advance the cache clock; never moves backwards
    pub fn touch_refresh(&mut self, now_ms: i64) {
        self.last_refresh_ms = self.last_refresh_ms.max(now_ms);
    }

    /// Flattened clone of every cached record, for best-effort assembly
    pub fn all_records(&self) -> Vec<SpamTokenRecord> {
        self.entries
            .values()
            .flat_map(|records| records.iter().cloned())
            .collect()
    }
}
