//! Test doubles for the injected cache dependencies
//!
//! The cache takes its HTTP client and clock by injection precisely so the
//! suite can script remote behavior and time per test case.

use crate::cache::Clock;
use crate::errors::SpamScreenResult;
use crate::fetch::{ HttpFetch, HttpResponse };
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{ AtomicI64, Ordering };
use std::sync::Mutex;
use std::time::Duration;

/// Scripted HTTP fetcher with per-URL call counting
pub struct MockHttp {
    responses: Mutex<HashMap<String, HttpResponse>>,
    calls: Mutex<HashMap<String, u64>>,
    delay: Mutex<Option<Duration>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            delay: Mutex::new(None),
        }
    }

    /// Script a 200 response for `url`
    pub fn ok(&self, url: &str, body: &str) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            HttpResponse {
                status: 200,
                body: body.to_string(),
            },
        );
    }

    /// Script a bare status response for `url`
    pub fn status(&self, url: &str, status: u16) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            HttpResponse {
                status,
                body: String::new(),
            },
        );
    }

    /// Make every request suspend, so in-flight overlap is observable
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls_for(&self, url: &str) -> u64 {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u64 {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl HttpFetch for MockHttp {
    async fn get(&self, url: &str) -> SpamScreenResult<HttpResponse> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.responses.lock().unwrap().get(url).cloned();
        Ok(scripted.unwrap_or(HttpResponse {
            status: 404,
            body: String::new(),
        }))
    }
}

/// Valid list body with `count` well-formed entries
pub fn list_body(chain_id: &str, count: usize) -> String {
    let entries: Vec<String> = (0..count)
        .map(|i| format!("\"{}/0x{:040x}/{}\"", chain_id, 0xa000 + i, i))
        .collect();
    format!("[{}]", entries.join(","))
}

/// Manually advanced clock
pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
