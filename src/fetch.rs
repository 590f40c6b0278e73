//! Remote list fetching
//!
//! `HttpFetch` is the seam between the cache and the host HTTP client; the
//! production implementation wraps `reqwest`. `RawListFetcher` sits on top
//! and owns the raw-content cache: once a list body has been fetched for a
//! URL it is reused for the life of the process (see DESIGN.md).

use crate::errors::{ SpamScreenError, SpamScreenResult };
use crate::logger::{ self, LogTag };
use anyhow::{ Context, Result };
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::{ Arc, RwLock };
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";
const FALLBACK_CDN_HOST: &str = "cdn.jsdelivr.net";

/// Minimal HTTP response surface the cache needs
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP-fetch capability injected by the host environment
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> SpamScreenResult<HttpResponse>;
}

/// Production fetcher backed by reqwest
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent("SpamScreener/1.0")
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("SpamScreener/1.0")
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get(&self, url: &str) -> SpamScreenResult<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SpamScreenError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SpamScreenError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(HttpResponse { status, body })
    }
}

/// Raw-content cache statistics
#[derive(Debug, Clone, Default)]
pub struct RawCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Fetches remote spam lists with a process-lifetime raw-content cache
pub struct RawListFetcher {
    http: Arc<dyn HttpFetch>,
    raw_cache: RwLock<HashMap<String, String>>,
    production: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RawListFetcher {
    pub fn new(http: Arc<dyn HttpFetch>, production: bool) -> Self {
        Self {
            http,
            raw_cache: RwLock::new(HashMap::new()),
            production,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fetch the raw list body for `url`, serving from the raw-content cache
    /// when possible.
    ///
    /// On a primary failure, and only in production deployments, a single
    /// fallback request is made against the CDN rewrite of the same resource.
    /// When both fail, the primary error is the one propagated.
    pub async fn fetch_raw(&self, url: &str) -> SpamScreenResult<String> {
        if let Some(text) = self.raw_cache.read().unwrap().get(url) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(text.clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let text = match self.fetch_text(url).await {
            Ok(text) => text,
            Err(primary_err) => {
                if !self.production {
                    return Err(primary_err);
                }
                let Some(fallback) = api_fallback_url(url) else {
                    return Err(primary_err);
                };
                logger::warning(
                    LogTag::Fetch,
                    &format!("Primary fetch failed ({}), trying fallback {}", primary_err, fallback),
                );
                match self.fetch_text(&fallback).await {
                    Ok(text) => text,
                    // the primary error carries the root cause
                    Err(_) => return Err(primary_err),
                }
            }
        };

        self.raw_cache
            .write()
            .unwrap()
            .insert(url.to_string(), text.clone());
        Ok(text)
    }

    async fn fetch_text(&self, url: &str) -> SpamScreenResult<String> {
        let response = self.http.get(url).await?;
        if !(200..300).contains(&response.status) {
            return Err(SpamScreenError::HttpStatus {
                status: response.status,
                url: url.to_string(),
            });
        }
        Ok(response.body)
    }

    pub fn stats(&self) -> RawCacheStats {
        RawCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.raw_cache.read().unwrap().len(),
        }
    }
}

/// Deterministic rewrite of a raw-content URL onto the CDN host
///
/// `https://raw.githubusercontent.com/{owner}/{repo}/{ref}/{path}` becomes
/// `https://cdn.jsdelivr.net/gh/{owner}/{repo}@{ref}/{path}`. Returns `None`
/// for URLs that are not raw-content shaped.
pub fn api_fallback_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if parsed.host_str()? != RAW_CONTENT_HOST {
        return None;
    }
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    if segments.len() < 4 {
        return None;
    }
    Some(format!(
        "https://{}/gh/{}/{}@{}/{}",
        FALLBACK_CDN_HOST,
        segments[0],
        segments[1],
        segments[2],
        segments[3..].join("/")
    ))
}
