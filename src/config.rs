/// Cache configuration
///
/// Limits tuned per query mode:
/// - Full refresh pulls the deepest slice of each list (records churn slowly)
/// - On-demand single-network fetches stay smaller to keep query latency low
/// - Default-mode top-up fetches are the smallest, they only plug gaps
use std::env;
use std::time::Duration;

const DEFAULT_TTL: Duration = Duration::from_millis(3_600_000); // 1 hour
const DEFAULT_REFRESH_LIMIT: usize = 100;
const DEFAULT_NETWORK_QUERY_LIMIT: usize = 30;
const DEFAULT_MODE_LIMIT: usize = 10;
const DEFAULT_RECENT_CAP: usize = 20;
const DEFAULT_TARGET_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum age of the token cache before a refresh is triggered
    pub ttl: Duration,

    /// Per-network record cap during a full background refresh
    pub refresh_limit: usize,

    /// Per-network record cap for an on-demand single-network fetch
    pub network_query_limit: usize,

    /// Per-network record cap when the default mode tops up missing majors
    pub default_mode_limit: usize,

    /// Size of the derived recent view
    pub recent_cap: usize,

    /// Number of records a default-mode response aims for
    pub default_target: usize,

    /// Enables the CDN fallback fetch path
    pub production: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            refresh_limit: DEFAULT_REFRESH_LIMIT,
            network_query_limit: DEFAULT_NETWORK_QUERY_LIMIT,
            default_mode_limit: DEFAULT_MODE_LIMIT,
            recent_cap: DEFAULT_RECENT_CAP,
            default_target: DEFAULT_TARGET_SIZE,
            production: false,
        }
    }
}

impl CacheConfig {
    /// Defaults plus deployment context from `SPAMSCREENER_ENV`
    pub fn from_env() -> Self {
        let production = env::var("SPAMSCREENER_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        Self {
            production,
            ..Self::default()
        }
    }

    /// Custom TTL, other knobs at defaults
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl.as_millis() as i64
    }
}
