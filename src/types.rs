use serde::{ Deserialize, Serialize };

/// A normalized spam token entry
///
/// `address` is always lower-case and `timestamp` is always present so that
/// recency sorting never fails. Timestamps are synthesized at parse time when
/// the source list carries none; treat them as approximate recency, not as
/// ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamTokenRecord {
    pub address: String,

    /// Internal catalog key ("ethereum", "bsc", ...); not part of the wire shape
    #[serde(skip)]
    pub network_key: String,

    /// Public-facing short chain id ("1", "56", ...)
    #[serde(rename = "networkId")]
    pub network_id: String,

    /// Display name of the network
    pub network: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    /// Milliseconds since epoch
    pub timestamp: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

/// Provenance of a query response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Served from already-cached entries
    Cache,
    /// Fetched on demand for this request
    Fresh,
    /// Best-effort assembly because the recent view was empty
    Generated,
    /// Cached entries topped up with on-demand fetches
    Mixed,
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            SourceTag::Cache => "cache",
            SourceTag::Fresh => "fresh",
            SourceTag::Generated => "generated",
            SourceTag::Mixed => "mixed",
        };
        write!(f, "{}", tag)
    }
}

/// Query service response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub tokens: Vec<SpamTokenRecord>,
    pub source: SourceTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn ok(tokens: Vec<SpamTokenRecord>, source: SourceTag) -> Self {
        Self {
            tokens,
            source,
            error: None,
        }
    }

    pub fn failed(source: SourceTag, message: impl Into<String>) -> Self {
        Self {
            tokens: Vec::new(),
            source,
            error: Some(message.into()),
        }
    }
}

/// Sort newest-first; ties keep their relative order
pub fn sort_by_recency(records: &mut [SpamTokenRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, timestamp: i64) -> SpamTokenRecord {
        SpamTokenRecord {
            address: address.to_string(),
            network_key: "ethereum".to_string(),
            network_id: "1".to_string(),
            network: "Ethereum".to_string(),
            name: None,
            symbol: None,
            timestamp,
            score: Some(42),
        }
    }

    #[test]
    fn sorts_newest_first() {
        let mut records = vec![record("0xa", 10), record("0xb", 30), record("0xc", 20)];
        sort_by_recency(&mut records);
        let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, ["0xb", "0xc", "0xa"]);
    }

    #[test]
    fn serializes_wire_shape() {
        let json = serde_json::to_value(record("0xabc", 1234)).unwrap();
        assert_eq!(json["address"], "0xabc");
        assert_eq!(json["networkId"], "1");
        assert_eq!(json["network"], "Ethereum");
        assert_eq!(json["timestamp"], 1234);
        assert_eq!(json["score"], 42);
        // skipped internals and empty optionals never serialize
        assert!(json.get("network_key").is_none());
        assert!(json.get("name").is_none());
        assert!(json.get("symbol").is_none());
    }

    #[test]
    fn source_tags_serialize_lowercase() {
        assert_eq!(serde_json::to_value(SourceTag::Mixed).unwrap(), "mixed");
        assert_eq!(SourceTag::Generated.to_string(), "generated");
    }
}
