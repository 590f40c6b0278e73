//! Spam list parsing
//!
//! Source lists are JSON arrays of `chainId/address/score` strings. Parsing
//! never fails: structurally broken content yields an empty list and
//! malformed entries are dropped, because the list publisher occasionally
//! ships garbage and one bad entry must not poison a network's cache.

use crate::logger::{ self, LogTag };
use crate::networks::NetworkDescriptor;
use crate::types::{ sort_by_recency, SpamTokenRecord };
use rand::Rng;

const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;
const THIRTY_DAYS_MS: i64 = 30 * ONE_DAY_MS;
const NAME_PREFIX_LEN: usize = 8;
const ENTRY_PARTS: usize = 3; // chainId/address/score

/// Parse a raw list body into normalized records for one network
///
/// Takes at most `limit` entries in source order, then normalizes each valid
/// one: lower-cased address, integer score (non-numeric becomes absent, not
/// zero), synthesized display name, synthesized recency timestamp. The result
/// is sorted newest-first.
///
/// The source format carries no recency signal, so each record gets a
/// pseudo-random timestamp strictly between 30 days and 1 day before
/// `now_ms` - old enough to not look brand new, recent enough to rank.
pub fn parse_list(
    raw: &str,
    network: &NetworkDescriptor,
    limit: usize,
    now_ms: i64,
) -> Vec<SpamTokenRecord> {
    let entries: Vec<String> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            logger::warning(
                LogTag::Parse,
                &format!("Unparseable list content for {}: {}", network.key, e),
            );
            return Vec::new();
        }
    };

    let mut rng = rand::thread_rng();
    let mut dropped = 0usize;
    let mut records: Vec<SpamTokenRecord> = Vec::new();

    for entry in entries.iter().take(limit) {
        let parts: Vec<&str> = entry.split('/').collect();
        if parts.len() != ENTRY_PARTS {
            dropped += 1;
            continue;
        }

        let address = parts[1].to_lowercase();
        let score = parts[2].parse::<i64>().ok();
        let age_offset = rng.gen_range(ONE_DAY_MS + 1..THIRTY_DAYS_MS);

        records.push(SpamTokenRecord {
            name: Some(synthesized_name(&address)),
            symbol: None,
            network_key: network.key.to_string(),
            network_id: network.chain_id.to_string(),
            network: network.name.to_string(),
            timestamp: now_ms - age_offset,
            address,
            score,
        });
    }

    if dropped > 0 {
        logger::debug(
            LogTag::Parse,
            &format!("Dropped {} malformed entries for {}", dropped, network.key),
        );
    }

    sort_by_recency(&mut records);
    records
}

fn synthesized_name(address: &str) -> String {
    let prefix: String = address.chars().take(NAME_PREFIX_LEN).collect();
    format!("Spam token {}", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks;

    fn ethereum() -> &'static NetworkDescriptor {
        networks::by_key("ethereum").unwrap()
    }

    const NOW_MS: i64 = 1_700_000_000_000;

    #[test]
    fn parses_three_part_entries() {
        let raw = r#"["99/0xABCDEF1234567890aBcDeF1234567890AbCdEf12/50", "99/0xdef4567890abcdef4567890abcdef4567890abcd/10"]"#;
        let records = parse_list(raw, ethereum(), 10, NOW_MS);

        assert_eq!(records.len(), 2);
        let mut addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
        addresses.sort();
        assert_eq!(
            addresses,
            [
                "0xabcdef1234567890abcdef1234567890abcdef12",
                "0xdef4567890abcdef4567890abcdef4567890abcd",
            ]
        );
        let mut scores: Vec<i64> = records.iter().map(|r| r.score.unwrap()).collect();
        scores.sort();
        assert_eq!(scores, [10, 50]);
        // sorted by synthesized timestamp descending
        assert!(records[0].timestamp >= records[1].timestamp);
    }

    #[test]
    fn drops_entries_with_wrong_part_count() {
        let raw = r#"["1/0xaa", "1/0xbb/7/extra", "1/0xcc12345678/3"]"#;
        let records = parse_list(raw, ethereum(), 10, NOW_MS);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, "0xcc12345678");
    }

    #[test]
    fn all_malformed_parses_to_empty_not_error() {
        let raw = r#"["1/0xaa", "1/0xbb"]"#;
        assert!(parse_list(raw, ethereum(), 10, NOW_MS).is_empty());
    }

    #[test]
    fn unparseable_content_yields_empty() {
        assert!(parse_list("not json at all", ethereum(), 10, NOW_MS).is_empty());
        assert!(parse_list("{\"a\": 1}", ethereum(), 10, NOW_MS).is_empty());
    }

    #[test]
    fn respects_limit_in_source_order() {
        let raw = r#"["1/0xaa1/1", "1/0xaa2/2", "1/0xaa3/3", "1/0xaa4/4"]"#;
        let records = parse_list(raw, ethereum(), 2, NOW_MS);
        assert_eq!(records.len(), 2);
        let mut addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
        addresses.sort();
        assert_eq!(addresses, ["0xaa1", "0xaa2"]);
    }

    #[test]
    fn non_numeric_score_becomes_absent() {
        let raw = r#"["1/0xaa/high"]"#;
        let records = parse_list(raw, ethereum(), 10, NOW_MS);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].score, None);
    }

    #[test]
    fn synthesized_timestamps_sit_inside_window() {
        let raw = r#"["1/0xaa/1", "1/0xbb/2", "1/0xcc/3", "1/0xdd/4", "1/0xee/5"]"#;
        for record in parse_list(raw, ethereum(), 10, NOW_MS) {
            assert!(record.timestamp > NOW_MS - THIRTY_DAYS_MS);
            assert!(record.timestamp < NOW_MS - ONE_DAY_MS);
        }
    }

    #[test]
    fn reparsing_is_idempotent_on_address_score_pairs() {
        let raw = r#"["1/0xAA/5", "1/0xBB/nope", "1/0xCC/12"]"#;
        let pairs = |records: Vec<SpamTokenRecord>| {
            let mut p: Vec<(String, Option<i64>)> =
                records.into_iter().map(|r| (r.address, r.score)).collect();
            p.sort();
            p
        };
        let first = pairs(parse_list(raw, ethereum(), 10, NOW_MS));
        let second = pairs(parse_list(raw, ethereum(), 10, NOW_MS));
        assert_eq!(first, second);
    }

    #[test]
    fn records_carry_network_identity_and_name() {
        let raw = r#"["1/0xAbCdEf001122/5"]"#;
        let records = parse_list(raw, ethereum(), 10, NOW_MS);
        let record = &records[0];
        assert_eq!(record.network_key, "ethereum");
        assert_eq!(record.network_id, "1");
        assert_eq!(record.network, "Ethereum");
        assert_eq!(record.name.as_deref(), Some("Spam token 0xabcdef"));
        assert_eq!(record.symbol, None);
    }
}
