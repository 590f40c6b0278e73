/// Static catalog of supported networks
///
/// One descriptor per supported chain, fixed at compile time. The key is the
/// stable internal identifier; the chain id is the public-facing short id
/// clients query with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub chain_id: &'static str,
    pub list_url: &'static str,
}

pub const NETWORKS: &[NetworkDescriptor] = &[
    NetworkDescriptor {
        key: "ethereum",
        name: "Ethereum",
        chain_id: "1",
        list_url: "https://raw.githubusercontent.com/spamscreener/spam-lists/main/lists/ethereum.json",
    },
    NetworkDescriptor {
        key: "bsc",
        name: "BNB Smart Chain",
        chain_id: "56",
        list_url: "https://raw.githubusercontent.com/spamscreener/spam-lists/main/lists/bsc.json",
    },
    NetworkDescriptor {
        key: "polygon",
        name: "Polygon",
        chain_id: "137",
        list_url: "https://raw.githubusercontent.com/spamscreener/spam-lists/main/lists/polygon.json",
    },
    NetworkDescriptor {
        key: "arbitrum",
        name: "Arbitrum One",
        chain_id: "42161",
        list_url: "https://raw.githubusercontent.com/spamscreener/spam-lists/main/lists/arbitrum.json",
    },
    NetworkDescriptor {
        key: "optimism",
        name: "Optimism",
        chain_id: "10",
        list_url: "https://raw.githubusercontent.com/spamscreener/spam-lists/main/lists/optimism.json",
    },
    NetworkDescriptor {
        key: "avalanche",
        name: "Avalanche C-Chain",
        chain_id: "43114",
        list_url: "https://raw.githubusercontent.com/spamscreener/spam-lists/main/lists/avalanche.json",
    },
];

/// Networks the default query mode draws from first
pub const MAJOR_NETWORK_KEYS: [&str; 3] = ["ethereum", "bsc", "polygon"];

pub fn all() -> &'static [NetworkDescriptor] {
    NETWORKS
}

pub fn by_key(key: &str) -> Option<&'static NetworkDescriptor> {
    NETWORKS.iter().find(|n| n.key == key)
}

pub fn by_chain_id(chain_id: &str) -> Option<&'static NetworkDescriptor> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}
