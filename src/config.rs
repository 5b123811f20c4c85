use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use uuid::Uuid;

use crate::node::PeerSet;

/// Node settings, read from the environment (and `.env`, via `dotenvy`).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Receives the reward for every block this node mines.
    pub miner_address: String,
    pub peers: PeerSet,
    pub peer_timeout: Duration,
    /// Zero disables the background consensus loop.
    pub consensus_interval: Duration,
    /// Mining cycles attempted per `mine_block` call when the tip keeps moving.
    pub mining_retries: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            miner_address: Uuid::new_v4().to_string(),
            peers: PeerSet::new(),
            peer_timeout: Duration::from_secs(5),
            consensus_interval: Duration::ZERO,
            mining_retries: 3,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT", defaults.port),
            miner_address: lookup("MINER_ADDRESS")
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(defaults.miner_address),
            peers: lookup("PEERS")
                .map(|list| list.split(',').collect())
                .unwrap_or(defaults.peers),
            peer_timeout: Duration::from_secs(parsed(
                &lookup,
                "PEER_TIMEOUT_SECS",
                defaults.peer_timeout.as_secs(),
            )),
            consensus_interval: Duration::from_secs(parsed(&lookup, "CONSENSUS_INTERVAL_SECS", 0)),
            mining_retries: parsed(&lookup, "MINING_RETRIES", defaults.mining_retries).max(1),
        }
    }
}

fn parsed<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not a valid value, using the default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> NodeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert!(!cfg.miner_address.is_empty());
        assert!(cfg.peers.is_empty());
        assert_eq!(cfg.peer_timeout, Duration::from_secs(5));
        assert_eq!(cfg.consensus_interval, Duration::ZERO);
        assert_eq!(cfg.mining_retries, 3);
    }

    #[test]
    fn values_are_read_and_bad_numbers_fall_back() {
        let cfg = config_from(&[
            ("PORT", "9001"),
            ("MINER_ADDRESS", "miner-xyz"),
            ("PEERS", "http://a:1, http://b:2/,"),
            ("PEER_TIMEOUT_SECS", "soon"),
            ("CONSENSUS_INTERVAL_SECS", "30"),
            ("MINING_RETRIES", "0"),
        ]);
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.miner_address, "miner-xyz");
        assert_eq!(cfg.peers.iter().collect::<Vec<_>>(), vec!["http://a:1", "http://b:2"]);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(5));
        assert_eq!(cfg.consensus_interval, Duration::from_secs(30));
        assert_eq!(cfg.mining_retries, 1);
    }
}
