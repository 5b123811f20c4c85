//! Longest-valid-chain reconciliation across peers.

use std::collections::BTreeSet;
use std::future::Future;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::blockchain::Chain;
use crate::error::ChainError;

/// Base URLs of the nodes we pull chains from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerSet {
    addresses: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer. Trailing slashes are dropped so `http://a/` and
    /// `http://a` count once. Returns false for blanks and duplicates.
    pub fn add(&mut self, address: &str) -> bool {
        let address = address.trim().trim_end_matches('/');
        if address.is_empty() {
            return false;
        }
        self.addresses.insert(address.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PeerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut peers = Self::new();
        for address in iter {
            peers.add(address.as_ref());
        }
        peers
    }
}

/// Ask every peer for its chain and pick the longest valid one.
///
/// Peers are queried concurrently; one that fails or sends an invalid chain
/// is logged and skipped. Returns `Some(candidate)` only when a candidate is
/// strictly longer than `local`; on a tie the local chain stays. Swapping it
/// in is left to the caller, via [`Chain::replace`].
pub async fn resolve<F, Fut>(local: &Chain, peers: &PeerSet, fetch_chain: F) -> Option<Chain>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Chain, ChainError>>,
{
    let fetches = peers.iter().map(|peer| {
        let fetched = fetch_chain(peer.to_string());
        async move { (peer, fetched.await) }
    });

    let mut best: Option<Chain> = None;
    for (peer, outcome) in join_all(fetches).await {
        let candidate = match outcome.and_then(|chain| chain.validate().map(|()| chain)) {
            Ok(chain) => chain,
            Err(e @ ChainError::Validation(_)) => {
                warn!("CONSENSUS - discarding chain from {peer}: {e}");
                continue;
            }
            Err(e) => {
                warn!("CONSENSUS - skipping {peer}: {e}");
                continue;
            }
        };

        let longest = best.as_ref().map_or(local.len(), Chain::len);
        debug!(
            "CONSENSUS - {peer} offers {} blocks (longest so far {longest})",
            candidate.len()
        );
        if candidate.len() > longest {
            best = Some(candidate);
        }
    }

    if let Some(winner) = &best {
        info!(
            "CONSENSUS - found longer chain: {} -> {} blocks",
            local.len(),
            winner.len()
        );
    }
    best
}
