pub mod consensus;
pub mod miner;
pub mod peer;

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;

pub use consensus::PeerSet;

use crate::blockchain::{Block, Chain};
use crate::config::NodeConfig;
use crate::error::ChainError;
use crate::transaction::{Transaction, TransactionPool};

/// The single owner of this node's chain, pending pool and peer list.
///
/// Every read or write of ledger state goes through here. The chain sits
/// behind one mutex, so `append` and `replace` are atomic for readers.
/// The pool has its own lock; when both are needed the chain lock is taken
/// first.
#[derive(Debug)]
pub struct Node {
    chain: Mutex<Chain>,
    pool: TransactionPool,
    peers: Mutex<PeerSet>,
    miner_address: String,
    peer_timeout: Duration,
    mining_retries: u32,
}

impl Node {
    pub fn new(config: &NodeConfig) -> Self {
        Self::with_chain(config, Chain::new(Block::genesis(Utc::now().timestamp())))
    }

    pub fn with_chain(config: &NodeConfig, chain: Chain) -> Self {
        Self {
            chain: Mutex::new(chain),
            pool: TransactionPool::new(),
            peers: Mutex::new(config.peers.clone()),
            miner_address: config.miner_address.clone(),
            peer_timeout: config.peer_timeout,
            mining_retries: config.mining_retries.max(1),
        }
    }

    pub fn submit_transaction(&self, tx: Transaction) {
        info!(
            "New transaction FROM: {} TO: {} AMOUNT: {}",
            field(&tx, "from"),
            field(&tx, "to"),
            field(&tx, "amount")
        );
        self.pool.submit(tx);
    }

    /// A consistent copy of the whole chain.
    pub fn get_chain(&self) -> Chain {
        self.chain().clone()
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.pool.snapshot()
    }

    pub fn miner_address(&self) -> &str {
        &self.miner_address
    }

    /// Mine one block, retrying from the new tip when a chain replacement
    /// lands mid-search. Blocks the calling thread for as long as the proof
    /// search takes.
    pub fn mine_block(&self) -> Result<Block, ChainError> {
        if self.pool.is_empty() {
            debug!("MINER - pool is empty, next block carries only the reward");
        }
        let mut attempt = 1;
        loop {
            match miner::mine(&self.chain, &self.pool, &self.miner_address) {
                Err(e @ ChainError::Linkage { .. }) if attempt < self.mining_retries => {
                    warn!("MINER - attempt {attempt} went stale ({e}), retrying from new tip");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    pub fn peers(&self) -> PeerSet {
        self.peer_set().clone()
    }

    pub fn add_peer(&self, address: &str) -> bool {
        let added = self.peer_set().add(address);
        if added {
            info!("PEERS - registered {}", address.trim());
        }
        added
    }

    /// Reconcile with every known peer over HTTP.
    pub async fn resolve_conflicts(&self) -> bool {
        let timeout = self.peer_timeout;
        self.resolve_with(|address| peer::fetch_chain(address, timeout)).await
    }

    /// Reconcile using `fetch_chain` to obtain each peer's chain. Returns
    /// whether the local chain was replaced.
    ///
    /// The chain lock is not held while peers are queried; the final
    /// `replace` re-checks length against whatever the chain has become,
    /// so blocks mined meanwhile are not lost to an equally long candidate.
    /// Transactions only present in dropped local blocks are not re-queued.
    pub async fn resolve_with<F, Fut>(&self, fetch_chain: F) -> bool
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Chain, ChainError>>,
    {
        let peers = self.peers();
        if peers.is_empty() {
            debug!("CONSENSUS - no peers registered, nothing to resolve");
            return false;
        }
        let local = self.get_chain();
        let Some(winner) = consensus::resolve(&local, &peers, fetch_chain).await else {
            return false;
        };

        let mut chain = self.chain();
        let before = chain.len();
        let replaced = chain.replace(winner);
        if replaced {
            info!("CONSENSUS - replaced local chain ({before} -> {} blocks)", chain.len());
        } else {
            debug!("CONSENSUS - local chain grew to {before} blocks meanwhile, keeping it");
        }
        replaced
    }

    fn chain(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn peer_set(&self) -> MutexGuard<'_, PeerSet> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn field(tx: &Transaction, key: &str) -> String {
    match tx.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}
