use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::GENESIS_PROOF;
use crate::error::ChainError;
use crate::transaction::Transaction;

/// Payload of a block: the proof that authorised it and the transactions it
/// captured, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub proof_of_work: u64,
    pub transactions: Vec<Transaction>,
}

/// A single block in the ledger.
///
/// Fields are private: a block is built through [`Block::construct`] or
/// [`Block::genesis`], which fix `hash` from the other four fields. Blocks
/// decoded from a peer keep the hash the peer sent, so [`Block::has_valid_hash`]
/// can catch tampering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: i64, // Unix timestamp (UTC)
    data: BlockData,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Build a block and seal its hash. Only the genesis block (index 0) may
    /// have an empty parent hash; whether the parent hash is the *right* one
    /// is the chain's business, not ours.
    pub fn construct(
        index: u64,
        timestamp: i64,
        data: BlockData,
        previous_hash: String,
    ) -> Result<Self, ChainError> {
        if index > 0 && previous_hash.is_empty() {
            return Err(ChainError::MissingParentHash { index });
        }
        let hash = Self::compute_hash(index, timestamp, &data, &previous_hash);
        Ok(Self {
            index,
            timestamp,
            data,
            previous_hash,
            hash,
        })
    }

    /// The index-0 block: fixed proof, no transactions, no parent.
    pub fn genesis(now: i64) -> Self {
        let data = BlockData {
            proof_of_work: GENESIS_PROOF,
            transactions: Vec::new(),
        };
        let previous_hash = String::new();
        let hash = Self::compute_hash(0, now, &data, &previous_hash);
        Self {
            index: 0,
            timestamp: now,
            data,
            previous_hash,
            hash,
        }
    }

    /// SHA-256 (hex) over `index:timestamp:data:previous_hash`. `data` goes
    /// in as JSON: struct fields serialize in declaration order, transaction
    /// keys in sorted order and the transaction list verbatim, so equal
    /// blocks always hash equal.
    pub fn compute_hash(
        index: u64,
        timestamp: i64,
        data: &BlockData,
        previous_hash: &str,
    ) -> String {
        let data_json = serde_json::to_string(data).expect("block data is plain JSON");
        let preimage = format!("{}:{}:{}:{}", index, timestamp, data_json, previous_hash);
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether the stored hash still matches the block's content.
    pub fn has_valid_hash(&self) -> bool {
        let expected =
            Self::compute_hash(self.index, self.timestamp, &self.data, &self.previous_hash);
        self.hash == expected
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    pub fn proof(&self) -> u64 {
        self.data.proof_of_work
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}
