use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, BlockData, Chain};
use crate::config::NodeConfig;
use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: the node service every handler talks to.
pub struct AppState {
    pub node: Node,
}

impl AppState {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            node: Node::new(config),
        }
    }
}

/* ---------- Chain API Models ---------- */

/// Client-facing view of a block; the parent hash is left out.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockSummary {
    pub index: u64,
    pub timestamp: i64,
    pub data: BlockData,
    pub hash: String,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index(),
            timestamp: block.timestamp(),
            data: block.data().clone(),
            hash: block.hash().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct BlocksResponse {
    pub status: String,
    pub blocks: Vec<BlockSummary>,
}

/// Full chain, parent hashes included, as peers fetch it.
#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a Chain,
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Peer & Consensus API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterPeerRequest {
    pub address: String,
}

#[derive(Serialize, Deserialize)]
pub struct PeersResponse {
    pub peers: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ConsensusResponse {
    pub replaced: bool,
    pub length: usize,
}
