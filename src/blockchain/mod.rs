pub mod block;
pub mod chain;
pub mod pow;

pub use block::{Block, BlockData};
pub use chain::Chain;

/// Proof carried by the genesis block; seeds the first proof search.
pub const GENESIS_PROOF: u64 = 9;

/// Every valid proof must be a multiple of this.
pub const PROOF_DIVISOR: u64 = 9;

/// Amount credited to the miner for sealing a block.
pub const MINING_REWARD: u64 = 1;

/// Sender recorded on reward transactions.
pub const NETWORK_SENDER: &str = "network";
