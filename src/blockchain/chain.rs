use serde::{Deserialize, Serialize};

use super::Block;
use crate::error::ChainError;

/// One node's view of the ledger: an append-only, hash-linked list of blocks
/// starting at a genesis block. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain from its genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    /// Wrap blocks received from elsewhere. Nothing is checked beyond
    /// non-emptiness; call [`Chain::validate`] before trusting the result.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, ChainError> {
        if blocks.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        Ok(Self { blocks })
    }

    /// The tip.
    pub fn last(&self) -> &Block {
        self.blocks
            .last()
            .expect("a chain always holds at least its genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Grow the chain by one block. The block must sit directly on the tip.
    pub fn append(&mut self, block: Block) -> Result<(), ChainError> {
        let tip = self.last();
        if block.previous_hash() != tip.hash() || block.index() != tip.index() + 1 {
            return Err(ChainError::Linkage {
                expected_index: tip.index() + 1,
                found_index: block.index(),
                expected_previous_hash: tip.hash().to_string(),
                found_previous_hash: block.previous_hash().to_string(),
            });
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Adopt `candidate` wholesale if it is valid and strictly longer.
    /// Returns whether the swap happened. Blocks only this chain had are
    /// dropped along with their transactions.
    pub fn replace(&mut self, candidate: Chain) -> bool {
        if candidate.len() <= self.len() || !candidate.is_valid() {
            return false;
        }
        *self = candidate;
        true
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the whole chain, reporting the first broken invariant.
    /// Timestamp order is not checked, so peers with skewed clocks still pass.
    pub fn validate(&self) -> Result<(), ChainError> {
        let genesis = &self.blocks[0];
        if genesis.index() != 0 || !genesis.previous_hash().is_empty() {
            return Err(ChainError::Validation(
                "first block is not a genesis block".into(),
            ));
        }
        if !genesis.has_valid_hash() {
            return Err(ChainError::Validation("genesis hash mismatch".into()));
        }

        for pair in self.blocks.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if current.index() != prev.index() + 1 {
                return Err(ChainError::Validation(format!(
                    "block #{} follows #{}",
                    current.index(),
                    prev.index()
                )));
            }
            if current.previous_hash() != prev.hash() {
                return Err(ChainError::Validation(format!(
                    "block #{} does not link to its parent",
                    current.index()
                )));
            }
            if !current.has_valid_hash() {
                return Err(ChainError::Validation(format!(
                    "block #{} hash mismatch",
                    current.index()
                )));
            }
        }

        Ok(())
    }
}

impl TryFrom<Vec<Block>> for Chain {
    type Error = ChainError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Self::from_blocks(blocks)
    }
}

impl From<Chain> for Vec<Block> {
    fn from(chain: Chain) -> Self {
        chain.blocks
    }
}
