//! One mining cycle: search for the next proof, then seal the pending pool
//! plus a reward into a block on top of the tip the search started from.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use log::{debug, info};

use crate::blockchain::{Block, BlockData, Chain, pow};
use crate::error::ChainError;
use crate::transaction::{Transaction, TransactionPool};

/// Run one mining cycle against `chain`.
///
/// The proof search runs without holding any lock. Sealing happens in one
/// critical section on the chain: if the tip moved while searching (a
/// consensus replacement, say) the attempt fails with
/// [`ChainError::Linkage`] and the pool is left untouched; otherwise the
/// pool is drained, the reward appended and the block pushed.
pub fn mine(
    chain: &Mutex<Chain>,
    pool: &TransactionPool,
    reward_address: &str,
) -> Result<Block, ChainError> {
    let last_block = chain
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .last()
        .clone();
    debug!(
        "MINER - searching proof on #{} (last proof {})",
        last_block.index(),
        last_block.proof()
    );

    let proof = pow::search(last_block.proof())?;
    seal(chain, pool, reward_address, &last_block, proof)
}

/// Turn a found proof into a block on `last_block`, provided it is still the tip.
fn seal(
    chain: &Mutex<Chain>,
    pool: &TransactionPool,
    reward_address: &str,
    last_block: &Block,
    proof: u64,
) -> Result<Block, ChainError> {
    let mut chain = chain.lock().unwrap_or_else(PoisonError::into_inner);
    if chain.last().hash() != last_block.hash() {
        return Err(stale(chain.last(), last_block));
    }

    // Drained after the search, so late submissions still make this block.
    let mut transactions = pool.drain();
    transactions.push(Transaction::reward(reward_address));

    // Never older than the parent, even if an adopted tip is ahead of our clock.
    let timestamp = Utc::now().timestamp().max(last_block.timestamp());
    let block = Block::construct(
        last_block.index() + 1,
        timestamp,
        BlockData {
            proof_of_work: proof,
            transactions,
        },
        last_block.hash().to_string(),
    )?;
    chain.append(block.clone())?;

    info!(
        "MINER - sealed block #{} (proof={}, txs={}, hash={})",
        block.index(),
        proof,
        block.data().transactions.len(),
        block.hash()
    );
    Ok(block)
}

fn stale(tip: &Block, mined_on: &Block) -> ChainError {
    ChainError::Linkage {
        expected_index: tip.index() + 1,
        found_index: mined_on.index() + 1,
        expected_previous_hash: tip.hash().to_string(),
        found_previous_hash: mined_on.hash().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn genesis_chain() -> Mutex<Chain> {
        Mutex::new(Chain::new(Block::genesis(Utc::now().timestamp())))
    }

    #[test]
    fn first_block_holds_only_the_reward_when_pool_is_empty() {
        let chain = genesis_chain();
        let pool = TransactionPool::new();

        let block = mine(&chain, &pool, "miner-1").unwrap();

        let chain = chain.lock().unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(block.index(), 1);
        assert_eq!(block.proof(), 18);
        assert_eq!(block.previous_hash(), chain.blocks()[0].hash());
        assert_eq!(block.data().transactions, vec![Transaction::reward("miner-1")]);
        assert!(chain.is_valid());
    }

    #[test]
    fn pending_transactions_precede_the_reward_and_leave_the_pool() {
        let chain = genesis_chain();
        let pool = TransactionPool::new();
        let tx: Transaction =
            serde_json::from_value(json!({ "from": "alice", "to": "bob", "amount": 3 })).unwrap();
        pool.submit(tx.clone());

        let block = mine(&chain, &pool, "miner-1").unwrap();

        assert_eq!(
            block.data().transactions,
            vec![tx, Transaction::reward("miner-1")]
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn proofs_chain_from_block_to_block() {
        let chain = genesis_chain();
        let pool = TransactionPool::new();

        let proofs: Vec<u64> = (0..4)
            .map(|_| mine(&chain, &pool, "m").unwrap().proof())
            .collect();

        assert_eq!(proofs, vec![18, 36, 72, 144]);
        assert!(chain.lock().unwrap().is_valid());
    }

    #[test]
    fn proof_found_on_replaced_tip_is_discarded_and_pool_kept() {
        let chain = genesis_chain();
        let pool = TransactionPool::new();
        let mined_on = chain.lock().unwrap().last().clone();
        let proof = pow::search(mined_on.proof()).unwrap();

        // Another node's longer chain wins while we were searching.
        let remote = genesis_chain();
        mine(&remote, &TransactionPool::new(), "rival").unwrap();
        mine(&remote, &TransactionPool::new(), "rival").unwrap();
        assert!(chain.lock().unwrap().replace(remote.into_inner().unwrap()));

        let pending: Transaction = serde_json::from_value(json!({ "memo": "keep me" })).unwrap();
        pool.submit(pending.clone());

        let err = seal(&chain, &pool, "miner-1", &mined_on, proof).unwrap_err();
        assert!(matches!(
            err,
            ChainError::Linkage { expected_index: 3, found_index: 1, .. }
        ));
        assert_eq!(chain.lock().unwrap().len(), 3);
        assert_eq!(pool.snapshot(), vec![pending]);
    }

    #[test]
    fn block_on_future_dated_tip_keeps_timestamps_ordered() {
        let ahead = Utc::now().timestamp() + 3600;
        let chain = Mutex::new(Chain::new(Block::genesis(ahead)));

        let block = mine(&chain, &TransactionPool::new(), "miner-1").unwrap();

        assert!(block.timestamp() >= ahead);
        assert!(chain.lock().unwrap().is_valid());
    }
}
