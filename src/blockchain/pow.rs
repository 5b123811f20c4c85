//! Proof-of-work search.
//!
//! A proof is the smallest integer above the previous proof that is a
//! multiple of both [`PROOF_DIVISOR`] and the previous proof. It is cheap to
//! check and gets slower to find as proofs grow, but it is a toy puzzle and
//! offers no cryptographic cost guarantee.

use super::PROOF_DIVISOR;
use crate::error::ChainError;

/// Find the next proof after `last_proof`.
///
/// Pure and lock-free, so it can run on a blocking worker while the chain
/// moves on; a stale result is simply refused by `Chain::append`.
pub fn search(last_proof: u64) -> Result<u64, ChainError> {
    if last_proof == 0 {
        return Err(ChainError::InvalidProof { last_proof });
    }
    let mut candidate = last_proof;
    loop {
        candidate = candidate
            .checked_add(1)
            .ok_or(ChainError::ProofOverflow { last_proof })?;
        if is_valid_proof(last_proof, candidate) {
            return Ok(candidate);
        }
    }
}

/// Two modulo checks; never divides by zero.
pub fn is_valid_proof(last_proof: u64, proof: u64) -> bool {
    last_proof > 0 && proof > last_proof && proof % PROOF_DIVISOR == 0 && proof % last_proof == 0
}
