use thiserror::Error;

/// Every failure the ledger core can report. None of them is fatal to the
/// node: they are either retried by the caller or filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("invalid proof seed {last_proof}: must be positive")]
    InvalidProof { last_proof: u64 },

    #[error("no proof above {last_proof} fits in 64 bits")]
    ProofOverflow { last_proof: u64 },

    #[error("block #{index} needs a parent hash")]
    MissingParentHash { index: u64 },

    #[error(
        "block does not extend the tip: expected #{expected_index} on {expected_previous_hash}, \
         got #{found_index} on {found_previous_hash}"
    )]
    Linkage {
        expected_index: u64,
        found_index: u64,
        expected_previous_hash: String,
        found_previous_hash: String,
    },

    #[error("invalid chain: {0}")]
    Validation(String),

    #[error("chain has no blocks")]
    EmptyChain,

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("peer {peer} sent a malformed chain: {reason}")]
    MalformedPeerResponse { peer: String, reason: String },
}
