use std::time::Duration;

use actix_web::rt;
use awc::Client;
use log::debug;
use serde::Deserialize;

use crate::blockchain::Chain;
use crate::error::ChainError;

/// Path every node serves its full chain on (see `api::chain::get_full_chain`).
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Upper bound on a peer's chain payload.
const MAX_CHAIN_BYTES: usize = 16 * 1024 * 1024;

#[derive(Deserialize)]
struct ChainPayload {
    chain: Chain,
}

/// Fetch `peer`'s chain over HTTP. The whole exchange, body included, must
/// finish within `timeout`.
pub async fn fetch_chain(peer: String, timeout: Duration) -> Result<Chain, ChainError> {
    let url = format!("{}{}", peer.trim_end_matches('/'), CHAIN_PATH);
    debug!("CONSENSUS - GET {url}");

    let outcome = rt::time::timeout(timeout, request_chain(&peer, &url, timeout)).await;
    match outcome {
        Ok(fetched) => fetched,
        Err(_) => Err(ChainError::PeerUnreachable {
            peer,
            reason: format!("no complete response within {}ms", timeout.as_millis()),
        }),
    }
}

async fn request_chain(peer: &str, url: &str, timeout: Duration) -> Result<Chain, ChainError> {
    let client = Client::builder().timeout(timeout).finish();
    let mut resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| ChainError::PeerUnreachable {
            peer: peer.to_string(),
            reason: e.to_string(),
        })?;

    if !resp.status().is_success() {
        return Err(ChainError::MalformedPeerResponse {
            peer: peer.to_string(),
            reason: format!("status {}", resp.status()),
        });
    }

    let payload = resp
        .json::<ChainPayload>()
        .limit(MAX_CHAIN_BYTES)
        .await
        .map_err(|e| ChainError::MalformedPeerResponse {
            peer: peer.to_string(),
            reason: e.to_string(),
        })?;
    Ok(payload.chain)
}
