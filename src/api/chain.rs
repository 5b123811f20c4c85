use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};

use super::models::{
    AppState, BlockSummary, BlocksResponse, ChainResponse, StatusResponse, ValidateResponse,
};
use crate::error::ChainError;

/// Every block, without parent hashes.
#[get("/blocks/")]
pub async fn get_blocks(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.get_chain();
    HttpResponse::Ok().json(BlocksResponse {
        status: "success".into(),
        blocks: chain.blocks().iter().map(BlockSummary::from).collect(),
    })
}

/// The full chain, in the form peers fetch during consensus.
#[get("/chain/")]
pub async fn get_full_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.get_chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain: &chain,
    })
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.get_chain();
    HttpResponse::Ok().json(ValidateResponse {
        valid: chain.is_valid(),
        length: chain.len(),
    })
}

/// Mine a block from the pending pool, paying the node's miner address.
/// The proof search runs on the blocking thread pool and has no deadline.
#[get("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let worker_state = state.clone();
    match web::block(move || worker_state.node.mine_block()).await {
        Ok(Ok(block)) => HttpResponse::Ok().json(BlockSummary::from(&block)),
        Ok(Err(e @ ChainError::Linkage { .. })) => {
            warn!("MINER - gave up after stale attempts: {e}");
            HttpResponse::Conflict().json(StatusResponse::error(e.to_string()))
        }
        Ok(Err(e)) => {
            error!("MINER - mining failed: {e}");
            HttpResponse::InternalServerError().json(StatusResponse::error(e.to_string()))
        }
        Err(e) => {
            error!("MINER - worker failed: {e}");
            HttpResponse::InternalServerError().json(StatusResponse::error("mining worker failed"))
        }
    }
}
