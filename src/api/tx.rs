use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::{Map, Value};

use super::models::{AppState, PendingResponse, StatusResponse};
use crate::transaction::Transaction;

/// Queue a transaction for the next block. Any JSON object is accepted;
/// its contents are not checked.
#[post("/txion/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Map<String, Value>>,
) -> impl Responder {
    state.node.submit_transaction(Transaction::new(body.into_inner()));
    HttpResponse::Ok().json(StatusResponse::success("Transaction submission successful"))
}

/// Transactions waiting for the next block.
#[get("/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.node.pending_transactions();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
