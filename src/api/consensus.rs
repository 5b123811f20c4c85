use actix_web::{HttpResponse, Responder, get, post, web};

use super::models::{AppState, ConsensusResponse, PeersResponse, RegisterPeerRequest, StatusResponse};

#[get("/peers/")]
pub async fn get_peers(state: web::Data<AppState>) -> impl Responder {
    let peers = state.node.peers();
    HttpResponse::Ok().json(PeersResponse {
        peers: peers.iter().map(str::to_string).collect(),
    })
}

/// Register a peer by base URL, e.g. `http://10.0.0.2:8080`.
#[post("/peers/")]
pub async fn register_peer(
    state: web::Data<AppState>,
    body: web::Json<RegisterPeerRequest>,
) -> impl Responder {
    if body.address.trim().is_empty() {
        return HttpResponse::BadRequest().json(StatusResponse::error("address required"));
    }
    if state.node.add_peer(&body.address) {
        HttpResponse::Ok().json(StatusResponse::success("Peer registered"))
    } else {
        HttpResponse::Ok().json(StatusResponse::success("Peer already known"))
    }
}

/// Pull every peer's chain now and adopt the longest valid one.
#[get("/consensus/")]
pub async fn run_consensus(state: web::Data<AppState>) -> impl Responder {
    let replaced = state.node.resolve_conflicts().await;
    HttpResponse::Ok().json(ConsensusResponse {
        replaced,
        length: state.node.get_chain().len(),
    })
}
