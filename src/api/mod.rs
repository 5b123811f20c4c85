mod chain;
mod consensus;
mod health;
pub mod models;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_blocks)
            .service(chain::get_full_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(consensus::get_peers)
            .service(consensus::register_peer)
            .service(consensus::run_consensus),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::blockchain::Chain;
    use crate::config::NodeConfig;

    use super::models::{
        BlockSummary, BlocksResponse, ConsensusResponse, PeersResponse, StatusResponse,
    };
    use super::*;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(&NodeConfig {
            miner_address: "miner-1".into(),
            ..NodeConfig::default()
        }))
    }

    #[actix_web::test]
    async fn submit_mine_and_list_blocks() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/txion/")
            .set_json(json!({ "from": "alice", "to": "bob", "amount": 3 }))
            .to_request();
        let resp: StatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "success");

        let req = test::TestRequest::get().uri("/api/v1/mine/").to_request();
        let mined: BlockSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mined.index, 1);
        assert_eq!(mined.data.proof_of_work, 18);
        assert_eq!(mined.data.transactions.len(), 2);

        let req = test::TestRequest::get().uri("/api/v1/blocks/").to_request();
        let raw: Value = test::call_and_read_body_json(&app, req).await;
        assert!(raw["blocks"][1].get("previous_hash").is_none());
        let blocks: BlocksResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(blocks.blocks.len(), 2);
        assert_eq!(blocks.blocks[1].hash, mined.hash);
    }

    #[actix_web::test]
    async fn full_chain_carries_parent_hashes_and_validates() {
        let state = state();
        state.node.mine_block().unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let raw: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(raw["length"], json!(2));
        assert_eq!(raw["chain"][1]["previous_hash"], raw["chain"][0]["hash"]);
        let chain: Chain = serde_json::from_value(raw["chain"].clone()).unwrap();
        assert!(chain.is_valid());

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let raw: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(raw, json!({ "valid": true, "length": 2 }));
    }

    #[actix_web::test]
    async fn non_object_transaction_is_rejected() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/txion/")
            .set_json(json!([1, 2, 3]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn pending_pool_is_listed() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/txion/")
            .set_json(json!({ "memo": "hi" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/v1/pending/").to_request();
        let raw: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(raw, json!({ "size": 1, "transactions": [{ "memo": "hi" }] }));
    }

    #[actix_web::test]
    async fn peers_register_and_consensus_without_reachable_peers_keeps_chain() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/peers/")
            .set_json(json!({ "address": "  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/v1/peers/")
            .set_json(json!({ "address": "http://127.0.0.1:1/" }))
            .to_request();
        let resp: StatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.message, "Peer registered");

        let req = test::TestRequest::get().uri("/api/v1/peers/").to_request();
        let peers: PeersResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(peers.peers, vec!["http://127.0.0.1:1"]);

        let req = test::TestRequest::get().uri("/api/v1/consensus/").to_request();
        let outcome: ConsensusResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!outcome.replaced);
        assert_eq!(outcome.length, 1);
    }

    #[actix_web::test]
    async fn health_check_responds() {
        let app = test::init_service(App::new().configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
