mod api;
mod blockchain;
mod config;
mod error;
mod node;
mod transaction;

use std::time::Duration;

use actix_web::{App, HttpServer, rt, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let state = web::Data::new(AppState::new(&config));

    info!(
        "⛓️ Starting ledger node at http://{}:{} (miner={}, peers={})",
        config.host,
        config.port,
        state.node.miner_address(),
        config.peers.len()
    );

    if !config.consensus_interval.is_zero() {
        spawn_consensus_loop(state.clone(), config.consensus_interval);
    }

    HttpServer::new({
        let state = state.clone();
        move || {
            App::new()
                .app_data(state.clone())
                .configure(api::init_routes)
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Reconcile with peers every `period` for the life of the process.
fn spawn_consensus_loop(state: web::Data<AppState>, period: Duration) {
    info!("CONSENSUS - background resolution every {}s", period.as_secs());
    rt::spawn(async move {
        let mut ticker = rt::time::interval(period);
        // The first tick fires immediately; let the server come up first.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.node.resolve_conflicts().await;
        }
    });
}
