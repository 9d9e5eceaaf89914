//! RPS Escrow Service
//!
//! HTTP front end over a single [`GameEngine`](rps_escrow_core::GameEngine)
//! running on a simulated host.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub use config::ServiceConfig;
pub use handlers::PLAYER_HEADER;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/commitment", post(handlers::compute_commitment))
        .route("/api/games", post(handlers::create_game))
        .route("/api/games/:game_id", get(handlers::get_game))
        .route("/api/games/:game_id/bet", post(handlers::bet_in_game))
        .route("/api/games/:game_id/reveal", post(handlers::reveal_choice))
        .route("/api/games/:game_id/cancel", post(handlers::cancel_game))
        .route(
            "/api/games/:game_id/claim-unplayed",
            post(handlers::claim_unplayed_game),
        )
        .route(
            "/api/games/:game_id/claim-unrevealed",
            post(handlers::claim_unrevealed_game),
        )
        .route("/api/withdraw", post(handlers::withdraw))
        .route("/api/balance/:principal", get(handlers::get_balance))
        .route("/api/events", get(handlers::list_events))
        .route("/api/system", get(handlers::system_status))
        .route("/api/system/tick", post(handlers::tick))
        .route("/api/system/pause", post(handlers::pause))
        .route("/api/system/resume", post(handlers::resume))
        .route("/api/system/prune", post(handlers::prune))
        .route("/api/wallets/:principal", get(handlers::get_wallet))
        .route("/api/wallets/:principal/fund", post(handlers::fund_wallet))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
