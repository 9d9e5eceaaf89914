//! RPS Escrow Service binary

use rps_escrow_service::{create_router, AppState, ServiceConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env();
    info!(
        "Engine config: grace_period={} bet_payment={:?} cancel_policy={:?} enforce_reveal_deadline={}",
        config.engine.grace_period,
        config.engine.bet_payment,
        config.engine.cancel_policy,
        config.engine.enforce_reveal_deadline
    );

    let state = AppState::new(config.start_height, config.engine.clone());
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("RPS escrow service listening on http://{}", addr);

    axum::serve(listener, app).await
}
