use colis_api::{app, AppState};
use colis_carrier::BaridTunables;
use colis_core::ProviderRegistry;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colis_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = colis_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Colis API on port {}", config.server.port);

    let tunables = BaridTunables {
        token_validity_hours: config.carrier.token_validity_hours,
        tracking_timeout: Duration::from_secs(config.carrier.tracking_timeout_secs),
        shipment_timeout: Duration::from_secs(config.carrier.shipment_timeout_secs),
    };
    let mut registry = ProviderRegistry::new();
    colis_carrier::register(&mut registry, tunables);

    let state = AppState::new(registry, config.carrier.clone());
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
