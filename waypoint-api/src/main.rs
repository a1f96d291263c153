use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_api::{app, AppState};
use waypoint_store::{JsonFileInventory, XmlHotelInventory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_api=debug,waypoint_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = waypoint_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!(
        "Flights at {:?} (backup {:?}), hotels at {:?}",
        config.inventory.flights_path,
        config.inventory.flights_backup_path,
        config.inventory.hotels_path
    );

    let app_state = AppState {
        flights: Arc::new(JsonFileInventory::new(
            config.inventory.flights_path.clone(),
            config.inventory.flights_backup_path.clone(),
        )),
        hotels: Arc::new(XmlHotelInventory::new(config.inventory.hotels_path.clone())),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("API running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
