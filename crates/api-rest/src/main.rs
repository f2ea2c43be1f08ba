//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI). The workspace's main `odonto-run` binary serves the same router.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use odonto_core::{ChartStore, CoreConfig, DEFAULT_CARE_LOCATION, DEFAULT_DATA_DIR};

/// Main entry point for the Odonto REST API server
///
/// # Environment Variables
/// - `ODONTO_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `ODONTO_DATA_DIR`: Chart storage root (default: "odonto_data")
/// - `ODONTO_CARE_LOCATION`: Care location recorded on every commit
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("odonto_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("ODONTO_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir =
        std::env::var("ODONTO_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let care_location = std::env::var("ODONTO_CARE_LOCATION")
        .unwrap_or_else(|_| DEFAULT_CARE_LOCATION.into());

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(data_dir), care_location)?);
    tracing::info!(
        "-- Starting Odonto REST API on {} (data: {})",
        addr,
        cfg.data_dir().display()
    );

    let app = router(AppState::new(ChartStore::new(cfg)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
