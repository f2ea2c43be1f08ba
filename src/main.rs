use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use api_shared::HealthService;
use odonto_core::{ChartStore, CoreConfig, DEFAULT_CARE_LOCATION, DEFAULT_DATA_DIR};

/// Main entry point for the Odonto application
///
/// Serves the REST API (with Swagger UI at `/swagger-ui`) over the chart store.
///
/// # Environment Variables
/// - `ODONTO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ODONTO_DATA_DIR`: Directory for chart storage (default: "odonto_data")
/// - `ODONTO_CARE_LOCATION`: Care location recorded on every commit
///   (default: "Odonto Dental Clinic")
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("odonto=info".parse()?)
                .add_directive("odonto_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("ODONTO_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;
    let data_dir = std::env::var("ODONTO_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let care_location =
        std::env::var("ODONTO_CARE_LOCATION").unwrap_or_else(|_| DEFAULT_CARE_LOCATION.into());

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(data_dir), care_location)?);
    let store = ChartStore::new(cfg.clone());

    tracing::info!("++ Starting Odonto REST on {}", rest_addr);
    tracing::info!(
        "++ Chart data in {} ({} charts)",
        cfg.data_dir().display(),
        store.list().len()
    );
    tracing::info!("++ {}", HealthService::check_health().message);

    let rest_app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, rest_app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("-- Shutting down Odonto REST");
        })
        .await?;

    Ok(())
}
