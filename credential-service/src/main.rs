use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use credential_service::antom::AntomClient;
use credential_service::secret::InMemoryConfigStore;
use credential_service::{router, AppState, CredentialValidator, ServiceConfig, ValidatorMetrics};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    if config.sandbox_private_key.is_none() && config.live_private_key.is_none() {
        warn!("No default-scope merchant keys configured; masked keys will not resolve");
    }

    let metrics = Arc::new(ValidatorMetrics::new()?);
    let gateway = Arc::new(AntomClient::new(config.probe_timeout)?);
    let store = Arc::new(InMemoryConfigStore::from_config(&config));
    let validator = CredentialValidator::new(store, gateway)
        .with_probe_timeout(config.probe_timeout)
        .with_metrics(metrics.clone());

    let state = AppState {
        validator: Arc::new(validator),
        metrics,
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-roles"),
            HeaderName::from_static("x-trace-id"),
        ]);

    let app = router(state).layer(cors);

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    info!(%addr, probe_timeout = ?config.probe_timeout, "starting credential-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
