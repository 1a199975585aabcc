use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

pub mod antom;
pub mod config;
pub mod env_info;
pub mod gateway;
pub mod metrics;
pub mod request;
pub mod secret;
pub mod signature;
pub mod validation_handlers;
pub mod validator;
pub mod verdict;

pub use crate::config::ServiceConfig;
pub use crate::metrics::ValidatorMetrics;
pub use crate::request::{Environment, ValidationRequest};
pub use crate::validator::CredentialValidator;
pub use crate::verdict::{ValidationFailure, ValidationResult};

pub const VALIDATE_PATH: &str = "/admin/antom/validate";

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<CredentialValidator>,
    pub metrics: Arc<ValidatorMetrics>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(validation_handlers::metrics_endpoint))
        .route(VALIDATE_PATH, post(validation_handlers::validate_credentials))
        .with_state(state)
}
