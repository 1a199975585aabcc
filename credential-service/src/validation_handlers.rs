use std::collections::HashMap;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use common_http_errors::ApiError;
use common_security::{ensure_capability, Capability, SecurityContext, SecurityCtxExtractor};
use tracing::{info, warn};

use crate::env_info::HeaderRequestContext;
use crate::verdict::ValidationResult;
use crate::AppState;

pub const INVALID_PARAMETERS_CODE: &str = "invalid_parameters";

fn invalid_parameters(detail: String, sec: &SecurityContext) -> ApiError {
    warn!(user_id = %sec.user_id, %detail, "Rejected unreadable validation parameters");
    ApiError::BadRequest {
        code: INVALID_PARAMETERS_CODE,
        trace_id: sec.trace_id,
        message: Some(detail),
    }
}

/// Parameters may arrive in the query string, the form body, or both; body
/// values win. A request without a body carries no `Content-Type`; any other
/// body must be form encoded.
pub async fn validate_credentials(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    headers: HeaderMap,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<ValidationResult>, ApiError> {
    ensure_capability(&sec, Capability::PaymentConfigValidate).map_err(|_| {
        ApiError::ForbiddenMissingCapability {
            capability: Capability::PaymentConfigValidate.as_str(),
            trace_id: sec.trace_id,
        }
    })?;

    let Query(mut params) = query.map_err(|rejection| invalid_parameters(rejection.body_text(), &sec))?;
    match form {
        Ok(Form(body)) => params.extend(body),
        Err(_) if !headers.contains_key(CONTENT_TYPE) => {}
        Err(rejection) => return Err(invalid_parameters(rejection.body_text(), &sec)),
    }

    info!(user_id = %sec.user_id, trace_id = ?sec.trace_id, "Antom credential validation requested");
    let context = HeaderRequestContext::new(headers);
    let result = state.validator.validate(&params, &context).await;
    Ok(Json(result))
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Result<Response, ApiError> {
    state
        .metrics
        .render()
        .map_err(|err| ApiError::internal(err, None))
}
