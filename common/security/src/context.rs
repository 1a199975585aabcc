use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::Span;
use uuid::Uuid;

use common_http_errors::ApiError;
use crate::roles::Role;

/// Authenticated admin session as forwarded by the admin gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
    pub trace_id: Option<Uuid>,
}

pub struct SecurityCtxExtractor(pub SecurityContext);

fn uuid_header(headers: &HeaderMap, name: &str) -> Option<Uuid> {
    headers.get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

fn roles_from_headers(headers: &HeaderMap) -> Vec<Role> {
    headers
        .get("X-Roles")
        .and_then(|v| v.to_str().ok())
        .map(|csv| {
            csv
                .split(|c| c == ',' || c == ' ')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse::<Role>().ok())
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl<S> FromRequestParts<S> for SecurityCtxExtractor where S: Send + Sync {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let trace_id = uuid_header(headers, "X-Trace-ID").or_else(|| Some(Uuid::new_v4()));
        let user_id = uuid_header(headers, "X-User-ID")
            .ok_or(ApiError::Unauthorized { trace_id })?;
        let roles = roles_from_headers(headers);

        Span::current().record("user_id", tracing::field::display(user_id));
        if let Some(tid) = trace_id.as_ref() {
            Span::current().record("trace_id", tracing::field::display(tid));
        }

        Ok(SecurityCtxExtractor(SecurityContext { user_id, roles, trace_id }))
    }
}
