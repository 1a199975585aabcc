use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::gateway::{
    ConsultRequest, ConsultResponse, GatewayCredentials, GatewayError, PaymentGateway, CONSULT_PATH,
};
use crate::signature;

pub const CLIENT_ID_HEADER: &str = "Client-Id";
pub const REQUEST_TIME_HEADER: &str = "Request-Time";
pub const RESPONSE_TIME_HEADER: &str = "Response-Time";
pub const SIGNATURE_HEADER: &str = "Signature";
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Signed HTTP client for the Antom open API.
#[derive(Clone)]
pub struct AntomClient {
    http: Client,
}

impl AntomClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

fn consult_url(gateway_url: &str) -> String {
    format!("{}{}", gateway_url.trim().trim_end_matches('/'), CONSULT_PATH)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[async_trait]
impl PaymentGateway for AntomClient {
    async fn consult(
        &self,
        credentials: &GatewayCredentials,
        request: &ConsultRequest,
    ) -> Result<ConsultResponse, GatewayError> {
        let private_key = signature::parse_private_key(credentials.merchant_private_key.expose_secret())?;
        let body = serde_json::to_string(request).map_err(|err| GatewayError::Encode(err.to_string()))?;
        let request_time = Utc::now().timestamp_millis().to_string();
        let content = signature::signing_content(
            "POST",
            CONSULT_PATH,
            &credentials.client_id,
            &request_time,
            &body,
        );
        let signed = signature::sign(&private_key, &content)?;

        let url = consult_url(&credentials.gateway_url);
        debug!(%url, client_id = %credentials.client_id, "Sending Antom consult probe");
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .header(CLIENT_ID_HEADER, credentials.client_id.as_str())
            .header(REQUEST_TIME_HEADER, request_time.as_str())
            .header(SIGNATURE_HEADER, signature::signature_header(&signed))
            .body(body)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let response_signature = header_str(response.headers(), SIGNATURE_HEADER).map(str::to_string);
        let response_time = header_str(response.headers(), RESPONSE_TIME_HEADER).map(str::to_string);
        let text = response
            .text()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        debug!(status = status.as_u16(), body_bytes = text.len(), "Antom consult response received");

        let parsed: ConsultResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(GatewayError::Status { status: status.as_u16() })
            }
            Err(err) => return Err(GatewayError::Decode(err.to_string())),
        };
        debug!(result = ?parsed.result, "Antom consult result");

        if let (Some(header), Some(time)) = (response_signature, response_time) {
            let public_key = signature::parse_public_key(&credentials.antom_public_key)?;
            let content = signature::signing_content(
                "POST",
                CONSULT_PATH,
                &credentials.client_id,
                &time,
                &text,
            );
            let verified = signature::extract_signature(&header)
                .map(|sig| signature::verify(&public_key, &content, &sig))
                .unwrap_or(false);
            if !verified {
                warn!(client_id = %credentials.client_id, "Antom response signature did not verify");
                return Err(GatewayError::SignatureMismatch);
            }
        }

        Ok(parsed)
    }
}
