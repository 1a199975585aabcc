use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env_info::EnvInfo;

pub const CONSULT_PATH: &str = "/ams/api/v1/payments/consult";

pub const PROBE_PRODUCT_CODE: &str = "CASHIER_PAYMENT";
pub const PROBE_CURRENCY: &str = "USD";
/// Minor units, i.e. 10.00 USD.
pub const PROBE_AMOUNT_VALUE: &str = "1000";
pub const PROBE_REGION: &str = "US";
pub const PRESENTMENT_MODE_BUNDLE: &str = "BUNDLE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub currency: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementStrategy {
    pub settlement_currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFactor {
    pub presentment_mode: String,
}

/// Body of the payments consult call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultRequest {
    pub product_code: String,
    pub payment_amount: Amount,
    pub settlement_strategy: SettlementStrategy,
    pub user_region: String,
    pub allowed_payment_method_regions: Vec<String>,
    pub env: EnvInfo,
    pub payment_factor: PaymentFactor,
}

impl ConsultRequest {
    /// The fixed, side-effect free consultation used as a credential probe.
    pub fn probe(env: EnvInfo) -> Self {
        Self {
            product_code: PROBE_PRODUCT_CODE.to_string(),
            payment_amount: Amount {
                currency: PROBE_CURRENCY.to_string(),
                value: PROBE_AMOUNT_VALUE.to_string(),
            },
            settlement_strategy: SettlementStrategy {
                settlement_currency: PROBE_CURRENCY.to_string(),
            },
            user_region: PROBE_REGION.to_string(),
            allowed_payment_method_regions: vec![PROBE_REGION.to_string()],
            env,
            payment_factor: PaymentFactor {
                presentment_mode: PRESENTMENT_MODE_BUNDLE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultResult {
    pub result_status: Option<String>,
    pub result_code: Option<String>,
    pub result_message: Option<String>,
}

/// Only the `result` block matters for credential checks; the rest of the
/// consult payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsultResponse {
    pub result: ConsultResult,
}

#[derive(Debug, Clone)]
pub struct GatewayCredentials {
    pub gateway_url: String,
    pub client_id: String,
    pub merchant_private_key: SecretString,
    pub antom_public_key: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid merchant private key: {0}")]
    PrivateKey(String),
    #[error("invalid antom public key: {0}")]
    PublicKey(String),
    #[error("failed to encode consult request: {0}")]
    Encode(String),
    #[error("gateway request failed: {0}")]
    Transport(String),
    #[error("gateway returned HTTP {status} without a result")]
    Status { status: u16 },
    #[error("malformed gateway response: {0}")]
    Decode(String),
    #[error("gateway response signature verification failed")]
    SignatureMismatch,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn consult(
        &self,
        credentials: &GatewayCredentials,
        request: &ConsultRequest,
    ) -> Result<ConsultResponse, GatewayError>;
}
