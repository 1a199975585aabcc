//! Maps the outcome of a credential check onto the two-field verdict returned
//! to the admin panel.
//!
//! Every failure is logged here with full detail for operators while the
//! caller only ever sees one of the fixed messages below. The two generic
//! wordings differ: `configuration.` for structural and gateway rejections,
//! `configurations.` for unexpected errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::gateway::ConsultResponse;
use crate::request::Environment;

pub const VALID_MESSAGE: &str = "Configuration is valid.";
pub const CHECK_CONFIGURATION_MESSAGE: &str = "Validation failed. Please check your configuration.";
pub const CHECK_CONFIGURATIONS_MESSAGE: &str = "Validation failed. Please check your configurations.";
pub const SANDBOX_MISMATCH_MESSAGE: &str = "Client ID is not SANDBOX mode";
pub const LIVE_MISMATCH_MESSAGE: &str = "Client ID is not LIVE mode";
pub const INVALID_PRIVATE_KEY_MESSAGE: &str = "Merchant private key is not valid";

const SUCCESS_STATUS: &str = "S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true, message: VALID_MESSAGE.to_string() }
    }

    pub fn rejected(message: &str) -> Self {
        Self { is_valid: false, message: message.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum ValidationFailure {
    #[error("fields are not properly filled in: {}", .missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },
    #[error("environment flag '{0}' is not recognised")]
    InvalidEnvironment(String),
    #[error("client id does not belong to the {expected} environment")]
    EnvironmentMismatch { expected: Environment },
    #[error("merchant private key could not be resolved")]
    SecretResolution,
    #[error("masked merchant private key submitted without a store id")]
    MissingStoreScope,
    #[error("gateway rejected credentials (status={status}, code={code})")]
    GatewayRejection { status: String, code: String, message: String },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ValidationFailure {
    /// Metrics label for the failure kind.
    pub fn outcome(&self) -> &'static str {
        match self {
            ValidationFailure::MissingFields { .. } => "missing_fields",
            ValidationFailure::InvalidEnvironment(_) => "invalid_environment",
            ValidationFailure::EnvironmentMismatch { .. } => "environment_mismatch",
            ValidationFailure::SecretResolution => "invalid_private_key",
            ValidationFailure::MissingStoreScope => "missing_store_id",
            ValidationFailure::GatewayRejection { .. } => "gateway_rejected",
            ValidationFailure::Unexpected(_) => "error",
        }
    }

    pub fn log(&self) {
        match self {
            ValidationFailure::MissingFields { missing } => {
                error!(?missing, "Fields are not properly filled in");
            }
            ValidationFailure::InvalidEnvironment(raw) => {
                error!(environment = %raw, "Fields are not properly filled in");
            }
            ValidationFailure::EnvironmentMismatch { expected } => {
                info!(%expected, "Client ID does not match selected environment");
            }
            ValidationFailure::SecretResolution => {
                warn!("Merchant private key is empty or could not be resolved");
            }
            ValidationFailure::MissingStoreScope => {
                error!("Masked merchant private key submitted without a store id");
            }
            ValidationFailure::GatewayRejection { status, code, message } => {
                error!(result_status = %status, result_code = %code, "{message}");
            }
            ValidationFailure::Unexpected(err) => {
                error!(error = ?err, "Unknown exception during credential validation");
            }
        }
    }
}

impl From<&ValidationFailure> for ValidationResult {
    fn from(failure: &ValidationFailure) -> Self {
        match failure {
            ValidationFailure::MissingFields { .. }
            | ValidationFailure::InvalidEnvironment(_)
            | ValidationFailure::GatewayRejection { .. } => {
                ValidationResult::rejected(CHECK_CONFIGURATION_MESSAGE)
            }
            ValidationFailure::EnvironmentMismatch { expected: Environment::Test } => {
                ValidationResult::rejected(SANDBOX_MISMATCH_MESSAGE)
            }
            ValidationFailure::EnvironmentMismatch { expected: Environment::Live } => {
                ValidationResult::rejected(LIVE_MISMATCH_MESSAGE)
            }
            ValidationFailure::SecretResolution => {
                ValidationResult::rejected(INVALID_PRIVATE_KEY_MESSAGE)
            }
            ValidationFailure::MissingStoreScope | ValidationFailure::Unexpected(_) => {
                ValidationResult::rejected(CHECK_CONFIGURATIONS_MESSAGE)
            }
        }
    }
}

/// Only an explicit `S` result status counts as a pass.
pub fn map_consult_response(response: &ConsultResponse) -> Result<(), ValidationFailure> {
    let result = &response.result;
    if result.result_status.as_deref() == Some(SUCCESS_STATUS) {
        return Ok(());
    }
    Err(ValidationFailure::GatewayRejection {
        status: result.result_status.clone().unwrap_or_default(),
        code: result.result_code.clone().unwrap_or_default(),
        message: result.result_message.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ConsultResult;
    use anyhow::anyhow;

    fn response(status: Option<&str>, message: &str) -> ConsultResponse {
        ConsultResponse {
            result: ConsultResult {
                result_status: status.map(str::to_string),
                result_code: Some("CODE".into()),
                result_message: Some(message.into()),
            },
        }
    }

    #[test]
    fn success_status_passes() {
        assert!(map_consult_response(&response(Some("S"), "success")).is_ok());
    }

    #[test]
    fn other_statuses_are_rejections() {
        for status in [Some("F"), Some("U"), Some("s"), None] {
            let err = map_consult_response(&response(status, "API Error")).expect_err("should reject");
            match &err {
                ValidationFailure::GatewayRejection { message, .. } => assert_eq!(message, "API Error"),
                other => panic!("unexpected failure {other:?}"),
            }
            assert_eq!(ValidationResult::from(&err), ValidationResult::rejected(CHECK_CONFIGURATION_MESSAGE));
        }
    }

    #[test]
    fn unexpected_failure_uses_plural_wording() {
        let failure = ValidationFailure::from(anyhow!("socket closed"));
        let result = ValidationResult::from(&failure);
        assert_eq!(result.message, CHECK_CONFIGURATIONS_MESSAGE);
        assert_ne!(CHECK_CONFIGURATION_MESSAGE, CHECK_CONFIGURATIONS_MESSAGE);
        assert!(!result.message.contains("socket"));
    }

    #[test]
    fn mismatch_messages_follow_expected_environment() {
        let test = ValidationFailure::EnvironmentMismatch { expected: Environment::Test };
        let live = ValidationFailure::EnvironmentMismatch { expected: Environment::Live };
        assert_eq!(ValidationResult::from(&test).message, SANDBOX_MISMATCH_MESSAGE);
        assert_eq!(ValidationResult::from(&live).message, LIVE_MISMATCH_MESSAGE);
    }

    #[test]
    fn missing_store_scope_takes_unexpected_wording() {
        let failure = ValidationFailure::MissingStoreScope;
        assert_eq!(ValidationResult::from(&failure).message, CHECK_CONFIGURATIONS_MESSAGE);
        assert_eq!(failure.outcome(), "missing_store_id");
    }

    #[test]
    fn result_serializes_camel_case() {
        let json = serde_json::to_value(ValidationResult::valid()).unwrap();
        assert_eq!(json, serde_json::json!({ "isValid": true, "message": "Configuration is valid." }));
    }
}
