use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::secret::MerchantPrivateKey;
use crate::verdict::ValidationFailure;

pub const CLIENT_ID_PARAM: &str = "clientId";
pub const ENVIRONMENT_PARAM: &str = "environment";
pub const MERCHANT_PRIVATE_KEY_PARAM: &str = "merchantPrivateKey";
pub const ANTOM_PUBLIC_KEY_PARAM: &str = "antomPublicKey";
pub const GATEWAY_URL_PARAM: &str = "gatewayUrl";
pub const STORE_ID_PARAM: &str = "storeId";

pub const REQUIRED_PARAMS: [&str; 5] = [
    CLIENT_ID_PARAM,
    ENVIRONMENT_PARAM,
    MERCHANT_PRIVATE_KEY_PARAM,
    ANTOM_PUBLIC_KEY_PARAM,
    GATEWAY_URL_PARAM,
];

/// Client ids issued for the sandbox all carry this prefix.
pub const SANDBOX_PREFIX: &str = "SANDBOX";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Test,
    Live,
}

impl Environment {
    /// Admin form flag: `0` sandbox, `1` live.
    pub fn from_flag(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(Environment::Test),
            "1" => Some(Environment::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "sandbox",
            Environment::Live => "live",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials submitted from the payment configuration screen.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub client_id: String,
    pub environment: Environment,
    pub merchant_private_key: MerchantPrivateKey,
    pub antom_public_key: String,
    pub gateway_url: String,
    /// Only needed to resolve a masked key.
    pub store_id: Option<i64>,
}

impl ValidationRequest {
    /// Presence check over the raw admin parameters. A key that is present
    /// with an empty value counts as present; emptiness is judged later.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationFailure> {
        let missing: Vec<&'static str> = REQUIRED_PARAMS
            .iter()
            .copied()
            .filter(|name| !params.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationFailure::MissingFields { missing });
        }

        let raw_environment = &params[ENVIRONMENT_PARAM];
        let environment = Environment::from_flag(raw_environment)
            .ok_or_else(|| ValidationFailure::InvalidEnvironment(raw_environment.clone()))?;

        let store_id = params
            .get(STORE_ID_PARAM)
            .and_then(|value| value.trim().parse::<i64>().ok());

        Ok(Self {
            client_id: params[CLIENT_ID_PARAM].clone(),
            environment,
            merchant_private_key: MerchantPrivateKey::from_raw(&params[MERCHANT_PRIVATE_KEY_PARAM]),
            antom_public_key: params[ANTOM_PUBLIC_KEY_PARAM].clone(),
            gateway_url: params[GATEWAY_URL_PARAM].clone(),
            store_id,
        })
    }

    /// Sandbox client ids must be used with the test environment and only there.
    pub fn check_environment(&self) -> Result<(), ValidationFailure> {
        let sandbox_client = self.client_id.starts_with(SANDBOX_PREFIX);
        match self.environment {
            Environment::Test if !sandbox_client => Err(ValidationFailure::EnvironmentMismatch {
                expected: Environment::Test,
            }),
            Environment::Live if sandbox_client => Err(ValidationFailure::EnvironmentMismatch {
                expected: Environment::Live,
            }),
            _ => Ok(()),
        }
    }
}
