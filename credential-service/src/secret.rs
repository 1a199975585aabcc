use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::request::Environment;
use crate::verdict::ValidationFailure;

/// The admin form echoes stored keys back with this run of asterisks in place
/// of the secret body.
pub const MASK_MARKER: &str = "****";

/// Scope that store-level configuration falls back to.
pub const DEFAULT_SCOPE: i64 = 0;

#[derive(Debug, Clone)]
pub enum MerchantPrivateKey {
    Literal(SecretString),
    Masked,
}

impl MerchantPrivateKey {
    pub fn from_raw(raw: &str) -> Self {
        if raw.contains(MASK_MARKER) {
            MerchantPrivateKey::Masked
        } else {
            MerchantPrivateKey::Literal(SecretString::new(raw.to_string()))
        }
    }
}

/// Read access to the merchant keys saved in the platform configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn merchant_private_key(
        &self,
        store_id: i64,
        environment: Environment,
    ) -> Result<Option<SecretString>>;
}

/// Keys held in memory, keyed by `(store_id, environment)`. Lookups for a
/// store without its own key fall back to [`DEFAULT_SCOPE`].
#[derive(Default)]
pub struct InMemoryConfigStore {
    keys: RwLock<HashMap<(i64, Environment), SecretString>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default-scope keys from the service environment.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let mut store = Self::new();
        if let Some(key) = &config.sandbox_private_key {
            store = store.with_key(DEFAULT_SCOPE, Environment::Test, key.clone());
        }
        if let Some(key) = &config.live_private_key {
            store = store.with_key(DEFAULT_SCOPE, Environment::Live, key.clone());
        }
        store
    }

    pub fn with_key(mut self, store_id: i64, environment: Environment, key: SecretString) -> Self {
        self.keys.get_mut().insert((store_id, environment), key);
        self
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn merchant_private_key(
        &self,
        store_id: i64,
        environment: Environment,
    ) -> Result<Option<SecretString>> {
        let guard = self.keys.read().await;
        let key = guard
            .get(&(store_id, environment))
            .or_else(|| guard.get(&(DEFAULT_SCOPE, environment)))
            .cloned();
        Ok(key)
    }
}

/// Turn the submitted key into the literal secret used for signing.
///
/// Masked values are replaced by the stored key for `(store_id, environment)`
/// and cannot be resolved without a store id. An empty result, whether literal
/// or looked up, is a resolution failure; errors from the store itself are
/// unexpected failures.
pub async fn resolve_private_key(
    store: &dyn ConfigStore,
    key: &MerchantPrivateKey,
    store_id: Option<i64>,
    environment: Environment,
) -> Result<SecretString, ValidationFailure> {
    let resolved = match key {
        MerchantPrivateKey::Literal(secret) => Some(secret.clone()),
        MerchantPrivateKey::Masked => {
            let store_id = store_id.ok_or(ValidationFailure::MissingStoreScope)?;
            debug!(store_id, %environment, "Resolving masked merchant private key from configuration");
            store.merchant_private_key(store_id, environment).await?
        }
    };

    // Whitespace-only keys count as empty and never reach the gateway.
    resolved
        .filter(|secret| !secret.expose_secret().trim().is_empty())
        .ok_or(ValidationFailure::SecretResolution)
}
