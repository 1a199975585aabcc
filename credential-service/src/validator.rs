//! The credential check itself: input checks, key resolution, one signed
//! consult probe against the chosen gateway, then the verdict.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use tracing::{debug, info};

use crate::config::DEFAULT_PROBE_TIMEOUT_SECS;
use crate::env_info::RequestContext;
use crate::gateway::{ConsultRequest, GatewayCredentials, PaymentGateway};
use crate::metrics::ValidatorMetrics;
use crate::request::ValidationRequest;
use crate::secret::{resolve_private_key, ConfigStore};
use crate::verdict::{map_consult_response, ValidationFailure, ValidationResult};

const VALID_OUTCOME: &str = "valid";

pub struct CredentialValidator {
    config_store: Arc<dyn ConfigStore>,
    gateway: Arc<dyn PaymentGateway>,
    probe_timeout: Duration,
    metrics: Option<Arc<ValidatorMetrics>>,
}

impl CredentialValidator {
    pub fn new(config_store: Arc<dyn ConfigStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            config_store,
            gateway,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            metrics: None,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ValidatorMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Never fails: every problem becomes a negative verdict, with the detail
    /// going to the log only.
    pub async fn validate(
        &self,
        params: &HashMap<String, String>,
        context: &dyn RequestContext,
    ) -> ValidationResult {
        match self.run(params, context).await {
            Ok(()) => {
                info!("Antom credentials validated");
                self.record(VALID_OUTCOME);
                ValidationResult::valid()
            }
            Err(failure) => {
                failure.log();
                self.record(failure.outcome());
                ValidationResult::from(&failure)
            }
        }
    }

    async fn run(
        &self,
        params: &HashMap<String, String>,
        context: &dyn RequestContext,
    ) -> Result<(), ValidationFailure> {
        let request = ValidationRequest::from_params(params)?;
        request.check_environment()?;

        let merchant_private_key = resolve_private_key(
            self.config_store.as_ref(),
            &request.merchant_private_key,
            request.store_id,
            request.environment,
        )
        .await?;

        let credentials = GatewayCredentials {
            gateway_url: request.gateway_url,
            client_id: request.client_id,
            merchant_private_key,
            antom_public_key: request.antom_public_key,
        };
        let consult = ConsultRequest::probe(context.compose_env_info());

        debug!(
            client_id = %credentials.client_id,
            environment = %request.environment,
            store_id = ?request.store_id,
            "Probing Antom gateway"
        );
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.probe_timeout, self.gateway.consult(&credentials, &consult)).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_probe(started.elapsed());
        }

        let response = outcome
            .map_err(|_| anyhow!("gateway probe timed out after {:?}", self.probe_timeout))?
            .context("gateway probe failed")?;
        map_consult_response(&response)
    }

    fn record(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(outcome);
        }
    }
}
