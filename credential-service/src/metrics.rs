use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct ValidatorMetrics {
    registry: Registry,
    validations: IntCounterVec,
    probe_latency: Histogram,
}

impl ValidatorMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let validations = IntCounterVec::new(
            Opts::new(
                "antom_credential_validations_total",
                "Credential validations grouped by outcome",
            ),
            &["outcome"],
        )?;
        let probe_latency = Histogram::with_opts(
            HistogramOpts::new(
                "antom_consult_probe_seconds",
                "Latency of the Antom consult probe",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(validations.clone()))?;
        registry.register(Box::new(probe_latency.clone()))?;
        Ok(Self {
            registry,
            validations,
            probe_latency,
        })
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.validations.with_label_values(&[outcome]).inc();
    }

    pub fn observe_probe(&self, elapsed: Duration) {
        self.probe_latency.observe(elapsed.as_secs_f64());
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.validations.with_label_values(&[outcome]).get()
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
