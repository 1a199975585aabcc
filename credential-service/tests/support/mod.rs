#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use credential_service::gateway::{
    ConsultRequest, ConsultResponse, ConsultResult, GatewayCredentials, GatewayError, PaymentGateway,
};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::rand_core::OsRng;
use rsa::RsaPrivateKey;
use secrecy::ExposeSecret;
use tracing::subscriber::DefaultGuard;
use tracing::Level;

pub const GATEWAY_URL: &str = "https://open-na-global.alipay.com";

pub fn merchant_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).expect("generate merchant key"))
}

pub fn antom_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).expect("generate antom key"))
}

/// Base64 PKCS#8 DER, the format the Antom dashboard hands out.
pub fn private_key_b64(key: &RsaPrivateKey) -> String {
    BASE64_STANDARD.encode(key.to_pkcs8_der().expect("encode private key").as_bytes())
}

pub fn public_key_b64(key: &RsaPrivateKey) -> String {
    let der = key.to_public_key().to_public_key_der().expect("encode public key");
    BASE64_STANDARD.encode(der.as_bytes())
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn valid_params(client_id: &str, environment: &str, private_key: &str) -> HashMap<String, String> {
    params(&[
        ("clientId", client_id),
        ("environment", environment),
        ("merchantPrivateKey", private_key),
        ("antomPublicKey", "test_public_key"),
        ("gatewayUrl", GATEWAY_URL),
        ("storeId", "1"),
    ])
}

pub fn consult_response(status: &str, code: &str, message: &str) -> ConsultResponse {
    ConsultResponse {
        result: ConsultResult {
            result_status: Some(status.to_string()),
            result_code: Some(code.to_string()),
            result_message: Some(message.to_string()),
        },
    }
}

#[derive(Clone)]
pub enum Reply {
    Result(ConsultResponse),
    Fail(String),
    Hang,
}

#[derive(Debug, Clone)]
pub struct SeenCall {
    pub gateway_url: String,
    pub client_id: String,
    pub merchant_private_key: String,
    pub terminal_type: String,
}

/// Gateway double returning a fixed reply and recording what it was sent.
pub struct ScriptedGateway {
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<SeenCall>>,
}

impl ScriptedGateway {
    pub fn new(reply: Reply) -> Self {
        Self { reply, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) }
    }

    pub fn status(status: &str) -> Self {
        Self::new(Reply::Result(consult_response(status, "CODE", "gateway message")))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenCall> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn consult(
        &self,
        credentials: &GatewayCredentials,
        request: &ConsultRequest,
    ) -> Result<ConsultResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(SeenCall {
            gateway_url: credentials.gateway_url.clone(),
            client_id: credentials.client_id.clone(),
            merchant_private_key: credentials.merchant_private_key.expose_secret().clone(),
            terminal_type: request.env.terminal_type.clone(),
        });
        match &self.reply {
            Reply::Result(response) => Ok(response.clone()),
            Reply::Fail(message) => Err(GatewayError::Transport(message.clone())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(GatewayError::Transport("hung gateway finally gave up".into()))
            }
        }
    }
}

/// Collects formatted log lines written while the returned guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self, level: Level) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(level)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
