//! Antom request/response signatures: SHA256withRSA (PKCS#1 v1.5) over
//! `"{METHOD} {path}\n{clientId}.{time}.{body}"`, base64 encoded and
//! url-encoded inside the `Signature` header.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::gateway::GatewayError;

pub const SIGNATURE_ALGORITHM: &str = "RSA256";
pub const KEY_VERSION: &str = "1";

pub fn signing_content(method: &str, path: &str, client_id: &str, time: &str, body: &str) -> String {
    format!("{method} {path}\n{client_id}.{time}.{body}")
}

/// Accepts PEM, or bare base64 of a PKCS#8 or PKCS#1 DER key as pasted from
/// the Antom dashboard.
pub fn parse_private_key(raw: &str) -> Result<RsaPrivateKey, GatewayError> {
    let trimmed = raw.trim();
    if trimmed.starts_with("-----BEGIN") {
        return RsaPrivateKey::from_pkcs8_pem(trimmed)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(trimmed))
            .map_err(|err| GatewayError::PrivateKey(err.to_string()));
    }
    let der = decode_base64_body(trimmed).map_err(|err| GatewayError::PrivateKey(err.to_string()))?;
    RsaPrivateKey::from_pkcs8_der(&der)
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
        .map_err(|err| GatewayError::PrivateKey(err.to_string()))
}

pub fn parse_public_key(raw: &str) -> Result<RsaPublicKey, GatewayError> {
    let trimmed = raw.trim();
    if trimmed.starts_with("-----BEGIN") {
        return RsaPublicKey::from_public_key_pem(trimmed)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(trimmed))
            .map_err(|err| GatewayError::PublicKey(err.to_string()));
    }
    let der = decode_base64_body(trimmed).map_err(|err| GatewayError::PublicKey(err.to_string()))?;
    RsaPublicKey::from_public_key_der(&der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
        .map_err(|err| GatewayError::PublicKey(err.to_string()))
}

fn decode_base64_body(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64_STANDARD.decode(compact)
}

pub fn sign(private_key: &RsaPrivateKey, content: &str) -> Result<String, GatewayError> {
    let signing_key = SigningKey::<Sha256>::new(private_key.clone());
    let signature = signing_key
        .try_sign(content.as_bytes())
        .map_err(|err| GatewayError::PrivateKey(err.to_string()))?;
    Ok(BASE64_STANDARD.encode(signature.to_bytes()))
}

pub fn verify(public_key: &RsaPublicKey, content: &str, signature_b64: &str) -> bool {
    let Ok(bytes) = BASE64_STANDARD.decode(signature_b64.trim()) else {
        return false;
    };
    let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
        return false;
    };
    VerifyingKey::<Sha256>::new(public_key.clone())
        .verify(content.as_bytes(), &signature)
        .is_ok()
}

pub fn signature_header(signature_b64: &str) -> String {
    format!(
        "algorithm={SIGNATURE_ALGORITHM},keyVersion={KEY_VERSION},signature={}",
        urlencoding::encode(signature_b64)
    )
}

/// Pull the base64 signature out of a `Signature` header value.
pub fn extract_signature(header: &str) -> Option<String> {
    header
        .split(',')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("signature="))
        .and_then(|encoded| urlencoding::decode(encoded).ok())
        .map(|decoded| decoded.into_owned())
        .filter(|value| !value.is_empty())
}
