//! Chrome extension ID derivation.
//!
//! The ID is the first 128 bits of the SHA-256 of the DER-encoded public key, written
//! as 32 hex digits with `0-f` mapped onto `a-p`.

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use sha2::{Digest, Sha256};

const PEM_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_END: &str = "-----END PUBLIC KEY-----";

/// Number of hash bytes that make up an ID.
const ID_BYTES: usize = 16;

pub fn extension_id_from_der(der: &[u8]) -> String {
    let digest = Sha256::digest(der);
    hex::encode(&digest[..ID_BYTES])
        .chars()
        .map(|c| match c.to_digit(16) {
            Some(d) => char::from(b'a' + d as u8),
            None => c,
        })
        .collect()
}

/// Decode a PEM `PUBLIC KEY` block into DER bytes.
pub fn der_from_pem(pem: &str) -> Result<Vec<u8>> {
    let start = pem
        .find(PEM_BEGIN)
        .ok_or_else(|| anyhow!("Missing '{}' header", PEM_BEGIN))?
        + PEM_BEGIN.len();
    let end = pem[start..]
        .find(PEM_END)
        .ok_or_else(|| anyhow!("Missing '{}' footer", PEM_END))?
        + start;

    let body: String = pem[start..end].chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(body)
        .context("PEM body is not valid base64")
}

/// Accept either a PEM document or raw DER bytes.
pub fn extension_id_from_key(key: &[u8]) -> Result<String> {
    let der = match std::str::from_utf8(key) {
        Ok(text) if text.contains(PEM_BEGIN) => der_from_pem(text)?,
        _ => key.to_vec(),
    };
    if der.is_empty() {
        return Err(anyhow!("Public key is empty"));
    }
    Ok(extension_id_from_der(&der))
}
