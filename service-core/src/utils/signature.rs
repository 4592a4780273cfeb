//! Timestamped HMAC-SHA256 webhook signatures.
//!
//! Header format: `t=<unix seconds>,v1=<lowercase hex digest>`, where the
//! digest is `HMAC-SHA256(secret, "{t}.{payload}")` over the raw request body.
//! Verification is stateless: a fresh, valid delivery replayed inside the
//! tolerance window is accepted again.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum age (and clock skew) of a signed delivery, in seconds.
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid signature format")]
    Malformed,

    #[error("Timestamp outside tolerance window")]
    Expired,

    #[error("Signature mismatch")]
    Mismatch,

    #[error("Invalid key length")]
    InvalidKey,
}

/// Parsed `t=...,v1=...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    /// Timestamp exactly as sent; the signed string uses this text, not a re-rendering.
    pub timestamp_raw: &'a str,
    pub timestamp: i64,
    pub v1: &'a str,
}

impl<'a> SignatureHeader<'a> {
    /// Parse a signature header.
    ///
    /// Segments are split on `,` and each on its first `=`, with whitespace
    /// trimmed. Blank segments are skipped, unknown keys ignored, and the first
    /// occurrence of a key wins. A segment without `=`, a non-numeric `t`, or a
    /// missing `t`/`v1` makes the whole header malformed.
    pub fn parse(header: &'a str) -> Result<Self, SignatureError> {
        let mut timestamp_raw = None;
        let mut v1 = None;

        for segment in header.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (key, value) = segment.split_once('=').ok_or(SignatureError::Malformed)?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "t" if timestamp_raw.is_none() => timestamp_raw = Some(value),
                "v1" if v1.is_none() => v1 = Some(value),
                _ => {}
            }
        }

        let timestamp_raw = timestamp_raw
            .filter(|t| !t.is_empty())
            .ok_or(SignatureError::Malformed)?;
        let v1 = v1.filter(|v| !v.is_empty()).ok_or(SignatureError::Malformed)?;

        let timestamp = timestamp_raw
            .parse::<i64>()
            .map_err(|_| SignatureError::Malformed)?;

        Ok(Self {
            timestamp_raw,
            timestamp,
            v1,
        })
    }
}

/// Compute the lowercase hex HMAC-SHA256 of `"{timestamp}.{payload}"`.
pub fn compute_signature(
    secret: &str,
    timestamp: &str,
    payload: &[u8],
) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;

    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a complete signature header for `payload` signed at `timestamp`.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
    let ts = timestamp.to_string();
    let digest = compute_signature(secret, &ts, payload)?;
    Ok(format!("t={},v1={}", ts, digest))
}

/// Length-checked constant-time comparison.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

/// Check a signature header against `payload` at the given wall-clock time.
///
/// `payload` must be the body exactly as received.
pub fn check_signature_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_seconds: u64,
    now: i64,
) -> Result<(), SignatureError> {
    let parsed = SignatureHeader::parse(header)?;

    if now.abs_diff(parsed.timestamp) > tolerance_seconds {
        return Err(SignatureError::Expired);
    }

    let expected = compute_signature(secret, parsed.timestamp_raw, payload)?;

    if !constant_time_eq(expected.as_bytes(), parsed.v1.as_bytes()) {
        return Err(SignatureError::Mismatch);
    }

    Ok(())
}

/// Same as [`check_signature_at`] using the current time.
pub fn check_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_seconds: u64,
) -> Result<(), SignatureError> {
    check_signature_at(
        payload,
        header,
        secret,
        tolerance_seconds,
        chrono::Utc::now().timestamp(),
    )
}

/// Boolean verdict: true only if the header is well-formed, fresh and matching.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str, tolerance_seconds: u64) -> bool {
    check_signature(payload, header, secret, tolerance_seconds).is_ok()
}
