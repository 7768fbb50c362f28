//! services/api/src/adapters/token.rs
//!
//! Signed, expiring bearer tokens.
//!
//! Format: `v1.<base64url(claims json)>.<base64url(hmac-sha256 of the payload part)>`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use oceanus_core::domain::{Claims, User};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION_V1: &str = "v1";
const MAX_TOKEN_LEN: usize = 2048;

/// Lifetime of a normal login and of every refreshed token.
pub const SHORT_LIVED_SECS: u64 = 3600;
/// Lifetime of a "remember me" login.
pub const REMEMBER_ME_SECS: u64 = 7 * 24 * 3600;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    InvalidFormat,
    #[error("unsupported token version")]
    UnsupportedVersion,
    #[error("token signature mismatch")]
    InvalidSignature,
    #[error("invalid token payload: {0}")]
    InvalidPayload(String),
    #[error("token expired")]
    Expired,
}

#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mints a token for `user` valid for `ttl_secs` from `now`.
    pub fn issue(
        &self,
        user: &User,
        ttl_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: now.timestamp() + ttl_secs as i64,
        };
        let payload_bytes =
            serde_json::to_vec(&claims).map_err(|e| TokenError::InvalidPayload(e.to_string()))?;
        let payload_part = URL_SAFE_NO_PAD.encode(payload_bytes);
        let sig_part = URL_SAFE_NO_PAD.encode(self.sign(&payload_part)?);
        Ok(format!("{}.{}.{}", TOKEN_VERSION_V1, payload_part, sig_part))
    }

    /// Checks signature and expiry and returns the embedded claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::InvalidFormat);
        }
        let (payload_part, sig_part) = match token.split('.').collect::<Vec<_>>().as_slice() {
            [version, payload, sig] if *version == TOKEN_VERSION_V1 => (*payload, *sig),
            [_, _, _] => return Err(TokenError::UnsupportedVersion),
            _ => return Err(TokenError::InvalidFormat),
        };

        let expected = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| TokenError::InvalidFormat)?;
        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| TokenError::InvalidFormat)?;
        let claims: Claims = serde_json::from_slice(&payload_bytes)
            .map_err(|e| TokenError::InvalidPayload(e.to_string()))?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, payload_part: &str) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| TokenError::InvalidPayload(e.to_string()))
    }
}
