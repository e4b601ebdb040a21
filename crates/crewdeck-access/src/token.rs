use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AccessError, Result};
use crate::types::{Claims, Operator};

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies bearer tokens of the form
/// `base64url(claims JSON) "." hex(HMAC-SHA256(secret, payload))`.
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_hours: u32) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    pub fn issue(&self, operator: &Operator) -> Result<String> {
        self.issue_at(operator, Utc::now())
    }

    pub fn issue_at(&self, operator: &Operator, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: operator.username.clone(),
            role: operator.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let json = serde_json::to_vec(&claims).map_err(|_| AccessError::InvalidToken)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature first, then expiry. Every failure is the same
    /// `InvalidToken` so callers cannot tell which part was wrong.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let (payload, signature) = token.split_once('.').ok_or(AccessError::InvalidToken)?;
        let expected = hex::decode(signature).map_err(|_| AccessError::InvalidToken)?;
        self.mac(payload)?
            .verify_slice(&expected)
            .map_err(|_| AccessError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AccessError::InvalidToken)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AccessError::InvalidToken)?;

        if claims.exp <= now.timestamp() {
            return Err(AccessError::InvalidToken);
        }
        Ok(claims)
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| AccessError::InvalidToken)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}
