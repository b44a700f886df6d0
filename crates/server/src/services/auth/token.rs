//! Signed bearer tokens.
//!
//! A token is `base64url(claims).base64url(hmac-sha256(claims))` with the
//! claims carrying only the user id and an expiry timestamp. Verification is
//! stateless: signature check via `Mac::verify_slice` (constant-time), then
//! expiry.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use greenbasket_core::UserId;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Token claims: subject (user id) and expiry.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: UserId,
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
pub struct TokenService {
    secret: SecretString,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service with the given signing secret and lifetime.
    #[must_use]
    pub fn new(secret: SecretString, ttl_hours: i64) -> Self {
        Self {
            secret,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if the claims cannot be encoded.
    pub fn issue(&self, user_id: &UserId) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.clone(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| AuthError::TokenEncoding)?;
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token and extract the user id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` on structural or signature failure
    /// and `AuthError::TokenExpired` when the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let claims = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&claims).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims.sub)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| AuthError::TokenEncoding)
    }
}
