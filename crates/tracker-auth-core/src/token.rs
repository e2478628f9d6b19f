//! Signed session tokens
//!
//! Format: `base64url(claims_json) "." base64url(hmac_sha256(key, base64url(claims_json)))`,
//! unpadded. The MAC covers the encoded claims exactly as transmitted, so
//! nothing is parsed until the signature has been checked.
//!
//! Verification is stateless: no store lookup, no revocation list. Claims
//! are fixed at issuance, so a role change only takes effect on the next
//! login.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracker_types::{Role, UserId};

use crate::config::AuthConfig;
use crate::crypto::HmacKey;
use crate::AuthError;

/// Claims carried by a session token.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl TokenClaims {
    /// Expired at `now` (the expiry instant itself is already expired)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.expires_at
    }

    /// The identity these claims assert
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            role: self.role,
        }
    }

    /// Expiry as a timestamp
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires_at).single()
    }
}

/// Minimal authenticated identity a handler needs for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

/// Why a presented token was not accepted.
///
/// Callers only ever see `Unauthenticated`; the distinction exists for logs
/// and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no bearer token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
}

impl TokenError {
    /// Stable label for metrics
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::SignatureInvalid => "signature_invalid",
            Self::Expired => "expired",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::Unauthenticated
    }
}

/// A freshly minted token together with the claims it encodes
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Mints signed tokens
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: HmacKey,
    ttl_ms: i64,
}

impl TokenIssuer {
    pub fn new(key: HmacKey, ttl: Duration) -> Self {
        Self {
            key,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.signing_key.clone(), config.token_ttl)
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms.unsigned_abs())
    }

    /// Issue a token for `user_id` with `role`, valid from `now` for the TTL
    pub fn issue(
        &self,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let issued_at = now.timestamp_millis();
        let claims = TokenClaims {
            user_id,
            role,
            issued_at,
            expires_at: issued_at.saturating_add(self.ttl_ms),
        };

        let claims_json = serde_json::to_vec(&claims).map_err(|e| {
            tracing::error!("Failed to serialize token claims: {}", e);
            AuthError::Signing(e.to_string())
        })?;
        let payload = URL_SAFE_NO_PAD.encode(claims_json);
        let signature = URL_SAFE_NO_PAD.encode(self.key.sign(payload.as_bytes()));

        Ok(IssuedToken {
            token: format!("{payload}.{signature}"),
            claims,
        })
    }
}

/// Checks tokens minted by a [`TokenIssuer`] holding the same key
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: HmacKey,
}

impl TokenVerifier {
    pub fn new(key: HmacKey) -> Self {
        Self { key }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.signing_key.clone())
    }

    /// Verify a raw token at time `now`.
    ///
    /// Order: shape, then signature, then claims decoding, then expiry.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() || signature.is_empty() || signature.contains('.') {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::SignatureInvalid)?;
        if !self.key.verify(payload.as_bytes(), &signature) {
            return Err(TokenError::SignatureInvalid);
        }

        let claims_json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify an `Authorization` header value, collapsing every failure to
    /// [`AuthError::Unauthenticated`].
    ///
    /// The specific reason goes to the debug log and the rejection counter.
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        self.verify_bearer(authorization, now)
            .map_err(record_rejection)
    }

    /// Extract the bearer token from an `Authorization` header value and verify it
    pub fn verify_bearer(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let token = extract_bearer(authorization)?;
        self.verify(token, now)
    }
}

/// Log and count a rejected credential, collapsing it to
/// [`AuthError::Unauthenticated`]
pub fn record_rejection(reason: TokenError) -> AuthError {
    tracing::debug!(reason = reason.reason(), "Token rejected: {}", reason);
    metrics::counter!("auth_token_rejections_total", "reason" => reason.reason()).increment(1);
    AuthError::from(reason)
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// No header, or `Bearer` with nothing after it, is `Missing`. Any other
/// scheme is `Malformed`.
pub fn extract_bearer(authorization: Option<&str>) -> Result<&str, TokenError> {
    let value = authorization.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(TokenError::Missing);
    }

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        Err(TokenError::Missing)
    } else {
        Ok(token)
    }
}
