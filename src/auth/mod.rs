use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims valid for the configured `jwt_expiry_hours`
    pub fn new(subject: impl Into<String>, security: &SecurityConfig) -> Result<Self, JwtError> {
        let hours = i64::try_from(security.jwt_expiry_hours)
            .map_err(|_| JwtError::InvalidExpiry(security.jwt_expiry_hours.to_string()))?;
        Self::with_expiry(subject, security, hours)
    }

    /// Negative `hours` yields an already expired token.
    pub fn with_expiry(
        subject: impl Into<String>,
        security: &SecurityConfig,
        hours: i64,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = Duration::try_hours(hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::InvalidExpiry(hours.to_string()))?;

        Ok(Self {
            sub: subject.into(),
            iss: security.jwt_issuer.clone(),
            aud: security.jwt_audience.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Whether a token lifetime of `hours` can be represented as an expiry timestamp
pub fn expiry_in_range(hours: u64) -> bool {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .is_some()
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Token lifetime out of range: {0} hours")]
    InvalidExpiry(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature, expiry, issuer and audience, returning the claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.set_issuer(&[&security.jwt_issuer]);
    validation.set_audience(&[&security.jwt_audience]);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}
