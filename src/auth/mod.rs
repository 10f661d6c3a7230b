pub mod password;

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password, PasswordError};

/// Token payload: the subject id and email of the user it was issued to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token validity of {0} hours is out of range")]
    InvalidValidity(u64),
}

/// Issues and verifies signed bearer tokens
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<Keys>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenService {
    pub fn new(secret: &str, validity: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        Ok(Self {
            inner: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                validity,
            }),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        let validity = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or(TokenError::InvalidValidity(security.jwt_expiry_hours))?;
        Self::new(&security.jwt_secret, validity)
    }

    pub fn issue(&self, id: i64, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.inner.validity)
            .ok_or_else(|| TokenError::Generation("token expiry out of range".to_string()))?;
        let claims = Claims {
            id,
            email: email.to_string(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.inner.encoding)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Check signature, structure and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.inner.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
