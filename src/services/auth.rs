//! Bearer token validation.
//!
//! Tokens are issued elsewhere; this service only checks them. Validation is
//! HS256 with a shared secret, an expiry check and optional issuer/audience
//! checks. The `role` claim decides what the caller may do.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

/// Minimum secret key length accepted at startup
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret must be at least {MIN_SECRET_LENGTH} characters (got {0})")]
    WeakSecret(usize),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid subject claim: {0}")]
    InvalidSubject(String),
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

/// JWT authenticator for validating bearer tokens
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    pub fn new(
        secret: &str,
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::WeakSecret(secret.len()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation,
        })
    }

    /// Decode and verify a raw token
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Resolve the caller from an `Authorization` header value
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.validate(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidSubject(claims.sub.clone()))?;

        Ok(Principal {
            user_id,
            role: claims.role,
        })
    }
}
