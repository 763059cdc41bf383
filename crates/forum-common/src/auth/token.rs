//! Access-token verification
//!
//! The identity collaborator mints HS256 bearer tokens; the gateway only
//! needs to verify them and extract the actor id, so encoding lives in
//! tests alone.

use forum_core::Snowflake;
use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (actor ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Get the actor ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a Snowflake
    pub fn actor_id(&self) -> Result<Snowflake, AppError> {
        self.sub
            .parse::<i64>()
            .map(Snowflake::new)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Verifies bearer tokens presented at the gateway handshake
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    /// Create a verifier with the shared signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Decode and validate a bearer token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AppError> {
        let validation = Validation::default();

        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Verify a token and resolve the actor it identifies
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or carries a
    /// malformed subject
    pub fn verify_actor(&self, token: &str) -> Result<Snowflake, AppError> {
        self.verify(token)?.actor_id()
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}
