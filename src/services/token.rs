//! User token minting.
//!
//! The backend authenticates users with HS256 JWTs signed by the application
//! secret. Fixture runs use development-style tokens: a bare `user_id` claim
//! and no expiry, matching what the vendor SDKs call dev tokens.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Service for minting user tokens.
#[derive(Clone)]
pub struct TokenService {
    key: EncodingKey,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: String,
}

impl TokenService {
    /// Create a new token service from the application secret.
    pub fn new(api_secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(api_secret.as_bytes()),
        }
    }

    /// Mint a token for the given user id.
    pub fn user_token(&self, user_id: &str) -> Result<String> {
        let claims = UserClaims {
            user_id: user_id.to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)?;
        Ok(token)
    }
}
