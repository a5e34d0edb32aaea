//! Manage json web tokens.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

type Result<T> = std::result::Result<T, jsonwebtoken::errors::Error>;

/// Sessions last 30 days. There is no refresh nor revocation, a token stays
/// valid until it expires.
pub const EXPIRATION_TIME: u64 = 60 * 60 * 24 * 30; // 30 days, in seconds.

/// Pieces of information asserted on a JWT.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identifies the expiration time on or after which the JWT must not be
    /// accepted for processing.
    pub exp: u64,
    /// Identifies the time at which the JWT was issued.
    pub iat: u64,
    /// Identifies the instance that issued the JWT.
    pub iss: String,
    /// User ID.
    pub sub: Uuid,
}

/// Manage JWT tokens, signed with a process-wide HMAC secret.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    name: String,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance.
    pub fn new(name: &str, secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            name: name.to_owned(),
        }
    }

    /// Create a new [`jsonwebtoken`].
    pub fn create(&self, user_id: Uuid) -> Result<String> {
        let now = get_current_timestamp();
        let header = Header::new(self.algorithm);
        let claims = Claims {
            exp: now + EXPIRATION_TIME,
            iat: now,
            iss: self.name.clone(),
            sub: user_id,
        };

        encode(&header, &claims, &self.encoding_key)
    }

    /// Decode and check a token, signature, expiry and issuer included.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.name]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }
}
