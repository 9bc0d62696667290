use crate::error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token. The subject is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
}

impl Claims {
    #[must_use]
    pub const fn new(sub: i64, exp: usize) -> Self {
        Self { sub, exp }
    }
}

#[derive(Debug, Clone)]
pub struct Jwt(pub String);

impl Jwt {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An issued access token together with its expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: i64,
}

/// Signs the claims into a compact JWT.
///
/// # Errors
/// Returns `AppError::Internal` if signing fails.
pub fn encode_jwt(claims: &Claims, secret: &str) -> Result<Jwt> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map(Jwt)
        .map_err(|_| AppError::Internal)
}

/// Verifies a JWT access token and returns its claims.
///
/// # Errors
/// Returns `AppError::AuthError` if the token is invalid or expired.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::AuthError)
}
