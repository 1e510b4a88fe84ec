//! HS256 bearer tokens carrying the account id.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue_token(secret: &str, account_id: Uuid, email: &str, now: DateTime<Utc>, ttl: Duration) -> Result<String, AuthError> {
    let claims = Claims {
        sub: email.to_string(),
        uid: account_id,
        iat: now.timestamp().max(0) as usize,
        exp: (now + ttl).timestamp().max(0) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Check signature, then expiry against `now`; returns the account id.
pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked against the injected clock below
    validation.validate_exp = false;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    if data.claims.exp as i64 <= now.timestamp() {
        return Err(AuthError::Unauthorized);
    }
    Ok(data.claims.uid)
}
