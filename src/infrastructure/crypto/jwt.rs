//! HS256 access tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    /// Written to `iss` and required on verification
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            issuer: "fieldops".to_string(),
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expiresIn`.
    pub fn ttl_secs(&self) -> i64 {
        self.expiration_hours * 3600
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation
    }
}

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Wire form of [`UserRole`]
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl AccessClaims {
    pub fn new(sub: &str, email: &str, role: &str, config: &JwtConfig) -> Self {
        let issued_at = Utc::now();
        Self {
            sub: sub.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(config.expiration_hours)).timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn for_user(user: &User, config: &JwtConfig) -> Self {
        Self::new(&user.id, &user.email, user.role.as_str(), config)
    }

    /// `None` when the token names a role this service does not know.
    pub fn role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }
}

pub fn sign(claims: &AccessClaims, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Checks signature, expiry and issuer.
pub fn verify(token: &str, config: &JwtConfig) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}
