use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing Bearer token")]
    TokenMissing,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 bearer tokens for the single configured identity.
///
/// Verification is stateless: there is no session store and tokens cannot be
/// revoked before their `exp`.
#[derive(Clone)]
pub struct Authenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl Authenticator {
    pub fn new(security: &SecurityConfig) -> Self {
        let secret = security.jwt_secret.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(security.token_ttl_secs),
            username_digest: digest(&security.admin_username),
            password_digest: digest(&security.admin_password),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        self.login_at(username, password, Utc::now())
    }

    pub fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        if !self.credentials_match(username, password) {
            return Err(AuthError::InvalidCredentials);
        }
        self.issue_at(username, now)
    }

    /// Sign a token for `subject` as if issued at `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature and shape, then compare `exp` against `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::TokenInvalid)?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn credentials_match(&self, username: &str, password: &str) -> bool {
        let user = digest(username);
        let pass = digest(password);
        let user_ok = user.as_slice().ct_eq(self.username_digest.as_slice());
        let pass_ok = pass.as_slice().ct_eq(self.password_digest.as_slice());
        (user_ok & pass_ok).into()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
