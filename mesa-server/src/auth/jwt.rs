//! JWT token service
//!
//! Validates HS256 bearer tokens and turns their claims into a [`CurrentUser`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HS256 secret (at least 32 bytes)
    pub secret: String,
    /// Lifetime of issued tokens, in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                tracing::warn!(
                    "JWT configuration error: {}. Using a random per-process secret; \
                     externally issued tokens will be rejected.",
                    e
                );
                generate_printable_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mesa-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mesa-server".to_string()),
        }
    }
}

impl JwtConfig {
    /// Fixed, environment-independent configuration for tests
    pub fn for_tests() -> Self {
        Self {
            secret: "mesa-test-secret-0123456789-abcdefghijklmnop".to_string(),
            expiration_minutes: 60,
            issuer: "mesa-auth".to_string(),
            audience: "mesa-server".to_string(),
        }
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    /// `admin` or `kitchen`; anything else is treated as a plain user
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Random 64-character alphanumeric secret
pub fn generate_printable_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() < 32 => Err(JwtError::ConfigError(
            "JWT_SECRET must be at least 32 characters long".to_string(),
        )),
        Ok(secret) => Ok(secret),
        Err(_) => Err(JwtError::ConfigError("JWT_SECRET is not set".to_string())),
    }
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token (tooling and tests; production tokens come from the auth provider)
    pub fn generate_token(&self, user_id: &str, username: &str, role: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate signature, expiry, issuer and audience, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Token part of an `Authorization: Bearer <token>` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Roles the HTTP layer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Kitchen,
    Other,
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "kitchen" => Role::Kitchen,
            _ => Role::Other,
        }
    }
}

/// Authenticated principal, taken from the token claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// Admin or kitchen staff
    pub fn is_staff(&self) -> bool {
        matches!(self.role(), Role::Admin | Role::Kitchen)
    }
}
