pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;

/// The authenticated identity a token speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub auth_user_id: Uuid,
    pub auth_user_role: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            auth_user_id: user.id,
            auth_user_role: user.role.role_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub jti: String,
    pub iss: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    Generation(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 tokens for [`Principal`]s.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, expiry_hours: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            expiry: Duration::hours(expiry_hours as i64),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        Self::new(&security.jwt_secret, security.jwt_issuer.clone(), security.jwt_expiry_hours)
    }

    pub fn generate_token(&self, principal: &Principal) -> Result<String, TokenError> {
        self.generate_token_at(principal, Utc::now())
    }

    fn generate_token_at(&self, principal: &Principal, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            jti: principal.auth_user_id.to_string(),
            iss: self.issuer.clone(),
            role: principal.auth_user_role.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.expiry).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// `None` for forged, foreign, expired or malformed tokens.
    pub fn extract_token_details(&self, token: &str) -> Option<Principal> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejected token: {}", e);
                return None;
            }
        };

        let auth_user_id = Uuid::parse_str(&claims.jti).ok()?;
        Some(Principal { auth_user_id, auth_user_role: claims.role })
    }

    pub fn is_token_valid(&self, token: &str) -> bool {
        self.extract_token_details(token).is_some()
    }
}
