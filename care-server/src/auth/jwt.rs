//! JWT 签发与校验 (HS256)

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::UserRole;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// 有效期 (分钟)
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

/// 令牌载荷; `sub` 为 "user:xyz"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("令牌已过期")]
    Expired,

    #[error("令牌无效: {0}")]
    Rejected(String),

    #[error("令牌签发失败: {0}")]
    Signing(String),
}

/// 已认证的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}

pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_minutes: i64,
    issuer: String,
    audience: String,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl_minutes: config.expiration_minutes,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    pub fn issue(&self, user: &CurrentUser) -> Result<String, JwtError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: iat + self.ttl_seconds(),
            iat,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<CurrentUser, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Rejected(e.to_string()),
            })?
            .claims;

        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_minutes * 60
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish_non_exhaustive()
    }
}
