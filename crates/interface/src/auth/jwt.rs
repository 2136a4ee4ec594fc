//! Emisión y validación de tokens JWT
//!
//! Los tokens se firman con HS256 y llevan siempre emisor y expiración;
//! la validación exige ambos. Se extraen de la cabecera `Authorization`
//! con el esquema Bearer.

use chrono::{Duration, Utc};
use denda_domain::iam::{IssuedToken, TokenIssuer, UserAccount};
use denda_domain::shared_kernel::DomainError;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Claims de los tokens de acceso de la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Identificador de la cuenta
    #[serde(rename = "sub")]
    pub subject: String,
    /// Nombre de usuario
    pub username: String,
    /// Roles concedidos
    pub roles: Vec<String>,
    /// Expiración (segundos Unix)
    pub exp: u64,
    /// Momento de emisión (segundos Unix)
    pub iat: u64,
    /// Emisor del token
    pub iss: String,
}

/// Errores de emisión y validación de tokens
#[derive(Debug, Error, PartialEq)]
pub enum JwtError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format")]
    InvalidHeaderFormat,

    #[error("Invalid token scheme (expected Bearer)")]
    InvalidScheme,

    #[error("Token validation failed: {0}")]
    ValidationFailed(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token issuer")]
    InvalidIssuer,

    #[error("Token decoding failed: {0}")]
    DecodeError(String),

    #[error("Token encoding failed: {0}")]
    EncodeError(String),
}

/// Configuración JWT compartida por emisor y validador
#[derive(Clone)]
pub struct JwtConfig {
    /// Clave de firma
    secret: Vec<u8>,
    /// Emisor esperado
    issuer: String,
    /// Vida del token en segundos
    ttl_seconds: i64,
    /// Algoritmos admitidos
    algorithms: Vec<Algorithm>,
}

impl JwtConfig {
    pub const DEFAULT_TTL_SECONDS: i64 = 3600;

    pub fn new(secret: impl Into<Vec<u8>>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            ttl_seconds: Self::DEFAULT_TTL_SECONDS,
            algorithms: vec![Algorithm::HS256],
        }
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Emite un token firmado para la cuenta indicada
    pub fn issue_token(&self, account: &UserAccount) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.ttl_seconds);

        let claims = JwtClaims {
            subject: account.id.to_string(),
            username: account.username.to_string(),
            roles: vec![account.role.to_string()],
            exp: expires_at.timestamp() as u64,
            iat: now.timestamp() as u64,
            iss: self.issuer.clone(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| JwtError::EncodeError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Valida un token y devuelve sus claims
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, JwtError> {
        debug!("Validating JWT token");

        let header = decode_header(token)
            .map_err(|e| JwtError::DecodeError(format!("Failed to decode header: {}", e)))?;

        if !self.algorithms.contains(&header.alg) {
            return Err(JwtError::ValidationFailed(format!(
                "Unsupported algorithm: {:?}",
                header.alg
            )));
        }

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.issuer]);

        let decoding_key = DecodingKey::from_secret(&self.secret);

        decode::<JwtClaims>(token, &decoding_key, &validation)
            .map(|token_data| {
                debug!(subject = %token_data.claims.subject, "Token validated");
                token_data.claims
            })
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    warn!("Token has expired");
                    JwtError::ExpiredToken
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    warn!("Invalid token signature");
                    JwtError::InvalidSignature
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    warn!("Invalid token issuer");
                    JwtError::InvalidIssuer
                }
                _ => {
                    let message = e.to_string();
                    warn!(error = %message, "Token validation failed");
                    JwtError::ValidationFailed(message)
                }
            })
    }
}

impl TokenIssuer for JwtConfig {
    fn issue(&self, account: &UserAccount) -> denda_domain::shared_kernel::Result<IssuedToken> {
        self.issue_token(account)
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to issue token: {}", e),
            })
    }
}

/// Extrae el token de la cabecera `Authorization`
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, JwtError> {
    if !auth_header.starts_with("Bearer ") {
        warn!("Invalid authorization scheme");
        return Err(JwtError::InvalidScheme);
    }

    let token = auth_header.trim_start_matches("Bearer ");

    if token.is_empty() {
        warn!("Empty token after Bearer prefix");
        return Err(JwtError::InvalidHeaderFormat);
    }

    Ok(token)
}
