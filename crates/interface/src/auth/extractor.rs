//! Extractor del usuario autenticado
//!
//! Lee la cabecera `Authorization`, valida el token y expone la identidad
//! a los handlers. El rol exigido se comprueba por handler con `require`.

use crate::auth::jwt::{JwtError, extract_token_from_header};
use crate::http::{ApiError, AppState};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use denda_domain::iam::Role;
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::DomainError;

/// Cabecera opcional para propagar la correlación entre servicios
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Identidad extraída de un token válido
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
    correlation_id: Option<String>,
}

impl AuthenticatedUser {
    /// Rol de mayor privilegio entre los concedidos; los roles
    /// desconocidos se ignoran
    pub fn role(&self) -> Option<Role> {
        self.roles
            .iter()
            .filter_map(|raw| raw.parse::<Role>().ok())
            .max_by_key(|role| role.rank())
    }

    /// Rechaza la petición si el usuario no alcanza el rol requerido
    pub fn require(&self, required: Role) -> Result<(), ApiError> {
        match self.role() {
            Some(role) if role.allows(required) => Ok(()),
            _ => Err(ApiError::from(DomainError::InsufficientRole {
                required: required.to_string(),
                actual: self.roles.join(","),
            })),
        }
    }

    /// Contexto de la petición con el actor autenticado; conserva la
    /// correlación recibida en la cabecera si la hubo
    pub fn context(&self) -> RequestContext {
        let ctx = match &self.correlation_id {
            Some(correlation_id) => RequestContext::with_correlation_id(correlation_id.as_str()),
            None => RequestContext::new(),
        };
        ctx.actor(self.username.as_str())
    }

    #[cfg(test)]
    fn for_tests(username: &str, roles: Vec<String>, correlation_id: Option<String>) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            roles,
            correlation_id,
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized(JwtError::MissingHeader.to_string()))?;

        let token = extract_token_from_header(header)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;
        let claims = state
            .jwt
            .validate_token(token)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        Ok(Self {
            user_id: claims.subject,
            username: claims.username,
            roles: claims.roles,
            correlation_id,
        })
    }
}
