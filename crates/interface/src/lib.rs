// Denda Admin - Interface Layer
// API REST con Axum: rutas, autenticación JWT y métricas

pub mod auth;
pub mod http;

// Re-exports
pub use auth::extractor::AuthenticatedUser;
pub use auth::jwt::{JwtClaims, JwtConfig, JwtError, extract_token_from_header};
pub use http::{ApiError, ApiResponse, AppState, create_router};
pub use http::metrics::MetricsRegistry;
