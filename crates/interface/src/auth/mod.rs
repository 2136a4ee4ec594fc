//! Autenticación de la API
//!
//! Tokens JWT firmados con HS256 y extracción del usuario autenticado.

pub mod extractor;
pub mod jwt;

pub use extractor::*;
pub use jwt::*;
