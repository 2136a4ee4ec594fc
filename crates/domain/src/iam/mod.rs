//! IAM Bounded Context
//!
//! Cuentas de usuario, roles y puertos de autenticación

pub mod auth;
pub mod role;
pub mod user;

pub use auth::*;
pub use role::*;
pub use user::*;
