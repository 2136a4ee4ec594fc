//! IAM Use Cases
//!
//! Registro, autenticación y administración de cuentas

pub mod login;
pub mod manage;
pub mod register;

pub use login::*;
pub use manage::*;
pub use register::*;

use denda_domain::iam::UserAccount;
use serde::{Deserialize, Serialize};

/// Vista pública de una cuenta; nunca expone el hash de contraseña.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub created_at: String,
}

impl From<&UserAccount> for UserResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.to_string(),
            email: account.email.to_string(),
            role: account.role.to_string(),
            active: account.active,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}
