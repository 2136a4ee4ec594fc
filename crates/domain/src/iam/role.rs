// IAM Bounded Context
// Roles de acceso y su jerarquía

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rol de acceso a la API, ordenado por privilegio creciente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Manager,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Nivel de privilegio (viewer 0, manager 1, admin 2)
    pub const fn rank(&self) -> u8 {
        match self {
            Role::Viewer => 0,
            Role::Manager => 1,
            Role::Admin => 2,
        }
    }

    /// Un rol concede todo lo que conceden los roles de rango inferior
    pub fn allows(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Invalid Role: {}", other)),
        }
    }
}
