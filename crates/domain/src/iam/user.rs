// IAM Bounded Context
// Cuentas de usuario de la API de administración

use crate::iam::role::Role;
use crate::shared_kernel::*;
use crate::values::EmailAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;

/// Nombre de usuario; se normaliza a minúsculas
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let value = raw.into().trim().to_lowercase();
        let len = value.chars().count();
        if len < MIN_USERNAME_LEN || len > MAX_USERNAME_LEN {
            return Err(DomainError::validation(
                "username",
                format!(
                    "must be {} to {} characters",
                    MIN_USERNAME_LEN, MAX_USERNAME_LEN
                ),
            ));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        {
            return Err(DomainError::validation(
                "username",
                "only lowercase letters, digits, '.', '_' and '-' are allowed",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ValueObject for Username {
    type Value = String;

    fn value(&self) -> &String {
        &self.0
    }
}

/// Cuenta de usuario con acceso a la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Identificador único de la cuenta
    pub id: UserId,
    /// Nombre de usuario (único)
    pub username: Username,
    /// Email de la cuenta
    pub email: EmailAddress,
    /// Hash de la contraseña (nunca la contraseña en claro)
    pub password_hash: String,
    /// Rol de acceso
    pub role: Role,
    /// Las cuentas inactivas no pueden iniciar sesión
    pub active: bool,
    /// Fecha de alta
    pub created_at: DateTime<Utc>,
    /// Fecha de última modificación
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Crea una cuenta activa
    pub fn new(
        username: Username,
        email: EmailAddress,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: UserId::new(),
            username,
            email,
            password_hash: password_hash.into(),
            role,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Cambia el rol de acceso
    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.touch();
    }

    /// Desactiva la cuenta; los inicios de sesión quedan bloqueados
    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Reactiva la cuenta
    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    /// Reemplaza el hash de contraseña
    pub fn with_password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self.touch();
        self
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Aggregate for UserAccount {
    type Id = UserId;

    fn aggregate_id(&self) -> &Self::Id {
        &self.id
    }
}

/// Trait para repositorios de cuentas de usuario
#[async_trait::async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Inserta o actualiza la cuenta
    async fn save(&self, account: &UserAccount) -> Result<()>;
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>>;
    async fn find_all(&self) -> Result<Vec<UserAccount>>;
    async fn count(&self) -> Result<usize>;
    async fn delete(&self, user_id: &UserId) -> Result<()>;
}
