// IAM Bounded Context
// Puertos de autenticación: hash de contraseñas y emisión de tokens

use crate::iam::user::UserAccount;
use crate::shared_kernel::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Puerto para el hash y la verificación de contraseñas
pub trait PasswordHasher: Send + Sync {
    /// Deriva un hash de la contraseña en claro
    fn hash(&self, plain: &str) -> Result<String>;

    /// Comprueba una contraseña en claro contra un hash almacenado
    fn verify(&self, plain: &str, hash: &str) -> Result<bool>;
}

/// Token de acceso emitido tras un inicio de sesión correcto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Puerto para la emisión de tokens de acceso
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, account: &UserAccount) -> Result<IssuedToken>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::role::Role;
    use crate::iam::user::Username;
    use crate::shared_kernel::DomainError;
    use crate::values::EmailAddress;

    struct ReversingHasher;

    impl PasswordHasher for ReversingHasher {
        fn hash(&self, plain: &str) -> Result<String> {
            Ok(plain.chars().rev().collect())
        }

        fn verify(&self, plain: &str, hash: &str) -> Result<bool> {
            Ok(self.hash(plain)? == hash)
        }
    }

    struct FixedIssuer;

    impl TokenIssuer for FixedIssuer {
        fn issue(&self, account: &UserAccount) -> Result<IssuedToken> {
            if !account.active {
                return Err(DomainError::InvalidCredentials);
            }
            Ok(IssuedToken {
                token: format!("token-for-{}", account.username),
                expires_at: Utc::now(),
            })
        }
    }

    fn account() -> UserAccount {
        UserAccount::new(
            Username::new("miren").unwrap(),
            EmailAddress::new("miren@example.com").unwrap(),
            "hash",
            Role::Viewer,
        )
        .unwrap()
    }

    #[test]
    fn test_password_hasher_contract() {
        let hasher = ReversingHasher;
        let hash = hasher.hash("secret").unwrap();
        assert!(hasher.verify("secret", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_token_issuer_contract() {
        let issued = FixedIssuer.issue(&account()).unwrap();
        assert_eq!(issued.token, "token-for-miren");
    }
}
