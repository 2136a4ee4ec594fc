// IAM Use Cases
// UC: inicio de sesión

use crate::iam::UserResponse;
use denda_domain::iam::{PasswordHasher, TokenIssuer, UserAccountRepository};
use denda_domain::shared_kernel::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

/// Use Case: autenticar una cuenta y emitir un token de acceso
///
/// Un usuario desconocido y una contraseña incorrecta devuelven el
/// mismo error, sin revelar cuál de los dos falló.
pub struct LoginUseCase {
    users: Arc<dyn UserAccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl LoginUseCase {
    pub fn new(
        users: Arc<dyn UserAccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            token_issuer,
        }
    }

    pub async fn execute(&self, request: LoginRequest) -> anyhow::Result<LoginResponse> {
        // 1. Buscar la cuenta con el nombre normalizado
        let username = request.username.trim().to_lowercase();
        let account = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        // 2. Comprobar la contraseña
        if !self
            .password_hasher
            .verify(&request.password, &account.password_hash)?
        {
            return Err(DomainError::InvalidCredentials.into());
        }

        // 3. Las cuentas desactivadas no inician sesión
        if !account.active {
            return Err(DomainError::Unauthorized {
                message: "account is disabled".to_string(),
            }
            .into());
        }

        // 4. Emitir el token
        let issued = self.token_issuer.issue(&account)?;

        tracing::info!(username = %account.username, "User logged in");

        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at.to_rfc3339(),
            user: UserResponse::from(&account),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryUserAccountRepository;
    use chrono::Utc;
    use denda_domain::iam::{IssuedToken, Role, UserAccount, Username};
    use denda_domain::shared_kernel::Result;
    use denda_domain::values::EmailAddress;

    struct PrefixHasher;

    impl PasswordHasher for PrefixHasher {
        fn hash(&self, plain: &str) -> Result<String> {
            Ok(format!("hashed:{}", plain))
        }

        fn verify(&self, plain: &str, hash: &str) -> Result<bool> {
            Ok(hash == format!("hashed:{}", plain))
        }
    }

    struct StaticIssuer;

    impl TokenIssuer for StaticIssuer {
        fn issue(&self, account: &UserAccount) -> Result<IssuedToken> {
            Ok(IssuedToken {
                token: format!("token-{}", account.username),
                expires_at: Utc::now(),
            })
        }
    }

    fn account(username: &str, password: &str) -> UserAccount {
        UserAccount::new(
            Username::new(username).unwrap(),
            EmailAddress::new(format!("{}@denda.eus", username)).unwrap(),
            format!("hashed:{}", password),
            Role::Manager,
        )
        .unwrap()
    }

    fn use_case(users: Arc<MemoryUserAccountRepository>) -> LoginUseCase {
        LoginUseCase::new(users, Arc::new(PrefixHasher), Arc::new(StaticIssuer))
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let users = Arc::new(MemoryUserAccountRepository::with_account(account(
            "miren",
            "correct horse",
        )));
        let use_case = use_case(users);

        let response = use_case
            .execute(login("  MIREN ", "correct horse"))
            .await
            .unwrap();

        assert_eq!(response.token, "token-miren");
        assert_eq!(response.user.username, "miren");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_yield_the_same_error() {
        let users = Arc::new(MemoryUserAccountRepository::with_account(account(
            "miren",
            "correct horse",
        )));
        let use_case = use_case(users);

        let wrong_password = use_case
            .execute(login("miren", "incorrect"))
            .await
            .unwrap_err();
        let unknown_user = use_case
            .execute(login("inexistente", "correct horse"))
            .await
            .unwrap_err();

        assert!(matches!(
            wrong_password.downcast_ref::<DomainError>(),
            Some(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            unknown_user.downcast_ref::<DomainError>(),
            Some(DomainError::InvalidCredentials)
        ));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_login() {
        let mut disabled = account("miren", "correct horse");
        disabled.deactivate();
        let users = Arc::new(MemoryUserAccountRepository::with_account(disabled));
        let use_case = use_case(users);

        let result = use_case.execute(login("miren", "correct horse")).await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::Unauthorized { .. })
        ));
    }
}
