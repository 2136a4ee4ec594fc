// IAM Use Cases
// UC: alta de una cuenta de usuario

use crate::audit::RecordAuditUseCase;
use crate::iam::UserResponse;
use denda_domain::audit::AuditLog;
use denda_domain::iam::{PasswordHasher, Role, UserAccount, UserAccountRepository, Username};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::DomainError;
use denda_domain::values::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Use Case: registrar una cuenta de usuario
///
/// La contraseña se almacena únicamente como hash; el nombre de usuario
/// es único en todo el sistema.
pub struct RegisterUserUseCase {
    users: Arc<dyn UserAccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit: RecordAuditUseCase,
}

impl RegisterUserUseCase {
    pub fn new(
        users: Arc<dyn UserAccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit: RecordAuditUseCase,
    ) -> Self {
        Self {
            users,
            password_hasher,
            audit,
        }
    }

    pub async fn execute(
        &self,
        request: RegisterUserRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<UserResponse> {
        // 1. Validar los datos de la cuenta
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        let role: Role = request
            .role
            .parse()
            .map_err(|e: String| DomainError::validation("role", e))?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            )
            .into());
        }

        // 2. El nombre de usuario es único
        if self
            .users
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateEntry {
                entity: "user".to_string(),
                value: username.to_string(),
            }
            .into());
        }

        // 3. Derivar el hash y persistir la cuenta
        let password_hash = self.password_hasher.hash(&request.password)?;
        let account = UserAccount::new(username, email, password_hash, role)?;
        self.users.save(&account).await?;

        tracing::info!(
            user_id = %account.id,
            username = %account.username,
            role = %account.role,
            "User registered"
        );

        // 4. Registrar auditoría
        self.audit
            .execute(
                AuditLog::new(
                    "user.registered",
                    "user",
                    account.id.to_string(),
                    json!({
                        "username": account.username.as_str(),
                        "role": account.role.to_string(),
                    }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(UserResponse::from(&account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CapturingAuditRepository, MemoryUserAccountRepository};

    struct PrefixHasher;

    impl PasswordHasher for PrefixHasher {
        fn hash(&self, plain: &str) -> denda_domain::shared_kernel::Result<String> {
            Ok(format!("hashed:{}", plain))
        }

        fn verify(&self, plain: &str, hash: &str) -> denda_domain::shared_kernel::Result<bool> {
            Ok(hash == format!("hashed:{}", plain))
        }
    }

    fn request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: format!("{}@denda.eus", username),
            password: "correct horse".to_string(),
            role: "manager".to_string(),
        }
    }

    fn use_case(
        users: Arc<MemoryUserAccountRepository>,
        audit_log: Arc<CapturingAuditRepository>,
    ) -> RegisterUserUseCase {
        RegisterUserUseCase::new(users, Arc::new(PrefixHasher), RecordAuditUseCase::new(audit_log))
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_audits() {
        let users = Arc::new(MemoryUserAccountRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(users.clone(), audit_log.clone());

        let response = use_case
            .execute(request("miren"), &RequestContext::new().actor("admin"))
            .await
            .unwrap();

        assert_eq!(response.username, "miren");
        assert_eq!(response.role, "manager");
        assert!(response.active);
        let stored = users.find_by_username("miren").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hashed:correct horse");
        assert!(audit_log.has_event_type("user.registered"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_fails() {
        let users = Arc::new(MemoryUserAccountRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(users.clone(), audit_log.clone());
        use_case
            .execute(request("miren"), &RequestContext::new())
            .await
            .unwrap();

        let result = use_case
            .execute(request("MIREN"), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::DuplicateEntry { .. })
        ));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_register_short_password_fails() {
        let users = Arc::new(MemoryUserAccountRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(users.clone(), audit_log);

        let mut short = request("miren");
        short.password = "hunter2".to_string();
        let result = use_case.execute(short, &RequestContext::new()).await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::ValidationError { .. })
        ));
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_register_unknown_role_fails() {
        let users = Arc::new(MemoryUserAccountRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(users, audit_log);

        let mut invalid = request("miren");
        invalid.role = "owner".to_string();
        let result = use_case.execute(invalid, &RequestContext::new()).await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::ValidationError { .. })
        ));
    }
}
