// IAM Use Cases
// UC: administración de cuentas existentes

use crate::audit::RecordAuditUseCase;
use crate::iam::UserResponse;
use denda_domain::audit::AuditLog;
use denda_domain::iam::{Role, UserAccountRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, UserId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeUserRoleRequest {
    pub role: String,
}

pub struct ChangeUserRoleUseCase {
    users: Arc<dyn UserAccountRepository>,
    audit: RecordAuditUseCase,
}

impl ChangeUserRoleUseCase {
    pub fn new(users: Arc<dyn UserAccountRepository>, audit: RecordAuditUseCase) -> Self {
        Self { users, audit }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        request: ChangeUserRoleRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<UserResponse> {
        // 1. Cargar la cuenta y validar el rol nuevo
        let mut account = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound {
                user_id: user_id.clone(),
            })?;
        let role: Role = request
            .role
            .parse()
            .map_err(|e: String| DomainError::validation("role", e))?;
        let previous_role = account.role;

        // 2. Aplicar el cambio y persistir
        account.change_role(role);
        self.users.save(&account).await?;

        tracing::info!(
            user_id = %account.id,
            from = %previous_role,
            to = %account.role,
            "User role changed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "user.role_changed",
                    "user",
                    account.id.to_string(),
                    json!({
                        "from": previous_role.to_string(),
                        "to": account.role.to_string(),
                    }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(UserResponse::from(&account))
    }
}

/// Use Case: desactivar una cuenta (baja lógica)
///
/// La cuenta se conserva para el rastro de auditoría; solo pierde el
/// acceso.
pub struct DeactivateUserUseCase {
    users: Arc<dyn UserAccountRepository>,
    audit: RecordAuditUseCase,
}

impl DeactivateUserUseCase {
    pub fn new(users: Arc<dyn UserAccountRepository>, audit: RecordAuditUseCase) -> Self {
        Self { users, audit }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        ctx: &RequestContext,
    ) -> anyhow::Result<UserResponse> {
        let mut account = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound {
                user_id: user_id.clone(),
            })?;

        account.deactivate();
        self.users.save(&account).await?;

        tracing::info!(user_id = %account.id, username = %account.username, "User deactivated");

        self.audit
            .execute(
                AuditLog::new(
                    "user.deactivated",
                    "user",
                    account.id.to_string(),
                    json!({ "username": account.username.as_str() }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(UserResponse::from(&account))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total_count: usize,
}

pub struct ListUsersUseCase {
    users: Arc<dyn UserAccountRepository>,
}

impl ListUsersUseCase {
    pub fn new(users: Arc<dyn UserAccountRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self) -> anyhow::Result<ListUsersResponse> {
        let accounts = self.users.find_all().await?;

        Ok(ListUsersResponse {
            total_count: accounts.len(),
            users: accounts.iter().map(UserResponse::from).collect(),
        })
    }
}
