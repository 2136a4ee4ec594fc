//! PostgreSQL User Account Repository
//!
//! El índice único sobre username respalda en base de datos la comprobación
//! de duplicados que hace la capa de aplicación.

use denda_domain::iam::{Role, UserAccount, UserAccountRepository, Username};
use denda_domain::shared_kernel::{DomainError, Result, UserId};
use denda_domain::values::EmailAddress;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

/// Repositorio PostgreSQL de cuentas de usuario
#[derive(Clone)]
pub struct PostgresUserAccountRepository {
    pool: PgPool,
}

impl PostgresUserAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserAccountRepository for PostgresUserAccountRepository {
    async fn save(&self, account: &UserAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_accounts
                (id, username, email, password_hash, role, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                active = EXCLUDED.active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to save user account: {}", e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, active, created_at, updated_at
            FROM user_accounts
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to find user account by id: {}", e),
        })?;

        match row {
            Some(row) => Ok(Some(map_row_to_user_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, active, created_at, updated_at
            FROM user_accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to find user account by username: {}", e),
        })?;

        match row {
            Some(row) => Ok(Some(map_row_to_user_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<UserAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, active, created_at, updated_at
            FROM user_accounts
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to list user accounts: {}", e),
        })?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in &rows {
            accounts.push(map_row_to_user_account(row)?);
        }
        Ok(accounts)
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM user_accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to count user accounts: {}", e),
            })?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn delete(&self, user_id: &UserId) -> Result<()> {
        sqlx::query("DELETE FROM user_accounts WHERE id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to delete user account: {}", e),
            })?;

        Ok(())
    }
}

fn map_row_to_user_account(row: &PgRow) -> Result<UserAccount> {
    let id: Uuid = row.get("id");
    let role_raw: String = row.get("role");

    let username = Username::new(row.get::<String, _>("username")).map_err(|e| {
        DomainError::InfrastructureError {
            message: format!("Stored username is invalid: {}", e),
        }
    })?;
    let email = EmailAddress::new(row.get::<String, _>("email")).map_err(|e| {
        DomainError::InfrastructureError {
            message: format!("Stored user email is invalid: {}", e),
        }
    })?;
    let role: Role = role_raw
        .parse()
        .map_err(|e: String| DomainError::InfrastructureError {
            message: format!("Stored user role is invalid: {}", e),
        })?;

    Ok(UserAccount {
        id: UserId(id),
        username,
        email,
        password_hash: row.get("password_hash"),
        role,
        active: row.get("active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
