//! Esquema de la base de datos
//!
//! Migraciones idempotentes: cada sentencia usa IF NOT EXISTS y puede
//! ejecutarse en cada arranque. Las tablas de puntos de contacto cuelgan de
//! establishments con ON DELETE CASCADE.

use denda_domain::shared_kernel::{DomainError, Result};
use sqlx::postgres::PgPool;

/// Crea las tablas e índices si no existen
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS establishments (
            id UUID PRIMARY KEY,
            name VARCHAR(150) NOT NULL,
            description TEXT,
            status VARCHAR(20) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishments table: {}", e),
    })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_establishments_status ON establishments(status);")
        .execute(pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to create establishments status index: {}", e),
        })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_establishments_name ON establishments(LOWER(name));",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishments name index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS establishment_addresses (
            id UUID PRIMARY KEY,
            establishment_id UUID NOT NULL REFERENCES establishments(id) ON DELETE CASCADE,
            street VARCHAR(120) NOT NULL,
            city VARCHAR(120) NOT NULL,
            state VARCHAR(120),
            postal_code VARCHAR(12) NOT NULL,
            country VARCHAR(120) NOT NULL,
            is_primary BOOLEAN NOT NULL DEFAULT FALSE,
            label TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_addresses table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_establishment_addresses_establishment ON establishment_addresses(establishment_id);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_addresses index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS establishment_phones (
            id UUID PRIMARY KEY,
            establishment_id UUID NOT NULL REFERENCES establishments(id) ON DELETE CASCADE,
            country_code VARCHAR(3) NOT NULL,
            number VARCHAR(14) NOT NULL,
            label TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_phones table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_establishment_phones_establishment ON establishment_phones(establishment_id);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_phones index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS establishment_social_media (
            id UUID PRIMARY KEY,
            establishment_id UUID NOT NULL REFERENCES establishments(id) ON DELETE CASCADE,
            platform VARCHAR(20) NOT NULL,
            url VARCHAR(2000) NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_social_media table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_establishment_social_media_establishment ON establishment_social_media(establishment_id);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_social_media index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS establishment_contacts (
            id UUID PRIMARY KEY,
            establishment_id UUID NOT NULL REFERENCES establishments(id) ON DELETE CASCADE,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            email VARCHAR(254) NOT NULL,
            phone_country_code VARCHAR(3),
            phone_number VARCHAR(14),
            role TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_contacts table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_establishment_contacts_establishment ON establishment_contacts(establishment_id);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create establishment_contacts index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id UUID PRIMARY KEY,
            establishment_id UUID NOT NULL REFERENCES establishments(id) ON DELETE CASCADE,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            email VARCHAR(254) NOT NULL,
            phone_country_code VARCHAR(3),
            phone_number VARCHAR(14),
            position VARCHAR(100) NOT NULL,
            status VARCHAR(20) NOT NULL,
            hired_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create employees table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_employees_establishment ON employees(establishment_id);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create employees establishment index: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_employees_status ON employees(establishment_id, status);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create employees status index: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_employees_email ON employees(establishment_id, email);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create employees email index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_accounts (
            id UUID PRIMARY KEY,
            username VARCHAR(32) NOT NULL,
            email VARCHAR(254) NOT NULL,
            password_hash TEXT NOT NULL,
            role VARCHAR(20) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create user_accounts table: {}", e),
    })?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_accounts_username ON user_accounts(username);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create user_accounts username index: {}", e),
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_logs (
            id UUID PRIMARY KEY,
            correlation_id VARCHAR(255),
            actor VARCHAR(255),
            event_type VARCHAR(255) NOT NULL,
            entity VARCHAR(100) NOT NULL,
            entity_id VARCHAR(255) NOT NULL,
            payload JSONB NOT NULL,
            occurred_at TIMESTAMPTZ NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create audit_logs table: {}", e),
    })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_event_type ON audit_logs(event_type);")
        .execute(pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to create audit_logs event_type index: {}", e),
        })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_audit_entity ON audit_logs(entity, entity_id, occurred_at);",
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Failed to create audit_logs entity index: {}", e),
    })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_occurred_at ON audit_logs(occurred_at);")
        .execute(pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to create audit_logs occurred_at index: {}", e),
        })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_actor ON audit_logs(actor);")
        .execute(pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to create audit_logs actor index: {}", e),
        })?;

    Ok(())
}
