//! Health Check Implementations
//!
//! Comprobaciones reales de conectividad para las sondas de readiness.

use async_trait::async_trait;
use denda_domain::health::{ComponentHealth, HealthCheckError, HealthChecker};
use sqlx::postgres::PgPool;
use tracing::error;

/// Comprueba la base de datos con un SELECT 1
#[derive(Clone)]
pub struct DatabaseHealthChecker {
    pool: PgPool,
    database_name: String,
}

impl DatabaseHealthChecker {
    pub fn new(pool: PgPool, database_name: impl Into<String>) -> Self {
        Self {
            pool,
            database_name: database_name.into(),
        }
    }
}

#[async_trait]
impl HealthChecker for DatabaseHealthChecker {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> Result<ComponentHealth, HealthCheckError> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(ComponentHealth::healthy("database")
                .with_detail("database", self.database_name.clone())
                .with_detail("connection", "active")),
            Err(e) => {
                error!(error = %e, "Database health check failed");
                Ok(ComponentHealth::unhealthy(
                    "database",
                    format!("Database connection failed: {}", e),
                ))
            }
        }
    }
}

/// Checker del almacenamiento en memoria; siempre sano
#[derive(Clone, Default)]
pub struct InMemoryHealthChecker;

impl InMemoryHealthChecker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealthChecker for InMemoryHealthChecker {
    fn name(&self) -> &str {
        "storage"
    }

    async fn check(&self) -> Result<ComponentHealth, HealthCheckError> {
        Ok(ComponentHealth::healthy("storage").with_detail("mode", "in-memory"))
    }
}
