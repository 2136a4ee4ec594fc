//! PostgreSQL Audit Log Repository

use chrono::{DateTime, Utc};
use denda_domain::audit::{AuditLog, AuditQuery, AuditQueryResult, AuditRepository};
use denda_domain::shared_kernel::{AuditLogId, DomainError, Result};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

/// Repositorio PostgreSQL del registro de auditoría
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_audit_log(row: &PgRow) -> AuditLog {
        AuditLog {
            id: AuditLogId(row.get("id")),
            correlation_id: row.get("correlation_id"),
            actor: row.get("actor"),
            event_type: row.get("event_type"),
            entity: row.get("entity"),
            entity_id: row.get("entity_id"),
            payload: row.get("payload"),
            occurred_at: row.get("occurred_at"),
        }
    }
}

#[async_trait::async_trait]
impl AuditRepository for PostgresAuditLogRepository {
    async fn save(&self, log: &AuditLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs
                (id, correlation_id, actor, event_type, entity, entity_id, payload, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id.0)
        .bind(&log.correlation_id)
        .bind(&log.actor)
        .bind(&log.event_type)
        .bind(&log.entity)
        .bind(&log.entity_id)
        .bind(&log.payload)
        .bind(log.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to save audit log: {}", e),
        })?;

        Ok(())
    }

    async fn query(&self, query: AuditQuery) -> Result<AuditQueryResult> {
        let mut count_qb: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT COUNT(*) as count FROM audit_logs");
        let mut select_qb: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM audit_logs");

        let mut has_where = false;

        if let Some(ref event_type) = query.event_type {
            count_qb.push(" WHERE event_type = ");
            select_qb.push(" WHERE event_type = ");
            count_qb.push_bind(event_type);
            select_qb.push_bind(event_type);
            has_where = true;
        }

        if let Some(ref entity) = query.entity {
            let connector = if has_where { " AND " } else { " WHERE " };
            count_qb.push(connector);
            select_qb.push(connector);
            count_qb.push("entity = ");
            select_qb.push("entity = ");
            count_qb.push_bind(entity);
            select_qb.push_bind(entity);
            has_where = true;
        }

        if let Some(ref actor) = query.actor {
            let connector = if has_where { " AND " } else { " WHERE " };
            count_qb.push(connector);
            select_qb.push(connector);
            count_qb.push("actor = ");
            select_qb.push("actor = ");
            count_qb.push_bind(actor);
            select_qb.push_bind(actor);
            has_where = true;
        }

        if let Some(start_time) = query.start_time {
            let connector = if has_where { " AND " } else { " WHERE " };
            count_qb.push(connector);
            select_qb.push(connector);
            count_qb.push("occurred_at >= ");
            select_qb.push("occurred_at >= ");
            count_qb.push_bind(start_time);
            select_qb.push_bind(start_time);
            has_where = true;
        }

        if let Some(end_time) = query.end_time {
            let connector = if has_where { " AND " } else { " WHERE " };
            count_qb.push(connector);
            select_qb.push(connector);
            count_qb.push("occurred_at <= ");
            select_qb.push("occurred_at <= ");
            count_qb.push_bind(end_time);
            select_qb.push_bind(end_time);
        }

        let count_row = count_qb.build().fetch_one(&self.pool).await.map_err(|e| {
            DomainError::InfrastructureError {
                message: format!("Failed to count audit logs: {}", e),
            }
        })?;
        let total_count: i64 = count_row.get("count");

        select_qb.push(" ORDER BY occurred_at DESC LIMIT ");
        select_qb.push_bind(query.limit);
        select_qb.push(" OFFSET ");
        select_qb.push_bind(query.offset);

        let rows = select_qb.build().fetch_all(&self.pool).await.map_err(|e| {
            DomainError::InfrastructureError {
                message: format!("Failed to query audit logs: {}", e),
            }
        })?;

        let logs: Vec<AuditLog> = rows.iter().map(Self::row_to_audit_log).collect();
        let has_more = (query.offset + logs.len() as i64) < total_count;

        Ok(AuditQueryResult {
            logs,
            total_count,
            has_more,
        })
    }

    async fn find_by_entity(
        &self,
        entity: &str,
        entity_id: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM audit_logs
            WHERE entity = $1 AND entity_id = $2
            ORDER BY occurred_at DESC
            LIMIT $3
            "#,
        )
        .bind(entity)
        .bind(entity_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to find audit logs by entity: {}", e),
        })?;

        Ok(rows.iter().map(Self::row_to_audit_log).collect())
    }

    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM audit_logs WHERE occurred_at < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to delete old audit logs: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}
