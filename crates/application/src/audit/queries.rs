// Audit Use Cases
// UC: consultar el rastro de auditoría con filtros y paginación

use chrono::{DateTime, Utc};
use denda_domain::audit::{AuditLog, AuditQuery, AuditRepository};
use denda_domain::shared_kernel::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryAuditLogsRequest {
    pub event_type: Option<String>,
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub actor: Option<String>,
    /// Timestamp RFC 3339 inclusivo
    pub from: Option<String>,
    /// Timestamp RFC 3339 inclusivo
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogResponse {
    pub id: String,
    pub correlation_id: Option<String>,
    pub actor: Option<String>,
    pub event_type: String,
    pub entity: String,
    pub entity_id: String,
    pub payload: serde_json::Value,
    pub occurred_at: String,
}

impl From<&AuditLog> for AuditLogResponse {
    fn from(log: &AuditLog) -> Self {
        Self {
            id: log.id.to_string(),
            correlation_id: log.correlation_id.clone(),
            actor: log.actor.clone(),
            event_type: log.event_type.clone(),
            entity: log.entity.clone(),
            entity_id: log.entity_id.clone(),
            payload: log.payload.clone(),
            occurred_at: log.occurred_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAuditLogsResponse {
    pub logs: Vec<AuditLogResponse>,
    pub total_count: i64,
    pub has_more: bool,
}

pub struct QueryAuditLogsUseCase {
    audit_logs: Arc<dyn AuditRepository>,
}

impl QueryAuditLogsUseCase {
    pub fn new(audit_logs: Arc<dyn AuditRepository>) -> Self {
        Self { audit_logs }
    }

    pub async fn execute(
        &self,
        request: QueryAuditLogsRequest,
    ) -> anyhow::Result<QueryAuditLogsResponse> {
        // 1. Con entidad e identificador concretos basta el historial directo
        if let (Some(entity), Some(entity_id)) = (&request.entity, &request.entity_id) {
            let limit = request.limit.unwrap_or(AuditQuery::DEFAULT_LIMIT);
            let logs = self
                .audit_logs
                .find_by_entity(entity, entity_id, limit)
                .await?;
            let total_count = logs.len() as i64;
            return Ok(QueryAuditLogsResponse {
                logs: logs.iter().map(AuditLogResponse::from).collect(),
                total_count,
                has_more: false,
            });
        }

        // 2. Consulta general con filtros combinados
        let mut query = AuditQuery::new();
        if let Some(event_type) = request.event_type {
            query = query.with_event_type(event_type);
        }
        if let Some(entity) = request.entity {
            query = query.with_entity(entity);
        }
        if let Some(actor) = request.actor {
            query = query.with_actor(actor);
        }
        query.start_time = parse_timestamp("from", request.from)?;
        query.end_time = parse_timestamp("to", request.to)?;
        if let Some(limit) = request.limit {
            query = query.with_limit(limit);
        }
        if let Some(offset) = request.offset {
            query = query.with_offset(offset);
        }

        let result = self.audit_logs.query(query).await?;

        Ok(QueryAuditLogsResponse {
            logs: result.logs.iter().map(AuditLogResponse::from).collect(),
            total_count: result.total_count,
            has_more: result.has_more,
        })
    }
}

fn parse_timestamp(
    field: &str,
    raw: Option<String>,
) -> anyhow::Result<Option<DateTime<Utc>>> {
    match raw {
        Some(value) => {
            let parsed = DateTime::parse_from_rfc3339(&value)
                .map_err(|e| {
                    DomainError::validation(field, format!("invalid RFC 3339 timestamp: {}", e))
                })?
                .with_timezone(&Utc);
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denda_domain::audit::AuditQueryResult;
    use denda_domain::shared_kernel::Result;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockAuditRepository {
        logs: Mutex<Vec<AuditLog>>,
    }

    impl MockAuditRepository {
        fn with_logs(logs: Vec<AuditLog>) -> Self {
            Self {
                logs: Mutex::new(logs),
            }
        }
    }

    #[async_trait::async_trait]
    impl AuditRepository for MockAuditRepository {
        async fn save(&self, log: &AuditLog) -> Result<()> {
            self.logs.lock().unwrap().push(log.clone());
            Ok(())
        }

        async fn query(&self, query: AuditQuery) -> Result<AuditQueryResult> {
            let logs = self.logs.lock().unwrap();
            let filtered: Vec<_> = logs.iter().filter(|l| query.matches(l)).cloned().collect();
            let total = filtered.len() as i64;
            let page: Vec<_> = filtered
                .into_iter()
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .collect();
            let has_more = (query.offset + page.len() as i64) < total;
            Ok(AuditQueryResult {
                logs: page,
                total_count: total,
                has_more,
            })
        }

        async fn find_by_entity(
            &self,
            entity: &str,
            entity_id: &str,
            limit: i64,
        ) -> Result<Vec<AuditLog>> {
            let logs = self.logs.lock().unwrap();
            Ok(logs
                .iter()
                .filter(|l| l.entity == entity && l.entity_id == entity_id)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn delete_before(&self, _before: DateTime<Utc>) -> Result<u64> {
            Ok(0)
        }
    }

    fn sample_logs() -> Vec<AuditLog> {
        vec![
            AuditLog::new("establishment.created", "establishment", "e-1", json!({})),
            AuditLog::new("establishment.updated", "establishment", "e-1", json!({})),
            AuditLog::new("employee.hired", "employee", "emp-1", json!({})),
        ]
    }

    #[tokio::test]
    async fn test_query_by_event_type() {
        let repo = Arc::new(MockAuditRepository::with_logs(sample_logs()));
        let use_case = QueryAuditLogsUseCase::new(repo);

        let response = use_case
            .execute(QueryAuditLogsRequest {
                event_type: Some("employee.hired".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.total_count, 1);
        assert_eq!(response.logs[0].entity, "employee");
        assert!(!response.has_more);
    }

    #[tokio::test]
    async fn test_query_entity_history() {
        let repo = Arc::new(MockAuditRepository::with_logs(sample_logs()));
        let use_case = QueryAuditLogsUseCase::new(repo);

        let response = use_case
            .execute(QueryAuditLogsRequest {
                entity: Some("establishment".to_string()),
                entity_id: Some("e-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.total_count, 2);
    }

    #[tokio::test]
    async fn test_query_pagination() {
        let repo = Arc::new(MockAuditRepository::with_logs(sample_logs()));
        let use_case = QueryAuditLogsUseCase::new(repo);

        let response = use_case
            .execute(QueryAuditLogsRequest {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.logs.len(), 2);
        assert_eq!(response.total_count, 3);
        assert!(response.has_more);
    }

    #[tokio::test]
    async fn test_query_rejects_malformed_timestamp() {
        let repo = Arc::new(MockAuditRepository::with_logs(vec![]));
        let use_case = QueryAuditLogsUseCase::new(repo);

        let err = use_case
            .execute(QueryAuditLogsRequest {
                from: Some("yesterday".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        let domain = err.downcast_ref::<DomainError>().unwrap();
        assert!(matches!(domain, DomainError::ValidationError { .. }));
    }
}
