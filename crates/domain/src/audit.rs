use crate::request_context::RequestContext;
use crate::shared_kernel::{AuditLogId, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entrada del registro de auditoría de acciones administrativas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub correlation_id: Option<String>,
    pub actor: Option<String>,
    pub event_type: String,
    pub entity: String,
    pub entity_id: String,
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        event_type: impl Into<String>,
        entity: impl Into<String>,
        entity_id: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            id: AuditLogId::new(),
            correlation_id: None,
            actor: None,
            event_type: event_type.into(),
            entity: entity.into(),
            entity_id: entity_id.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }

    /// Adjunta correlación y actor del contexto de la petición
    pub fn with_context(mut self, context: &RequestContext) -> Self {
        self.correlation_id = Some(context.correlation_id().to_string());
        self.actor = context.get_actor().map(|a| a.to_string());
        self
    }
}

/// Query parameters for audit log searches
#[derive(Debug, Clone)]
pub struct AuditQuery {
    pub event_type: Option<String>,
    pub entity: Option<String>,
    pub actor: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl AuditQuery {
    pub const DEFAULT_LIMIT: i64 = 100;

    pub fn new() -> Self {
        Self {
            event_type: None,
            entity: None,
            actor: None,
            start_time: None,
            end_time: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Comprueba los filtros contra una entrada (paginación aparte)
    pub fn matches(&self, log: &AuditLog) -> bool {
        if let Some(event_type) = &self.event_type {
            if &log.event_type != event_type {
                return false;
            }
        }
        if let Some(entity) = &self.entity {
            if &log.entity != entity {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            if log.actor.as_deref() != Some(actor.as_str()) {
                return false;
            }
        }
        if let Some(start) = &self.start_time {
            if log.occurred_at < *start {
                return false;
            }
        }
        if let Some(end) = &self.end_time {
            if log.occurred_at > *end {
                return false;
            }
        }
        true
    }
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a paginated audit query
#[derive(Debug, Clone)]
pub struct AuditQueryResult {
    pub logs: Vec<AuditLog>,
    pub total_count: i64,
    pub has_more: bool,
}

#[async_trait::async_trait]
pub trait AuditRepository: Send + Sync {
    /// Save an audit log entry
    async fn save(&self, log: &AuditLog) -> Result<()>;

    /// Advanced query with multiple filters
    async fn query(&self, query: AuditQuery) -> Result<AuditQueryResult>;

    /// Most recent entries for one entity, newest first
    async fn find_by_entity(
        &self,
        entity: &str,
        entity_id: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>>;

    /// Delete audit logs older than the specified date (for retention policy)
    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_log_has_id_and_timestamp() {
        let log = AuditLog::new(
            "establishment.created",
            "establishment",
            "est-1",
            json!({"name": "Denda Berria"}),
        );
        assert_eq!(log.event_type, "establishment.created");
        assert_eq!(log.entity, "establishment");
        assert!(log.correlation_id.is_none());
        assert!(log.actor.is_none());
    }

    #[test]
    fn test_with_context_attaches_correlation_and_actor() {
        let context = RequestContext::new().actor("admin");
        let log = AuditLog::new("employee.hired", "employee", "emp-1", json!({}))
            .with_context(&context);

        assert_eq!(log.correlation_id.as_deref(), Some(context.correlation_id()));
        assert_eq!(log.actor.as_deref(), Some("admin"));
    }

    #[test]
    fn test_query_defaults() {
        let query = AuditQuery::new();
        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 0);
        assert!(query.event_type.is_none());
    }

    #[test]
    fn test_query_matches_filters() {
        let log = AuditLog::new("user.role_changed", "user", "u-1", json!({}))
            .with_context(&RequestContext::new().actor("admin"));

        assert!(AuditQuery::new().matches(&log));
        assert!(AuditQuery::new().with_event_type("user.role_changed").matches(&log));
        assert!(!AuditQuery::new().with_event_type("user.created").matches(&log));
        assert!(AuditQuery::new().with_entity("user").matches(&log));
        assert!(!AuditQuery::new().with_entity("employee").matches(&log));
        assert!(AuditQuery::new().with_actor("admin").matches(&log));
        assert!(!AuditQuery::new().with_actor("viewer").matches(&log));
    }

    #[test]
    fn test_query_date_range() {
        let log = AuditLog::new("establishment.created", "establishment", "e-1", json!({}));
        let before = log.occurred_at - chrono::Duration::hours(1);
        let after = log.occurred_at + chrono::Duration::hours(1);

        assert!(AuditQuery::new().with_date_range(before, after).matches(&log));
        assert!(!AuditQuery::new().with_date_range(after, after).matches(&log));
    }
}
