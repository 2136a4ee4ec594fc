//! Request Context - Propagación de contexto para trazabilidad
//!
//! Proporciona un contexto inmutable que se propaga desde la capa HTTP hasta
//! los casos de uso para mantener correlation_id y actor en el audit trail.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contexto de request para propagación de trazabilidad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// ID de correlación para trazar operaciones relacionadas
    correlation_id: String,
    /// Actor que inició la operación (username autenticado, sistema, etc.)
    actor: Option<String>,
    /// Timestamp de inicio de la operación
    started_at: chrono::DateTime<chrono::Utc>,
}

impl RequestContext {
    /// Crea un nuevo contexto con correlation_id generado automáticamente
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            actor: None,
            started_at: chrono::Utc::now(),
        }
    }

    /// Crea un contexto con un correlation_id específico
    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            actor: None,
            started_at: chrono::Utc::now(),
        }
    }

    /// Builder: establece el actor
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Obtiene el correlation_id
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Obtiene el actor
    pub fn get_actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Obtiene el timestamp de inicio
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Crea un contexto hijo que hereda correlation_id y actor
    pub fn child(&self) -> Self {
        Self {
            correlation_id: self.correlation_id.clone(),
            actor: self.actor.clone(),
            started_at: chrono::Utc::now(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RequestContext(correlation_id={}, actor={:?})",
            self.correlation_id, self.actor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_generates_correlation_id() {
        let ctx = RequestContext::new();
        assert!(!ctx.correlation_id().is_empty());
        assert!(ctx.get_actor().is_none());
    }

    #[test]
    fn test_with_correlation_id() {
        let ctx = RequestContext::with_correlation_id("req-123");
        assert_eq!(ctx.correlation_id(), "req-123");
    }

    #[test]
    fn test_builder_sets_actor() {
        let ctx = RequestContext::with_correlation_id("req-456").actor("admin");
        assert_eq!(ctx.correlation_id(), "req-456");
        assert_eq!(ctx.get_actor(), Some("admin"));
    }

    #[test]
    fn test_child_inherits_correlation_id_and_actor() {
        let parent = RequestContext::with_correlation_id("parent-id").actor("parent-actor");
        let child = parent.child();

        assert_eq!(child.correlation_id(), "parent-id");
        assert_eq!(child.get_actor(), Some("parent-actor"));
    }

    #[test]
    fn test_display() {
        let ctx = RequestContext::with_correlation_id("display-id").actor("display-actor");
        let rendered = format!("{}", ctx);
        assert!(rendered.contains("display-id"));
        assert!(rendered.contains("display-actor"));
    }
}
