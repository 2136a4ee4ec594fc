// Audit Use Cases
// UC: registrar una acción administrativa en el rastro de auditoría

use denda_domain::audit::{AuditLog, AuditRepository};
use std::sync::Arc;

/// Registra entradas de auditoría al completar operaciones de mutación.
///
/// Un fallo al escribir la auditoría se registra como warning y nunca
/// hace fallar la operación de negocio.
#[derive(Clone)]
pub struct RecordAuditUseCase {
    audit_logs: Arc<dyn AuditRepository>,
}

impl RecordAuditUseCase {
    pub fn new(audit_logs: Arc<dyn AuditRepository>) -> Self {
        Self { audit_logs }
    }

    pub async fn execute(&self, log: AuditLog) {
        if let Err(e) = self.audit_logs.save(&log).await {
            tracing::warn!(
                event_type = %log.event_type,
                entity = %log.entity,
                entity_id = %log.entity_id,
                error = %e,
                "Failed to record audit entry"
            );
        }
    }
}
