// Establishment Use Cases
// UC: baja de un establecimiento

use crate::audit::RecordAuditUseCase;
use denda_domain::audit::AuditLog;
use denda_domain::employees::EmployeeRepository;
use denda_domain::establishments::EstablishmentRepository;
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EstablishmentId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEstablishmentResponse {
    pub establishment_id: String,
    pub message: String,
}

/// Use Case: eliminar un establecimiento
///
/// La baja se rechaza mientras queden empleados sin terminar; los puntos
/// de contacto se eliminan en cascada junto con el agregado.
pub struct DeleteEstablishmentUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    employees: Arc<dyn EmployeeRepository>,
    audit: RecordAuditUseCase,
}

impl DeleteEstablishmentUseCase {
    pub fn new(
        establishments: Arc<dyn EstablishmentRepository>,
        employees: Arc<dyn EmployeeRepository>,
        audit: RecordAuditUseCase,
    ) -> Self {
        Self {
            establishments,
            employees,
            audit,
        }
    }

    pub async fn execute(
        &self,
        establishment_id: EstablishmentId,
        ctx: &RequestContext,
    ) -> anyhow::Result<DeleteEstablishmentResponse> {
        // 1. Cargar el agregado
        let establishment = self
            .establishments
            .find_by_id(&establishment_id)
            .await?
            .ok_or_else(|| DomainError::EstablishmentNotFound {
                establishment_id: establishment_id.clone(),
            })?;

        // 2. Rechazar la baja mientras queden empleados sin terminar
        let active_employees = self
            .employees
            .count_non_terminated(&establishment_id)
            .await?;
        if active_employees > 0 {
            return Err(DomainError::EstablishmentHasEmployees {
                establishment_id,
                active_employees,
            }
            .into());
        }

        // 3. Eliminar el agregado completo
        self.establishments.delete(&establishment_id).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            name = %establishment.name,
            "Establishment deleted"
        );

        // 4. Registrar auditoría
        self.audit
            .execute(
                AuditLog::new(
                    "establishment.deleted",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "name": establishment.name.as_str() }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(DeleteEstablishmentResponse {
            establishment_id: establishment_id.to_string(),
            message: "Establishment deleted".to_string(),
        })
    }
}
