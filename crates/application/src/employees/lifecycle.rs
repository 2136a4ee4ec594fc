// Employee Use Cases
// UC: ciclo de vida del empleado (suspensión, reincorporación, baja)

use crate::audit::RecordAuditUseCase;
use crate::employees::EmployeeResponse;
use denda_domain::audit::AuditLog;
use denda_domain::employees::EmployeeRepository;
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EmployeeId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEmployeeStatusRequest {
    /// `suspend`, `reinstate` o `terminate`
    pub action: String,
}

/// Use Case: cambiar el estado de un empleado
///
/// Las transiciones válidas las decide el agregado; la baja es
/// definitiva.
pub struct ChangeEmployeeStatusUseCase {
    employees: Arc<dyn EmployeeRepository>,
    audit: RecordAuditUseCase,
}

impl ChangeEmployeeStatusUseCase {
    pub fn new(employees: Arc<dyn EmployeeRepository>, audit: RecordAuditUseCase) -> Self {
        Self { employees, audit }
    }

    pub async fn execute(
        &self,
        employee_id: EmployeeId,
        request: ChangeEmployeeStatusRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EmployeeResponse> {
        // 1. Cargar el empleado
        let mut employee = self
            .employees
            .find_by_id(&employee_id)
            .await?
            .ok_or_else(|| DomainError::EmployeeNotFound {
                employee_id: employee_id.clone(),
            })?;
        let previous_status = employee.status.to_string();

        // 2. Aplicar la acción solicitada
        let event_type = match request.action.trim().to_ascii_lowercase().as_str() {
            "suspend" => {
                employee.suspend()?;
                "employee.suspended"
            }
            "reinstate" => {
                employee.reinstate()?;
                "employee.reinstated"
            }
            "terminate" => {
                employee.terminate()?;
                "employee.terminated"
            }
            _ => {
                return Err(DomainError::validation(
                    "action",
                    "must be one of: suspend, reinstate, terminate",
                )
                .into());
            }
        };

        // 3. Persistir y auditar la transición
        self.employees.save(&employee).await?;

        tracing::info!(
            employee_id = %employee.id,
            from = %previous_status,
            to = %employee.status,
            "Employee status changed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    event_type,
                    "employee",
                    employee.id.to_string(),
                    json!({ "from": previous_status, "to": employee.status.to_string() }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EmployeeResponse::from(&employee))
    }
}
