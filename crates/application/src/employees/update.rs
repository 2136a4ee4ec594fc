// Employee Use Cases
// UC: actualización de los datos de un empleado

use crate::audit::RecordAuditUseCase;
use crate::employees::EmployeeResponse;
use crate::establishments::PhonePayload;
use denda_domain::audit::AuditLog;
use denda_domain::employees::{EmployeeRepository, Position};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EmployeeId};
use denda_domain::values::{EmailAddress, PersonName, PhoneNumber};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Reemplazo completo de los datos editables; un teléfono ausente lo borra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<PhonePayload>,
    pub position: String,
}

/// Use Case: actualizar los datos de un empleado
///
/// Los empleados terminados están congelados; cualquier intento de
/// actualización devuelve un conflicto de transición.
pub struct UpdateEmployeeUseCase {
    employees: Arc<dyn EmployeeRepository>,
    audit: RecordAuditUseCase,
}

impl UpdateEmployeeUseCase {
    pub fn new(employees: Arc<dyn EmployeeRepository>, audit: RecordAuditUseCase) -> Self {
        Self { employees, audit }
    }

    pub async fn execute(
        &self,
        employee_id: EmployeeId,
        request: UpdateEmployeeRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EmployeeResponse> {
        // 1. Cargar el empleado
        let employee = self
            .employees
            .find_by_id(&employee_id)
            .await?
            .ok_or_else(|| DomainError::EmployeeNotFound {
                employee_id: employee_id.clone(),
            })?;

        // 2. Validar los datos nuevos
        let name = PersonName::new(request.first_name, request.last_name)?;
        let email = EmailAddress::new(request.email)?;
        let phone = request
            .phone
            .map(|p| PhoneNumber::new(p.country_code, p.number))
            .transpose()?;
        let position = Position::new(request.position)?;

        // 3. Si cambia el email, debe seguir siendo único en el establecimiento
        if email != employee.email
            && self
                .employees
                .exists_by_email_in_establishment(&employee.establishment_id, &email)
                .await?
        {
            return Err(DomainError::DuplicateEntry {
                entity: "employee".to_string(),
                value: email.to_string(),
            }
            .into());
        }

        // 4. Aplicar el reemplazo copy-on-write y persistir
        let employee = employee
            .with_name(name)?
            .with_email(email)?
            .with_phone(phone)?
            .with_position(position)?;
        self.employees.save(&employee).await?;

        tracing::info!(employee_id = %employee.id, "Employee updated");

        self.audit
            .execute(
                AuditLog::new(
                    "employee.updated",
                    "employee",
                    employee.id.to_string(),
                    json!({
                        "email": employee.email.to_string(),
                        "position": employee.position.as_str(),
                    }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EmployeeResponse::from(&employee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CapturingAuditRepository, MemoryEmployeeRepository};
    use denda_domain::employees::Employee;
    use denda_domain::shared_kernel::EstablishmentId;

    fn employee(establishment_id: &EstablishmentId, email: &str) -> Employee {
        Employee::new(
            establishment_id.clone(),
            PersonName::new("Miren", "Etxebarria").unwrap(),
            EmailAddress::new(email).unwrap(),
            None,
            Position::new("Cajera").unwrap(),
        )
        .unwrap()
    }

    fn request(email: &str) -> UpdateEmployeeRequest {
        UpdateEmployeeRequest {
            first_name: "Miren".to_string(),
            last_name: "Etxebarria".to_string(),
            email: email.to_string(),
            phone: Some(PhonePayload {
                country_code: "34".to_string(),
                number: "600123456".to_string(),
            }),
            position: "Encargada".to_string(),
        }
    }

    fn use_case(
        employees: Arc<MemoryEmployeeRepository>,
        audit_log: Arc<CapturingAuditRepository>,
    ) -> UpdateEmployeeUseCase {
        UpdateEmployeeUseCase::new(employees, RecordAuditUseCase::new(audit_log))
    }

    #[tokio::test]
    async fn test_update_replaces_editable_fields() {
        let establishment_id = EstablishmentId::new();
        let existing = employee(&establishment_id, "miren@denda.eus");
        let id = existing.id.clone();
        let employees = Arc::new(MemoryEmployeeRepository::with_employee(existing));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(employees.clone(), audit_log.clone());

        let response = use_case
            .execute(id.clone(), request("miren.e@denda.eus"), &RequestContext::new())
            .await
            .unwrap();

        assert_eq!(response.email, "miren.e@denda.eus");
        assert_eq!(response.position, "Encargada");
        assert_eq!(response.phone.as_deref(), Some("+34 600123456"));
        let stored = employees.get(&id).unwrap();
        assert_eq!(stored.position.as_str(), "Encargada");
        assert!(audit_log.has_event_type("employee.updated"));
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_not_a_duplicate() {
        let establishment_id = EstablishmentId::new();
        let existing = employee(&establishment_id, "miren@denda.eus");
        let id = existing.id.clone();
        let employees = Arc::new(MemoryEmployeeRepository::with_employee(existing));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(employees, audit_log);

        let response = use_case
            .execute(id, request("miren@denda.eus"), &RequestContext::new())
            .await
            .unwrap();

        assert_eq!(response.email, "miren@denda.eus");
    }

    #[tokio::test]
    async fn test_update_to_colleague_email_is_a_conflict() {
        let establishment_id = EstablishmentId::new();
        let existing = employee(&establishment_id, "miren@denda.eus");
        let id = existing.id.clone();
        let employees = Arc::new(MemoryEmployeeRepository::with_employee(existing));
        employees.insert(employee(&establishment_id, "jon@denda.eus"));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(employees, audit_log);

        let result = use_case
            .execute(id, request("jon@denda.eus"), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::DuplicateEntry { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_terminated_employee_is_a_conflict() {
        let establishment_id = EstablishmentId::new();
        let mut existing = employee(&establishment_id, "miren@denda.eus");
        existing.terminate().unwrap();
        let id = existing.id.clone();
        let employees = Arc::new(MemoryEmployeeRepository::with_employee(existing));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(employees.clone(), audit_log.clone());

        let result = use_case
            .execute(id.clone(), request("miren.e@denda.eus"), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::InvalidStateTransition { .. })
        ));
        assert_eq!(
            employees.get(&id).unwrap().email.to_string(),
            "miren@denda.eus"
        );
        assert!(audit_log.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_employee_fails() {
        let employees = Arc::new(MemoryEmployeeRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(employees, audit_log);

        let result = use_case
            .execute(
                EmployeeId::new(),
                request("miren@denda.eus"),
                &RequestContext::new(),
            )
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::EmployeeNotFound { .. })
        ));
    }
}
