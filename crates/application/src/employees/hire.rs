// Employee Use Cases
// UC: contratación de un empleado

use crate::audit::RecordAuditUseCase;
use crate::employees::EmployeeResponse;
use crate::establishments::PhonePayload;
use denda_domain::audit::AuditLog;
use denda_domain::employees::{Employee, EmployeeRepository, Position};
use denda_domain::establishments::EstablishmentRepository;
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EstablishmentId};
use denda_domain::values::{EmailAddress, PersonName, PhoneNumber};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HireEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<PhonePayload>,
    pub position: String,
}

/// Use Case: contratar un empleado para un establecimiento
///
/// Solo los establecimientos activos contratan; el email es único
/// dentro del establecimiento.
pub struct HireEmployeeUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    employees: Arc<dyn EmployeeRepository>,
    audit: RecordAuditUseCase,
}

impl HireEmployeeUseCase {
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
        request: HireEmployeeRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EmployeeResponse> {
        // 1. El establecimiento debe existir y estar activo
        let establishment = self
            .establishments
            .find_by_id(&establishment_id)
            .await?
            .ok_or_else(|| DomainError::EstablishmentNotFound {
                establishment_id: establishment_id.clone(),
            })?;
        if !establishment.is_active() {
            return Err(DomainError::validation(
                "establishment_id",
                "establishment is not active",
            )
            .into());
        }

        // 2. Validar los datos del empleado
        let name = PersonName::new(request.first_name, request.last_name)?;
        let email = EmailAddress::new(request.email)?;
        let phone = request
            .phone
            .map(|p| PhoneNumber::new(p.country_code, p.number))
            .transpose()?;
        let position = Position::new(request.position)?;

        // 3. El email es único dentro del establecimiento
        if self
            .employees
            .exists_by_email_in_establishment(&establishment_id, &email)
            .await?
        {
            return Err(DomainError::DuplicateEntry {
                entity: "employee".to_string(),
                value: email.to_string(),
            }
            .into());
        }

        // 4. Crear y persistir el empleado
        let employee = Employee::new(establishment_id.clone(), name, email, phone, position)?;
        self.employees.save(&employee).await?;

        tracing::info!(
            employee_id = %employee.id,
            establishment_id = %establishment_id,
            "Employee hired"
        );

        // 5. Registrar auditoría
        self.audit
            .execute(
                AuditLog::new(
                    "employee.hired",
                    "employee",
                    employee.id.to_string(),
                    json!({
                        "establishment_id": establishment_id.to_string(),
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
    use crate::testing::{
        CapturingAuditRepository, MemoryEmployeeRepository, MemoryEstablishmentRepository,
    };
    use denda_domain::establishments::{Establishment, EstablishmentName};

    fn request(email: &str) -> HireEmployeeRequest {
        HireEmployeeRequest {
            first_name: "Miren".to_string(),
            last_name: "Etxebarria".to_string(),
            email: email.to_string(),
            phone: None,
            position: "Cajera".to_string(),
        }
    }

    fn seeded(
        establishment: Establishment,
    ) -> (
        Arc<MemoryEmployeeRepository>,
        Arc<CapturingAuditRepository>,
        HireEmployeeUseCase,
    ) {
        let establishments = Arc::new(MemoryEstablishmentRepository::with_establishment(
            establishment,
        ));
        let employees = Arc::new(MemoryEmployeeRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = HireEmployeeUseCase::new(
            establishments,
            employees.clone(),
            RecordAuditUseCase::new(audit_log.clone()),
        );
        (employees, audit_log, use_case)
    }

    fn establishment() -> Establishment {
        Establishment::new(EstablishmentName::new("Denda Berria").unwrap(), None).unwrap()
    }

    #[tokio::test]
    async fn test_hire_employee_into_active_establishment() {
        let existing = establishment();
        let id = existing.id.clone();
        let (employees, audit_log, use_case) = seeded(existing);

        let response = use_case
            .execute(id.clone(), request("miren@denda.eus"), &RequestContext::new())
            .await
            .unwrap();

        assert_eq!(response.status, "ACTIVE");
        assert_eq!(response.establishment_id, id.to_string());
        assert_eq!(employees.len(), 1);
        assert!(audit_log.has_event_type("employee.hired"));
    }

    #[tokio::test]
    async fn test_hire_into_inactive_establishment_fails() {
        let mut existing = establishment();
        existing.deactivate().unwrap();
        let id = existing.id.clone();
        let (employees, _, use_case) = seeded(existing);

        let result = use_case
            .execute(id, request("miren@denda.eus"), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::ValidationError { .. })
        ));
        assert!(employees.is_empty());
    }

    #[tokio::test]
    async fn test_hire_duplicate_email_in_establishment_fails() {
        let existing = establishment();
        let id = existing.id.clone();
        let (employees, _, use_case) = seeded(existing);
        use_case
            .execute(id.clone(), request("miren@denda.eus"), &RequestContext::new())
            .await
            .unwrap();

        let result = use_case
            .execute(id, request("MIREN@denda.eus"), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::DuplicateEntry { .. })
        ));
        assert_eq!(employees.len(), 1);
    }

    #[tokio::test]
    async fn test_hire_into_unknown_establishment_fails() {
        let (_, _, use_case) = seeded(establishment());

        let result = use_case
            .execute(
                EstablishmentId::new(),
                request("miren@denda.eus"),
                &RequestContext::new(),
            )
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::EstablishmentNotFound { .. })
        ));
    }
}
