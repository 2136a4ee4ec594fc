// Employee Use Cases
// UC: consulta de empleados

use crate::employees::EmployeeResponse;
use denda_domain::employees::{EmployeeFilter, EmployeeRepository};
use denda_domain::establishments::EstablishmentRepository;
use denda_domain::shared_kernel::{DomainError, EmployeeId, EmployeeStatus, EstablishmentId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct GetEmployeeUseCase {
    employees: Arc<dyn EmployeeRepository>,
}

impl GetEmployeeUseCase {
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    pub async fn execute(&self, employee_id: EmployeeId) -> anyhow::Result<EmployeeResponse> {
        let employee = self
            .employees
            .find_by_id(&employee_id)
            .await?
            .ok_or(DomainError::EmployeeNotFound { employee_id })?;

        Ok(EmployeeResponse::from(&employee))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEmployeesRequest {
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEmployeesResponse {
    pub employees: Vec<EmployeeResponse>,
    pub total_count: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Use Case: listar la plantilla de un establecimiento
pub struct ListEmployeesUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl ListEmployeesUseCase {
    pub fn new(
        establishments: Arc<dyn EstablishmentRepository>,
        employees: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            establishments,
            employees,
        }
    }

    pub async fn execute(
        &self,
        establishment_id: EstablishmentId,
        request: ListEmployeesRequest,
    ) -> anyhow::Result<ListEmployeesResponse> {
        // 1. El establecimiento debe existir
        if self
            .establishments
            .find_by_id(&establishment_id)
            .await?
            .is_none()
        {
            return Err(DomainError::EstablishmentNotFound { establishment_id }.into());
        }

        // 2. Construir el filtro y recuperar la página
        let mut filter = EmployeeFilter::new().with_pagination(
            request.limit.unwrap_or(EmployeeFilter::DEFAULT_LIMIT),
            request.offset.unwrap_or(0),
        );
        if let Some(raw_status) = request.status {
            let status: EmployeeStatus = raw_status
                .parse()
                .map_err(|e: String| DomainError::validation("status", e))?;
            filter = filter.with_status(status);
        }

        let employees = self
            .employees
            .find_by_establishment(&establishment_id, &filter)
            .await?;
        let total_count = self
            .employees
            .count_by_establishment(&establishment_id, &filter)
            .await?;

        Ok(ListEmployeesResponse {
            employees: employees.iter().map(EmployeeResponse::from).collect(),
            total_count,
            limit: filter.limit,
            offset: filter.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryEmployeeRepository, MemoryEstablishmentRepository};
    use denda_domain::employees::{Employee, Position};
    use denda_domain::establishments::{Establishment, EstablishmentName};
    use denda_domain::values::{EmailAddress, PersonName};

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

    fn seeded() -> (
        Arc<MemoryEstablishmentRepository>,
        Arc<MemoryEmployeeRepository>,
        EstablishmentId,
    ) {
        let establishment =
            Establishment::new(EstablishmentName::new("Denda Berria").unwrap(), None).unwrap();
        let id = establishment.id.clone();
        let establishments = Arc::new(MemoryEstablishmentRepository::with_establishment(
            establishment,
        ));
        let employees = Arc::new(MemoryEmployeeRepository::new());
        (establishments, employees, id)
    }

    #[tokio::test]
    async fn test_get_employee_by_id() {
        let (_, employees, establishment_id) = seeded();
        let existing = employee(&establishment_id, "miren@denda.eus");
        let id = existing.id.clone();
        employees.insert(existing);
        let use_case = GetEmployeeUseCase::new(employees);

        let response = use_case.execute(id.clone()).await.unwrap();

        assert_eq!(response.id, id.to_string());
        assert_eq!(response.email, "miren@denda.eus");
    }

    #[tokio::test]
    async fn test_get_unknown_employee_fails() {
        let employees = Arc::new(MemoryEmployeeRepository::new());
        let use_case = GetEmployeeUseCase::new(employees);

        let result = use_case.execute(EmployeeId::new()).await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::EmployeeNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (establishments, employees, establishment_id) = seeded();
        employees.insert(employee(&establishment_id, "miren@denda.eus"));
        let mut suspended = employee(&establishment_id, "jon@denda.eus");
        suspended.suspend().unwrap();
        employees.insert(suspended);
        let use_case = ListEmployeesUseCase::new(establishments, employees);

        let response = use_case
            .execute(
                establishment_id,
                ListEmployeesRequest {
                    status: Some("SUSPENDED".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(response.total_count, 1);
        assert_eq!(response.employees[0].email, "jon@denda.eus");
    }

    #[tokio::test]
    async fn test_list_only_returns_requested_establishment() {
        let (establishments, employees, establishment_id) = seeded();
        employees.insert(employee(&establishment_id, "miren@denda.eus"));
        employees.insert(employee(&EstablishmentId::new(), "otra@denda.eus"));
        let use_case = ListEmployeesUseCase::new(establishments, employees);

        let response = use_case
            .execute(establishment_id, ListEmployeesRequest::default())
            .await
            .unwrap();

        assert_eq!(response.total_count, 1);
        assert_eq!(response.employees[0].email, "miren@denda.eus");
    }

    #[tokio::test]
    async fn test_list_for_unknown_establishment_fails() {
        let establishments = Arc::new(MemoryEstablishmentRepository::new());
        let employees = Arc::new(MemoryEmployeeRepository::new());
        let use_case = ListEmployeesUseCase::new(establishments, employees);

        let result = use_case
            .execute(EstablishmentId::new(), ListEmployeesRequest::default())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::EstablishmentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status() {
        let (establishments, employees, establishment_id) = seeded();
        let use_case = ListEmployeesUseCase::new(establishments, employees);

        let result = use_case
            .execute(
                establishment_id,
                ListEmployeesRequest {
                    status: Some("FIRED".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::ValidationError { .. })
        ));
    }
}
