//! PostgreSQL Employee Repository

use denda_domain::employees::{Employee, EmployeeFilter, EmployeeRepository, Position};
use denda_domain::shared_kernel::{
    DomainError, EmployeeId, EmployeeStatus, EstablishmentId, Result,
};
use denda_domain::values::{EmailAddress, PersonName, PhoneNumber};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

/// Repositorio PostgreSQL de empleados
#[derive(Clone)]
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn save(&self, employee: &Employee) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employees
                (id, establishment_id, first_name, last_name, email,
                 phone_country_code, phone_number, position, status,
                 hired_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                phone_country_code = EXCLUDED.phone_country_code,
                phone_number = EXCLUDED.phone_number,
                position = EXCLUDED.position,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(employee.id.0)
        .bind(employee.establishment_id.0)
        .bind(employee.name.first_name())
        .bind(employee.name.last_name())
        .bind(employee.email.as_str())
        .bind(employee.phone.as_ref().map(|p| p.country_code()))
        .bind(employee.phone.as_ref().map(|p| p.number()))
        .bind(employee.position.as_str())
        .bind(employee.status.to_string())
        .bind(employee.hired_at)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to save employee: {}", e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, employee_id: &EmployeeId) -> Result<Option<Employee>> {
        let row = sqlx::query(
            r#"
            SELECT id, establishment_id, first_name, last_name, email,
                   phone_country_code, phone_number, position, status,
                   hired_at, created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(employee_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to find employee by id: {}", e),
        })?;

        match row {
            Some(row) => Ok(Some(map_row_to_employee(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<Vec<Employee>> {
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            SELECT id, establishment_id, first_name, last_name, email,
                   phone_country_code, phone_number, position, status,
                   hired_at, created_at, updated_at
            FROM employees
            WHERE establishment_id = "#,
        );
        qb.push_bind(establishment_id.0);
        if let Some(status) = &filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status.to_string());
        }
        qb.push(" ORDER BY hired_at ASC LIMIT ");
        qb.push_bind(filter.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(filter.offset as i64);

        let rows = qb.build().fetch_all(&self.pool).await.map_err(|e| {
            DomainError::InfrastructureError {
                message: format!("Failed to list employees: {}", e),
            }
        })?;

        let mut employees = Vec::with_capacity(rows.len());
        for row in &rows {
            employees.push(map_row_to_employee(row)?);
        }
        Ok(employees)
    }

    async fn count_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<usize> {
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            "SELECT COUNT(*) as count FROM employees WHERE establishment_id = ",
        );
        qb.push_bind(establishment_id.0);
        if let Some(status) = &filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status.to_string());
        }

        let row = qb.build().fetch_one(&self.pool).await.map_err(|e| {
            DomainError::InfrastructureError {
                message: format!("Failed to count employees: {}", e),
            }
        })?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn count_non_terminated(&self, establishment_id: &EstablishmentId) -> Result<usize> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM employees WHERE establishment_id = $1 AND status <> $2",
        )
        .bind(establishment_id.0)
        .bind(EmployeeStatus::Terminated.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to count non-terminated employees: {}", e),
        })?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn exists_by_email_in_establishment(
        &self,
        establishment_id: &EstablishmentId,
        email: &EmailAddress,
    ) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE establishment_id = $1 AND email = $2) AS present",
        )
        .bind(establishment_id.0)
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to check employee email: {}", e),
        })?;

        Ok(row.get("present"))
    }

    async fn delete(&self, employee_id: &EmployeeId) -> Result<()> {
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(employee_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to delete employee: {}", e),
            })?;

        Ok(())
    }
}

fn map_row_to_employee(row: &PgRow) -> Result<Employee> {
    let id: Uuid = row.get("id");
    let establishment_id: Uuid = row.get("establishment_id");
    let status_raw: String = row.get("status");

    let name = PersonName::new(
        row.get::<String, _>("first_name"),
        row.get::<String, _>("last_name"),
    )
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Stored employee name is invalid: {}", e),
    })?;
    let email = EmailAddress::new(row.get::<String, _>("email")).map_err(|e| {
        DomainError::InfrastructureError {
            message: format!("Stored employee email is invalid: {}", e),
        }
    })?;
    let position = Position::new(row.get::<String, _>("position")).map_err(|e| {
        DomainError::InfrastructureError {
            message: format!("Stored employee position is invalid: {}", e),
        }
    })?;
    let status: EmployeeStatus =
        status_raw
            .parse()
            .map_err(|e: String| DomainError::InfrastructureError {
                message: format!("Stored employee status is invalid: {}", e),
            })?;

    let phone = match (
        row.get::<Option<String>, _>("phone_country_code"),
        row.get::<Option<String>, _>("phone_number"),
    ) {
        (Some(country_code), Some(number)) => {
            Some(PhoneNumber::new(country_code, number).map_err(|e| {
                DomainError::InfrastructureError {
                    message: format!("Stored employee phone is invalid: {}", e),
                }
            })?)
        }
        _ => None,
    };

    Ok(Employee {
        id: EmployeeId(id),
        establishment_id: EstablishmentId(establishment_id),
        name,
        email,
        phone,
        position,
        status,
        hired_at: row.get("hired_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
