//! Employees Use Cases
//!
//! Contratación y ciclo de vida de los empleados de un establecimiento

pub mod hire;
pub mod lifecycle;
pub mod queries;
pub mod update;

pub use hire::*;
pub use lifecycle::*;
pub use queries::*;
pub use update::*;

use denda_domain::employees::Employee;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub establishment_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub status: String,
    pub hired_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            establishment_id: employee.establishment_id.to_string(),
            first_name: employee.name.first_name().to_string(),
            last_name: employee.name.last_name().to_string(),
            email: employee.email.to_string(),
            phone: employee.phone.as_ref().map(|p| p.formatted()),
            position: employee.position.as_str().to_string(),
            status: employee.status.to_string(),
            hired_at: employee.hired_at.to_rfc3339(),
            created_at: employee.created_at.to_rfc3339(),
            updated_at: employee.updated_at.to_rfc3339(),
        }
    }
}
