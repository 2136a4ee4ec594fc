// Employees Bounded Context
// Maneja el ciclo de vida laboral de los empleados de un establecimiento

use crate::shared_kernel::*;
use crate::values::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_POSITION_LEN: usize = 2;
const MAX_POSITION_LEN: usize = 100;

/// Puesto de trabajo de un empleado
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(String);

impl Position {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let value = raw.into().trim().to_string();
        let len = value.chars().count();
        if len < MIN_POSITION_LEN || len > MAX_POSITION_LEN {
            return Err(DomainError::validation(
                "position",
                format!(
                    "must be {} to {} characters",
                    MIN_POSITION_LEN, MAX_POSITION_LEN
                ),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ValueObject for Position {
    type Value = String;

    fn value(&self) -> &String {
        &self.0
    }
}

/// Agregado Employee - empleado adscrito a un establecimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Identificador único del empleado
    pub id: EmployeeId,
    /// Establecimiento al que pertenece
    pub establishment_id: EstablishmentId,
    /// Nombre completo
    pub name: PersonName,
    /// Email de contacto (único dentro del establecimiento)
    pub email: EmailAddress,
    /// Teléfono de contacto (opcional)
    pub phone: Option<PhoneNumber>,
    /// Puesto de trabajo
    pub position: Position,
    /// Estado laboral actual
    pub status: EmployeeStatus,
    /// Fecha de contratación
    pub hired_at: DateTime<Utc>,
    /// Fecha de alta del registro
    pub created_at: DateTime<Utc>,
    /// Fecha de última modificación
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Contrata un empleado; arranca en estado activo
    pub fn new(
        establishment_id: EstablishmentId,
        name: PersonName,
        email: EmailAddress,
        phone: Option<PhoneNumber>,
        position: Position,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: EmployeeId::new(),
            establishment_id,
            name,
            email,
            phone,
            position,
            status: EmployeeStatus::Active,
            hired_at: now,
            created_at: now,
            updated_at: now,
        })
    }

    /// Actualiza el nombre
    pub fn with_name(mut self, name: PersonName) -> Result<Self> {
        self.ensure_editable()?;
        self.name = name;
        self.touch();
        Ok(self)
    }

    /// Actualiza el email
    pub fn with_email(mut self, email: EmailAddress) -> Result<Self> {
        self.ensure_editable()?;
        self.email = email;
        self.touch();
        Ok(self)
    }

    /// Reemplaza el teléfono (None lo elimina)
    pub fn with_phone(mut self, phone: Option<PhoneNumber>) -> Result<Self> {
        self.ensure_editable()?;
        self.phone = phone;
        self.touch();
        Ok(self)
    }

    /// Actualiza el puesto de trabajo
    pub fn with_position(mut self, position: Position) -> Result<Self> {
        self.ensure_editable()?;
        self.position = position;
        self.touch();
        Ok(self)
    }

    /// Suspende temporalmente; solo desde activo
    pub fn suspend(&mut self) -> Result<()> {
        self.transition_to(EmployeeStatus::Suspended)
    }

    /// Levanta la suspensión; solo desde suspendido
    pub fn reinstate(&mut self) -> Result<()> {
        self.transition_to(EmployeeStatus::Active)
    }

    /// Da de baja definitiva; el estado terminado es terminal
    pub fn terminate(&mut self) -> Result<()> {
        self.transition_to(EmployeeStatus::Terminated)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    fn transition_to(&mut self, target: EmployeeStatus) -> Result<()> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    // Los registros terminados quedan congelados
    fn ensure_editable(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: self.status.to_string(),
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Aggregate for Employee {
    type Id = EmployeeId;

    fn aggregate_id(&self) -> &Self::Id {
        &self.id
    }
}

/// Filtro para listados de empleados de un establecimiento
#[derive(Debug, Clone)]
pub struct EmployeeFilter {
    pub status: Option<EmployeeStatus>,
    pub limit: usize,
    pub offset: usize,
}

impl EmployeeFilter {
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn new() -> Self {
        Self {
            status: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_pagination(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Comprueba el filtro contra un empleado (paginación aparte)
    pub fn matches(&self, employee: &Employee) -> bool {
        match &self.status {
            Some(status) => &employee.status == status,
            None => true,
        }
    }
}

impl Default for EmployeeFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait para repositorios de empleados
#[async_trait::async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserta o actualiza el empleado
    async fn save(&self, employee: &Employee) -> Result<()>;
    async fn find_by_id(&self, employee_id: &EmployeeId) -> Result<Option<Employee>>;
    async fn find_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<Vec<Employee>>;
    async fn count_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<usize>;
    /// Empleados del establecimiento en cualquier estado salvo terminado
    async fn count_non_terminated(&self, establishment_id: &EstablishmentId) -> Result<usize>;
    async fn exists_by_email_in_establishment(
        &self,
        establishment_id: &EstablishmentId,
        email: &EmailAddress,
    ) -> Result<bool>;
    async fn delete(&self, employee_id: &EmployeeId) -> Result<()>;
}
