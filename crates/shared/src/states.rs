use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estados posibles de un establecimiento
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstablishmentStatus {
    Active,
    Inactive,
}

impl EstablishmentStatus {
    /// Valida si una transición de estado es válida.
    ///
    /// Transiciones válidas:
    /// - Active → Inactive
    /// - Inactive → Active
    pub fn can_transition_to(&self, new_status: &EstablishmentStatus) -> bool {
        self != new_status
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EstablishmentStatus::Active)
    }
}

impl fmt::Display for EstablishmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstablishmentStatus::Active => write!(f, "ACTIVE"),
            EstablishmentStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl FromStr for EstablishmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(EstablishmentStatus::Active),
            "INACTIVE" => Ok(EstablishmentStatus::Inactive),
            _ => Err(format!("Invalid EstablishmentStatus: {}", s)),
        }
    }
}

/// Estados del ciclo de vida de un empleado
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Suspended,
    Terminated,
}

impl EmployeeStatus {
    /// Valida si una transición de estado es válida.
    ///
    /// Transiciones válidas:
    /// - Active → Suspended, Terminated
    /// - Suspended → Active, Terminated
    /// - Terminated → (terminal, sin transiciones salientes)
    pub fn can_transition_to(&self, new_status: &EmployeeStatus) -> bool {
        match (self, new_status) {
            (s, n) if s == n => false,
            (EmployeeStatus::Active, EmployeeStatus::Suspended) => true,
            (EmployeeStatus::Active, EmployeeStatus::Terminated) => true,
            (EmployeeStatus::Suspended, EmployeeStatus::Active) => true,
            (EmployeeStatus::Suspended, EmployeeStatus::Terminated) => true,
            _ => false,
        }
    }

    /// Retorna true si el estado es terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmployeeStatus::Terminated)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EmployeeStatus::Active)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "ACTIVE"),
            EmployeeStatus::Suspended => write!(f, "SUSPENDED"),
            EmployeeStatus::Terminated => write!(f, "TERMINATED"),
        }
    }
}

impl FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(EmployeeStatus::Active),
            "SUSPENDED" => Ok(EmployeeStatus::Suspended),
            "TERMINATED" => Ok(EmployeeStatus::Terminated),
            _ => Err(format!("Invalid EmployeeStatus: {}", s)),
        }
    }
}
