// Shared Kernel - Tipos base y errores compartidos entre bounded contexts

pub use denda_shared::*;

/// Errores del dominio
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("Validation failed for {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Establishment not found: {establishment_id}")]
    EstablishmentNotFound { establishment_id: EstablishmentId },

    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound { employee_id: EmployeeId },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: UserId },

    #[error("Address not found: {address_id}")]
    AddressNotFound { address_id: AddressId },

    #[error("Phone not found: {phone_id}")]
    PhoneNotFound { phone_id: PhoneId },

    #[error("Social media link not found: {social_media_id}")]
    SocialMediaNotFound { social_media_id: SocialMediaId },

    #[error("Contact not found: {contact_id}")]
    ContactNotFound { contact_id: ContactId },

    #[error("Duplicate {entity}: {value}")]
    DuplicateEntry { entity: String, value: String },

    #[error("Establishment {establishment_id} still has {active_employees} non-terminated employees")]
    EstablishmentHasEmployees {
        establishment_id: EstablishmentId,
        active_employees: usize,
    },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient role: requires {required}, actual {actual}")]
    InsufficientRole { required: String, actual: String },

    #[error("Infrastructure error: {message}")]
    InfrastructureError { message: String },
}

impl DomainError {
    /// Atajo para errores de validación de value objects
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// Trait para entidades con ID
pub trait Identifiable {
    type Id;
    fn id(&self) -> &Self::Id;
}

/// Trait para agregados
pub trait Aggregate {
    type Id;
    fn aggregate_id(&self) -> &Self::Id;
}

/// Trait para value objects
pub trait ValueObject {
    type Value;
    fn value(&self) -> &Self::Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = DomainError::validation("email", "must contain '@'");
        assert!(err.to_string().contains("email"));
        assert!(err.to_string().contains("must contain '@'"));
    }

    #[test]
    fn test_not_found_display_includes_id() {
        let id = EstablishmentId::new();
        let err = DomainError::EstablishmentNotFound {
            establishment_id: id.clone(),
        };
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_state_transition_display() {
        let err = DomainError::InvalidStateTransition {
            from: "ACTIVE".to_string(),
            to: "ACTIVE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition from ACTIVE to ACTIVE"
        );
    }
}
