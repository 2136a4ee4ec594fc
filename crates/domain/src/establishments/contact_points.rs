// Puntos de contacto de un establecimiento: direcciones, teléfonos,
// enlaces de redes sociales y personas de contacto.

use crate::shared_kernel::*;
use crate::values::*;
use serde::{Deserialize, Serialize};

/// Dirección registrada de un establecimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentAddress {
    pub id: AddressId,
    pub address: Address,
    pub is_primary: bool,
    pub label: Option<String>,
}

impl EstablishmentAddress {
    pub fn new(address: Address, is_primary: bool, label: Option<String>) -> Self {
        Self {
            id: AddressId::new(),
            address,
            is_primary,
            label: normalize_label(label),
        }
    }
}

impl Identifiable for EstablishmentAddress {
    type Id = AddressId;

    fn id(&self) -> &AddressId {
        &self.id
    }
}

/// Teléfono registrado de un establecimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentPhone {
    pub id: PhoneId,
    pub phone: PhoneNumber,
    pub label: Option<String>,
}

impl EstablishmentPhone {
    pub fn new(phone: PhoneNumber, label: Option<String>) -> Self {
        Self {
            id: PhoneId::new(),
            phone,
            label: normalize_label(label),
        }
    }
}

impl Identifiable for EstablishmentPhone {
    type Id = PhoneId;

    fn id(&self) -> &PhoneId {
        &self.id
    }
}

/// Enlace a un perfil de red social del establecimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaLink {
    pub id: SocialMediaId,
    pub platform: SocialMediaPlatform,
    pub url: WebUrl,
}

impl SocialMediaLink {
    pub fn new(platform: SocialMediaPlatform, url: WebUrl) -> Self {
        Self {
            id: SocialMediaId::new(),
            platform,
            url,
        }
    }
}

impl Identifiable for SocialMediaLink {
    type Id = SocialMediaId;

    fn id(&self) -> &SocialMediaId {
        &self.id
    }
}

/// Persona de contacto del establecimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPerson {
    pub id: ContactId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub role: Option<String>,
}

impl ContactPerson {
    pub fn new(
        name: PersonName,
        email: EmailAddress,
        phone: Option<PhoneNumber>,
        role: Option<String>,
    ) -> Self {
        Self {
            id: ContactId::new(),
            name,
            email,
            phone,
            role: normalize_label(role),
        }
    }
}

impl Identifiable for ContactPerson {
    type Id = ContactId;

    fn id(&self) -> &ContactId {
        &self.id
    }
}

// Etiquetas en blanco equivalen a ausentes
fn normalize_label(label: Option<String>) -> Option<String> {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_address() -> Address {
        Address::new("Calle Mayor 1", "Bilbao", None, "48001", "España").unwrap()
    }

    #[test]
    fn test_new_address_gets_unique_id() {
        let a = EstablishmentAddress::new(sample_address(), true, None);
        let b = EstablishmentAddress::new(sample_address(), false, None);
        assert_ne!(a.id, b.id);
        assert!(a.is_primary);
        assert!(!b.is_primary);
    }

    #[test]
    fn test_blank_label_is_absent() {
        let phone = PhoneNumber::new("34", "912345678").unwrap();
        let with_blank = EstablishmentPhone::new(phone.clone(), Some("   ".to_string()));
        assert_eq!(with_blank.label, None);

        let with_label = EstablishmentPhone::new(phone, Some(" oficina ".to_string()));
        assert_eq!(with_label.label.as_deref(), Some("oficina"));
    }

    #[test]
    fn test_contact_person_normalizes_role() {
        let contact = ContactPerson::new(
            PersonName::new("Miren", "Etxeberria").unwrap(),
            EmailAddress::new("miren@example.com").unwrap(),
            None,
            Some("".to_string()),
        );
        assert_eq!(contact.role, None);
    }
}
