// Establishments Bounded Context
// Maneja el ciclo de vida de establecimientos y sus puntos de contacto

use crate::establishments::contact_points::*;
use crate::shared_kernel::*;
use crate::values::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_ESTABLISHMENT_NAME_LEN: usize = 2;
const MAX_ESTABLISHMENT_NAME_LEN: usize = 150;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Nombre comercial de un establecimiento
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstablishmentName(String);

impl EstablishmentName {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let value = raw.into().trim().to_string();
        let len = value.chars().count();
        if len < MIN_ESTABLISHMENT_NAME_LEN || len > MAX_ESTABLISHMENT_NAME_LEN {
            return Err(DomainError::validation(
                "name",
                format!(
                    "must be {} to {} characters",
                    MIN_ESTABLISHMENT_NAME_LEN, MAX_ESTABLISHMENT_NAME_LEN
                ),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EstablishmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ValueObject for EstablishmentName {
    type Value = String;

    fn value(&self) -> &String {
        &self.0
    }
}

/// Agregado Establishment - raíz de consistencia para los puntos de contacto
///
/// Invariante: mientras haya direcciones registradas, exactamente una es
/// la principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Establishment {
    /// Identificador único del establecimiento
    pub id: EstablishmentId,
    /// Nombre comercial
    pub name: EstablishmentName,
    /// Descripción libre (opcional)
    pub description: Option<String>,
    /// Estado actual
    pub status: EstablishmentStatus,
    /// Direcciones registradas
    pub addresses: Vec<EstablishmentAddress>,
    /// Teléfonos registrados
    pub phones: Vec<EstablishmentPhone>,
    /// Enlaces de redes sociales (uno por plataforma)
    pub social_media: Vec<SocialMediaLink>,
    /// Personas de contacto
    pub contacts: Vec<ContactPerson>,
    /// Fecha de alta
    pub created_at: DateTime<Utc>,
    /// Fecha de última modificación
    pub updated_at: DateTime<Utc>,
}

impl Establishment {
    /// Crea un establecimiento activo sin puntos de contacto
    pub fn new(name: EstablishmentName, description: Option<String>) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: EstablishmentId::new(),
            name,
            description: validate_description(description)?,
            status: EstablishmentStatus::Active,
            addresses: Vec::new(),
            phones: Vec::new(),
            social_media: Vec::new(),
            contacts: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Cambia el nombre comercial
    pub fn rename(&mut self, name: EstablishmentName) -> Result<()> {
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Reemplaza la descripción (None la elimina)
    pub fn with_description(&mut self, description: Option<String>) -> Result<()> {
        self.description = validate_description(description)?;
        self.touch();
        Ok(())
    }

    /// Activa el establecimiento; reactivar uno activo es un error
    pub fn activate(&mut self) -> Result<()> {
        self.transition_to(EstablishmentStatus::Active)
    }

    /// Desactiva el establecimiento; desactivar uno inactivo es un error
    pub fn deactivate(&mut self) -> Result<()> {
        self.transition_to(EstablishmentStatus::Inactive)
    }

    fn transition_to(&mut self, target: EstablishmentStatus) -> Result<()> {
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

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Registra una dirección. La primera dirección siempre es la principal;
    /// marcar una nueva como principal degrada la anterior
    pub fn add_address(
        &mut self,
        address: Address,
        is_primary: bool,
        label: Option<String>,
    ) -> Result<AddressId> {
        if self.addresses.iter().any(|a| a.address == address) {
            return Err(DomainError::DuplicateEntry {
                entity: "address".to_string(),
                value: address.single_line(),
            });
        }

        let make_primary = self.addresses.is_empty() || is_primary;
        if make_primary {
            for existing in &mut self.addresses {
                existing.is_primary = false;
            }
        }

        let entry = EstablishmentAddress::new(address, make_primary, label);
        let address_id = entry.id.clone();
        self.addresses.push(entry);
        self.touch();
        Ok(address_id)
    }

    /// Marca la dirección indicada como principal y degrada el resto
    pub fn set_primary_address(&mut self, address_id: &AddressId) -> Result<()> {
        if !self.addresses.iter().any(|a| &a.id == address_id) {
            return Err(DomainError::AddressNotFound {
                address_id: address_id.clone(),
            });
        }
        for address in &mut self.addresses {
            address.is_primary = &address.id == address_id;
        }
        self.touch();
        Ok(())
    }

    /// Elimina una dirección; si era la principal, promociona la primera
    /// restante por orden de inserción
    pub fn remove_address(&mut self, address_id: &AddressId) -> Result<()> {
        let position = self
            .addresses
            .iter()
            .position(|a| &a.id == address_id)
            .ok_or_else(|| DomainError::AddressNotFound {
                address_id: address_id.clone(),
            })?;

        let removed = self.addresses.remove(position);
        if removed.is_primary {
            if let Some(first) = self.addresses.first_mut() {
                first.is_primary = true;
            }
        }
        self.touch();
        Ok(())
    }

    /// Dirección principal, si hay alguna registrada
    pub fn primary_address(&self) -> Option<&EstablishmentAddress> {
        self.addresses.iter().find(|a| a.is_primary)
    }

    /// Registra un teléfono; el número formateado debe ser único
    pub fn add_phone(&mut self, phone: PhoneNumber, label: Option<String>) -> Result<PhoneId> {
        if self
            .phones
            .iter()
            .any(|p| p.phone.formatted() == phone.formatted())
        {
            return Err(DomainError::DuplicateEntry {
                entity: "phone".to_string(),
                value: phone.formatted(),
            });
        }

        let entry = EstablishmentPhone::new(phone, label);
        let phone_id = entry.id.clone();
        self.phones.push(entry);
        self.touch();
        Ok(phone_id)
    }

    pub fn remove_phone(&mut self, phone_id: &PhoneId) -> Result<()> {
        let position = self
            .phones
            .iter()
            .position(|p| &p.id == phone_id)
            .ok_or_else(|| DomainError::PhoneNotFound {
                phone_id: phone_id.clone(),
            })?;
        self.phones.remove(position);
        self.touch();
        Ok(())
    }

    /// Registra un enlace de red social; se admite un único enlace por
    /// plataforma
    pub fn add_social_media(
        &mut self,
        platform: SocialMediaPlatform,
        url: WebUrl,
    ) -> Result<SocialMediaId> {
        if self.social_media.iter().any(|s| s.platform == platform) {
            return Err(DomainError::DuplicateEntry {
                entity: "social media link".to_string(),
                value: platform.to_string(),
            });
        }

        let entry = SocialMediaLink::new(platform, url);
        let social_media_id = entry.id.clone();
        self.social_media.push(entry);
        self.touch();
        Ok(social_media_id)
    }

    pub fn remove_social_media(&mut self, social_media_id: &SocialMediaId) -> Result<()> {
        let position = self
            .social_media
            .iter()
            .position(|s| &s.id == social_media_id)
            .ok_or_else(|| DomainError::SocialMediaNotFound {
                social_media_id: social_media_id.clone(),
            })?;
        self.social_media.remove(position);
        self.touch();
        Ok(())
    }

    /// Registra una persona de contacto; el email debe ser único entre
    /// los contactos del establecimiento
    pub fn add_contact(
        &mut self,
        name: PersonName,
        email: EmailAddress,
        phone: Option<PhoneNumber>,
        role: Option<String>,
    ) -> Result<ContactId> {
        if self.contacts.iter().any(|c| c.email == email) {
            return Err(DomainError::DuplicateEntry {
                entity: "contact".to_string(),
                value: email.to_string(),
            });
        }

        let entry = ContactPerson::new(name, email, phone, role);
        let contact_id = entry.id.clone();
        self.contacts.push(entry);
        self.touch();
        Ok(contact_id)
    }

    /// Reemplaza los datos de una persona de contacto
    pub fn update_contact(
        &mut self,
        contact_id: &ContactId,
        name: PersonName,
        email: EmailAddress,
        phone: Option<PhoneNumber>,
        role: Option<String>,
    ) -> Result<()> {
        if self
            .contacts
            .iter()
            .any(|c| &c.id != contact_id && c.email == email)
        {
            return Err(DomainError::DuplicateEntry {
                entity: "contact".to_string(),
                value: email.to_string(),
            });
        }

        let contact = self
            .contacts
            .iter_mut()
            .find(|c| &c.id == contact_id)
            .ok_or_else(|| DomainError::ContactNotFound {
                contact_id: contact_id.clone(),
            })?;

        let replacement = ContactPerson::new(name, email, phone, role);
        contact.name = replacement.name;
        contact.email = replacement.email;
        contact.phone = replacement.phone;
        contact.role = replacement.role;
        self.touch();
        Ok(())
    }

    pub fn remove_contact(&mut self, contact_id: &ContactId) -> Result<()> {
        let position = self
            .contacts
            .iter()
            .position(|c| &c.id == contact_id)
            .ok_or_else(|| DomainError::ContactNotFound {
                contact_id: contact_id.clone(),
            })?;
        self.contacts.remove(position);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Aggregate for Establishment {
    type Id = EstablishmentId;

    fn aggregate_id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_description(description: Option<String>) -> Result<Option<String>> {
    match description {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::validation(
                    "description",
                    format!("cannot exceed {} characters", MAX_DESCRIPTION_LEN),
                ));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

/// Filtro para listados de establecimientos
#[derive(Debug, Clone)]
pub struct EstablishmentFilter {
    pub status: Option<EstablishmentStatus>,
    pub name_contains: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl EstablishmentFilter {
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn new() -> Self {
        Self {
            status: None,
            name_contains: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: EstablishmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    pub fn with_pagination(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Comprueba el filtro contra un establecimiento (paginación aparte)
    pub fn matches(&self, establishment: &Establishment) -> bool {
        if let Some(status) = &self.status {
            if &establishment.status != status {
                return false;
            }
        }
        if let Some(fragment) = &self.name_contains {
            let haystack = establishment.name.as_str().to_lowercase();
            if !haystack.contains(&fragment.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

impl Default for EstablishmentFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait para repositorios de establecimientos
#[async_trait::async_trait]
pub trait EstablishmentRepository: Send + Sync {
    /// Inserta o actualiza el agregado completo, puntos de contacto incluidos
    async fn save(&self, establishment: &Establishment) -> Result<()>;
    async fn find_by_id(
        &self,
        establishment_id: &EstablishmentId,
    ) -> Result<Option<Establishment>>;
    async fn find_all(&self, filter: &EstablishmentFilter) -> Result<Vec<Establishment>>;
    async fn count(&self, filter: &EstablishmentFilter) -> Result<usize>;
    async fn exists_by_name(&self, name: &str) -> Result<bool>;
    async fn delete(&self, establishment_id: &EstablishmentId) -> Result<()>;
}
