//! Establishments Use Cases
//!
//! Gestión de establecimientos y sus puntos de contacto

pub mod addresses;
pub mod contacts;
pub mod create;
pub mod delete;
pub mod phones;
pub mod queries;
pub mod social_media;
pub mod update;

pub use addresses::*;
pub use contacts::*;
pub use create::*;
pub use delete::*;
pub use phones::*;
pub use queries::*;
pub use social_media::*;
pub use update::*;

use denda_domain::establishments::{
    ContactPerson, Establishment, EstablishmentAddress, EstablishmentPhone, SocialMediaLink,
};
use serde::{Deserialize, Serialize};

/// Teléfono en peticiones de la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonePayload {
    pub country_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: String,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
    pub label: Option<String>,
}

impl From<&EstablishmentAddress> for AddressResponse {
    fn from(entry: &EstablishmentAddress) -> Self {
        Self {
            id: entry.id.to_string(),
            street: entry.address.street().to_string(),
            city: entry.address.city().to_string(),
            state: entry.address.state().map(|s| s.to_string()),
            postal_code: entry.address.postal_code().to_string(),
            country: entry.address.country().to_string(),
            is_primary: entry.is_primary,
            label: entry.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneResponse {
    pub id: String,
    pub country_code: String,
    pub number: String,
    pub formatted: String,
    pub label: Option<String>,
}

impl From<&EstablishmentPhone> for PhoneResponse {
    fn from(entry: &EstablishmentPhone) -> Self {
        Self {
            id: entry.id.to_string(),
            country_code: entry.phone.country_code().to_string(),
            number: entry.phone.number().to_string(),
            formatted: entry.phone.formatted(),
            label: entry.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialMediaResponse {
    pub id: String,
    pub platform: String,
    pub url: String,
}

impl From<&SocialMediaLink> for SocialMediaResponse {
    fn from(entry: &SocialMediaLink) -> Self {
        Self {
            id: entry.id.to_string(),
            platform: entry.platform.to_string(),
            url: entry.url.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl From<&ContactPerson> for ContactResponse {
    fn from(entry: &ContactPerson) -> Self {
        Self {
            id: entry.id.to_string(),
            first_name: entry.name.first_name().to_string(),
            last_name: entry.name.last_name().to_string(),
            email: entry.email.to_string(),
            phone: entry.phone.as_ref().map(|p| p.formatted()),
            role: entry.role.clone(),
        }
    }
}

/// Vista completa del establecimiento devuelta por la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstablishmentResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub addresses: Vec<AddressResponse>,
    pub phones: Vec<PhoneResponse>,
    pub social_media: Vec<SocialMediaResponse>,
    pub contacts: Vec<ContactResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Establishment> for EstablishmentResponse {
    fn from(establishment: &Establishment) -> Self {
        Self {
            id: establishment.id.to_string(),
            name: establishment.name.to_string(),
            description: establishment.description.clone(),
            status: establishment.status.to_string(),
            addresses: establishment.addresses.iter().map(AddressResponse::from).collect(),
            phones: establishment.phones.iter().map(PhoneResponse::from).collect(),
            social_media: establishment
                .social_media
                .iter()
                .map(SocialMediaResponse::from)
                .collect(),
            contacts: establishment.contacts.iter().map(ContactResponse::from).collect(),
            created_at: establishment.created_at.to_rfc3339(),
            updated_at: establishment.updated_at.to_rfc3339(),
        }
    }
}
