// Establishment Use Cases
// UC: gestión de personas de contacto del establecimiento

use crate::audit::RecordAuditUseCase;
use crate::establishments::{EstablishmentResponse, PhonePayload};
use denda_domain::audit::AuditLog;
use denda_domain::establishments::{Establishment, EstablishmentRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{ContactId, DomainError, EstablishmentId};
use denda_domain::values::{EmailAddress, PersonName, PhoneNumber};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Datos completos de la persona de contacto; se usan tanto en el alta
/// como en la actualización (reemplazo completo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<PhonePayload>,
    pub role: Option<String>,
}

pub struct ManageContactsUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    audit: RecordAuditUseCase,
}

impl ManageContactsUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>, audit: RecordAuditUseCase) -> Self {
        Self {
            establishments,
            audit,
        }
    }

    pub async fn add(
        &self,
        establishment_id: EstablishmentId,
        request: ContactRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Cargar el agregado y validar los datos de la persona
        let mut establishment = self.load(&establishment_id).await?;
        let (name, email, phone) = convert_contact(request.clone())?;

        // 2. Registrar el contacto; el email debe ser único en el establecimiento
        let contact_id = establishment.add_contact(name, email, phone, request.role)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            contact_id = %contact_id,
            "Contact added"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.contact_added",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "contact_id": contact_id.to_string(), "email": request.email }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    pub async fn update(
        &self,
        establishment_id: EstablishmentId,
        contact_id: ContactId,
        request: ContactRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Cargar el agregado y validar los datos nuevos
        let mut establishment = self.load(&establishment_id).await?;
        let (name, email, phone) = convert_contact(request.clone())?;

        // 2. Reemplazar los datos del contacto conservando su identidad
        establishment.update_contact(&contact_id, name, email, phone, request.role)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            contact_id = %contact_id,
            "Contact updated"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.contact_updated",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "contact_id": contact_id.to_string(), "email": request.email }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    pub async fn remove(
        &self,
        establishment_id: EstablishmentId,
        contact_id: ContactId,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        let mut establishment = self.load(&establishment_id).await?;
        establishment.remove_contact(&contact_id)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            contact_id = %contact_id,
            "Contact removed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.contact_removed",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "contact_id": contact_id.to_string() }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    async fn load(&self, establishment_id: &EstablishmentId) -> anyhow::Result<Establishment> {
        Ok(self
            .establishments
            .find_by_id(establishment_id)
            .await?
            .ok_or_else(|| DomainError::EstablishmentNotFound {
                establishment_id: establishment_id.clone(),
            })?)
    }
}

fn convert_contact(
    request: ContactRequest,
) -> anyhow::Result<(PersonName, EmailAddress, Option<PhoneNumber>)> {
    let name = PersonName::new(request.first_name, request.last_name)?;
    let email = EmailAddress::new(request.email)?;
    let phone = request
        .phone
        .map(|p| PhoneNumber::new(p.country_code, p.number))
        .transpose()?;
    Ok((name, email, phone))
}
