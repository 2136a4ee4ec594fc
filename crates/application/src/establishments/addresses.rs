// Establishment Use Cases
// UC: gestión de direcciones del establecimiento

use crate::audit::RecordAuditUseCase;
use crate::establishments::EstablishmentResponse;
use denda_domain::audit::AuditLog;
use denda_domain::establishments::{Establishment, EstablishmentRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{AddressId, DomainError, EstablishmentId};
use denda_domain::values::Address;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAddressRequest {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_primary: bool,
    pub label: Option<String>,
}

/// Use Case: gestionar las direcciones de un establecimiento
///
/// Mantiene el invariante de dirección principal única; cada mutación
/// devuelve el agregado completo ya actualizado.
pub struct ManageAddressesUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    audit: RecordAuditUseCase,
}

impl ManageAddressesUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>, audit: RecordAuditUseCase) -> Self {
        Self {
            establishments,
            audit,
        }
    }

    pub async fn add(
        &self,
        establishment_id: EstablishmentId,
        request: AddAddressRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Cargar el agregado y validar la dirección
        let mut establishment = self.load(&establishment_id).await?;
        let address = Address::new(
            request.street,
            request.city,
            request.state,
            request.postal_code,
            request.country,
        )?;
        let single_line = address.single_line();

        // 2. Registrar la dirección; la primera pasa a ser la principal
        let address_id = establishment.add_address(address, request.is_primary, request.label)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            address_id = %address_id,
            "Address added"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.address_added",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "address_id": address_id.to_string(), "address": single_line }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    pub async fn set_primary(
        &self,
        establishment_id: EstablishmentId,
        address_id: AddressId,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        let mut establishment = self.load(&establishment_id).await?;
        establishment.set_primary_address(&address_id)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            address_id = %address_id,
            "Primary address changed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.address_primary_changed",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "address_id": address_id.to_string() }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    pub async fn remove(
        &self,
        establishment_id: EstablishmentId,
        address_id: AddressId,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        let mut establishment = self.load(&establishment_id).await?;
        establishment.remove_address(&address_id)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            address_id = %address_id,
            "Address removed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.address_removed",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "address_id": address_id.to_string() }),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CapturingAuditRepository, MemoryEstablishmentRepository};
    use denda_domain::establishments::EstablishmentName;

    fn request(street: &str, is_primary: bool) -> AddAddressRequest {
        AddAddressRequest {
            street: street.to_string(),
            city: "Bilbao".to_string(),
            state: None,
            postal_code: "48001".to_string(),
            country: "España".to_string(),
            is_primary,
            label: None,
        }
    }

    fn seeded() -> (
        Arc<MemoryEstablishmentRepository>,
        Arc<CapturingAuditRepository>,
        ManageAddressesUseCase,
        EstablishmentId,
    ) {
        let establishment =
            Establishment::new(EstablishmentName::new("Denda Berria").unwrap(), None).unwrap();
        let id = establishment.id.clone();
        let establishments = Arc::new(MemoryEstablishmentRepository::with_establishment(
            establishment,
        ));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = ManageAddressesUseCase::new(
            establishments.clone(),
            RecordAuditUseCase::new(audit_log.clone()),
        );
        (establishments, audit_log, use_case, id)
    }

    #[tokio::test]
    async fn test_first_address_becomes_primary() {
        let (establishments, audit_log, use_case, id) = seeded();

        let response = use_case
            .add(id.clone(), request("Calle Mayor 1", false), &RequestContext::new())
            .await
            .unwrap();

        assert_eq!(response.addresses.len(), 1);
        assert!(response.addresses[0].is_primary);
        assert_eq!(establishments.get(&id).unwrap().addresses.len(), 1);
        assert!(audit_log.has_event_type("establishment.address_added"));
    }

    #[tokio::test]
    async fn test_set_primary_demotes_previous() {
        let (_, _, use_case, id) = seeded();
        use_case
            .add(id.clone(), request("Calle Mayor 1", false), &RequestContext::new())
            .await
            .unwrap();
        let response = use_case
            .add(id.clone(), request("Gran Vía 2", false), &RequestContext::new())
            .await
            .unwrap();

        let second_id = response
            .addresses
            .iter()
            .find(|a| !a.is_primary)
            .map(|a| a.id.clone())
            .unwrap();
        let response = use_case
            .set_primary(
                id,
                AddressId(second_id.parse().unwrap()),
                &RequestContext::new(),
            )
            .await
            .unwrap();

        let primary: Vec<_> = response.addresses.iter().filter(|a| a.is_primary).collect();
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].id, second_id);
    }

    #[tokio::test]
    async fn test_remove_primary_promotes_remaining() {
        let (establishments, _, use_case, id) = seeded();
        let first = use_case
            .add(id.clone(), request("Calle Mayor 1", true), &RequestContext::new())
            .await
            .unwrap();
        use_case
            .add(id.clone(), request("Gran Vía 2", false), &RequestContext::new())
            .await
            .unwrap();

        let primary_id = first.addresses[0].id.clone();
        let response = use_case
            .remove(
                id.clone(),
                AddressId(primary_id.parse().unwrap()),
                &RequestContext::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.addresses.len(), 1);
        assert!(response.addresses[0].is_primary);
        assert_eq!(establishments.get(&id).unwrap().addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_address_is_a_conflict() {
        let (_, audit_log, use_case, id) = seeded();
        use_case
            .add(id.clone(), request("Calle Mayor 1", false), &RequestContext::new())
            .await
            .unwrap();

        let result = use_case
            .add(id, request("Calle Mayor 1", false), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::DuplicateEntry { .. })
        ));
        assert_eq!(audit_log.count_event_type("establishment.address_added"), 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_address_fails() {
        let (_, _, use_case, id) = seeded();

        let result = use_case
            .remove(id, AddressId::new(), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::AddressNotFound { .. })
        ));
    }
}
