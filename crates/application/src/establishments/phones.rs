// Establishment Use Cases
// UC: gestión de teléfonos del establecimiento

use crate::audit::RecordAuditUseCase;
use crate::establishments::EstablishmentResponse;
use denda_domain::audit::AuditLog;
use denda_domain::establishments::{Establishment, EstablishmentRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EstablishmentId, PhoneId};
use denda_domain::values::PhoneNumber;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPhoneRequest {
    pub country_code: String,
    pub number: String,
    pub label: Option<String>,
}

pub struct ManagePhonesUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    audit: RecordAuditUseCase,
}

impl ManagePhonesUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>, audit: RecordAuditUseCase) -> Self {
        Self {
            establishments,
            audit,
        }
    }

    pub async fn add(
        &self,
        establishment_id: EstablishmentId,
        request: AddPhoneRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Cargar el agregado y validar el teléfono
        let mut establishment = self.load(&establishment_id).await?;
        let phone = PhoneNumber::new(request.country_code, request.number)?;
        let formatted = phone.formatted();

        // 2. Registrar el teléfono; los números repetidos se rechazan
        let phone_id = establishment.add_phone(phone, request.label)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            phone_id = %phone_id,
            "Phone added"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.phone_added",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "phone_id": phone_id.to_string(), "phone": formatted }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    pub async fn remove(
        &self,
        establishment_id: EstablishmentId,
        phone_id: PhoneId,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        let mut establishment = self.load(&establishment_id).await?;
        establishment.remove_phone(&phone_id)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            phone_id = %phone_id,
            "Phone removed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.phone_removed",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "phone_id": phone_id.to_string() }),
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

    fn seeded() -> (
        Arc<MemoryEstablishmentRepository>,
        Arc<CapturingAuditRepository>,
        ManagePhonesUseCase,
        EstablishmentId,
    ) {
        let establishment =
            Establishment::new(EstablishmentName::new("Denda Berria").unwrap(), None).unwrap();
        let id = establishment.id.clone();
        let establishments = Arc::new(MemoryEstablishmentRepository::with_establishment(
            establishment,
        ));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = ManagePhonesUseCase::new(
            establishments.clone(),
            RecordAuditUseCase::new(audit_log.clone()),
        );
        (establishments, audit_log, use_case, id)
    }

    fn request(country_code: &str, number: &str) -> AddPhoneRequest {
        AddPhoneRequest {
            country_code: country_code.to_string(),
            number: number.to_string(),
            label: Some("Mostrador".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_phone_persists_and_audits() {
        let (establishments, audit_log, use_case, id) = seeded();

        let response = use_case
            .add(id.clone(), request("+34", "912 345 678"), &RequestContext::new())
            .await
            .unwrap();

        assert_eq!(response.phones.len(), 1);
        assert_eq!(response.phones[0].formatted, "+34 912345678");
        assert_eq!(establishments.get(&id).unwrap().phones.len(), 1);
        assert!(audit_log.has_event_type("establishment.phone_added"));
    }

    #[tokio::test]
    async fn test_same_number_with_different_separators_is_a_conflict() {
        let (_, _, use_case, id) = seeded();
        use_case
            .add(id.clone(), request("+34", "912 345 678"), &RequestContext::new())
            .await
            .unwrap();

        let result = use_case
            .add(id, request("34", "912-345-678"), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::DuplicateEntry { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_phone() {
        let (establishments, audit_log, use_case, id) = seeded();
        let response = use_case
            .add(id.clone(), request("+34", "912 345 678"), &RequestContext::new())
            .await
            .unwrap();

        let phone_id = PhoneId(response.phones[0].id.parse().unwrap());
        let response = use_case
            .remove(id.clone(), phone_id, &RequestContext::new())
            .await
            .unwrap();

        assert!(response.phones.is_empty());
        assert!(establishments.get(&id).unwrap().phones.is_empty());
        assert!(audit_log.has_event_type("establishment.phone_removed"));
    }

    #[tokio::test]
    async fn test_remove_unknown_phone_fails() {
        let (_, _, use_case, id) = seeded();

        let result = use_case
            .remove(id, PhoneId::new(), &RequestContext::new())
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::PhoneNotFound { .. })
        ));
    }
}
