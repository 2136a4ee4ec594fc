// Establishment Use Cases
// UC: alta de un establecimiento

use crate::audit::RecordAuditUseCase;
use crate::establishments::EstablishmentResponse;
use denda_domain::audit::AuditLog;
use denda_domain::establishments::{Establishment, EstablishmentName, EstablishmentRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEstablishmentRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Use Case: registrar un establecimiento nuevo
///
/// El nombre comercial es único en todo el sistema; los duplicados se
/// rechazan antes de construir el agregado.
pub struct CreateEstablishmentUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    audit: RecordAuditUseCase,
}

impl CreateEstablishmentUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>, audit: RecordAuditUseCase) -> Self {
        Self {
            establishments,
            audit,
        }
    }

    pub async fn execute(
        &self,
        request: CreateEstablishmentRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Validar el nombre comercial
        let name = EstablishmentName::new(request.name)?;

        // 2. Rechazar nombres ya registrados
        if self.establishments.exists_by_name(name.as_str()).await? {
            return Err(DomainError::DuplicateEntry {
                entity: "establishment".to_string(),
                value: name.as_str().to_string(),
            }
            .into());
        }

        // 3. Construir y persistir el agregado
        let establishment = Establishment::new(name, request.description)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment.id,
            name = %establishment.name,
            "Establishment created"
        );

        // 4. Registrar auditoría
        self.audit
            .execute(
                AuditLog::new(
                    "establishment.created",
                    "establishment",
                    establishment.id.to_string(),
                    json!({ "name": establishment.name.as_str() }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CapturingAuditRepository, MemoryEstablishmentRepository};

    fn use_case(
        establishments: Arc<MemoryEstablishmentRepository>,
        audit_log: Arc<CapturingAuditRepository>,
    ) -> CreateEstablishmentUseCase {
        CreateEstablishmentUseCase::new(establishments, RecordAuditUseCase::new(audit_log))
    }

    #[tokio::test]
    async fn test_create_establishment_persists_and_audits() {
        let establishments = Arc::new(MemoryEstablishmentRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(establishments.clone(), audit_log.clone());

        let response = use_case
            .execute(
                CreateEstablishmentRequest {
                    name: "Denda Berria".to_string(),
                    description: Some("Tienda del casco viejo".to_string()),
                },
                &RequestContext::new().actor("admin"),
            )
            .await
            .unwrap();

        assert_eq!(response.name, "Denda Berria");
        assert_eq!(response.status, "ACTIVE");
        assert_eq!(establishments.len(), 1);
        assert!(audit_log.has_event_type("establishment.created"));
        let entry = &audit_log.entries()[0];
        assert_eq!(entry.actor.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_create_establishment_rejects_duplicate_name() {
        let existing = Establishment::new(
            EstablishmentName::new("Denda Berria").unwrap(),
            None,
        )
        .unwrap();
        let establishments = Arc::new(MemoryEstablishmentRepository::with_establishment(existing));
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(establishments.clone(), audit_log.clone());

        let result = use_case
            .execute(
                CreateEstablishmentRequest {
                    name: "denda berria".to_string(),
                    description: None,
                },
                &RequestContext::new(),
            )
            .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::DuplicateEntry { .. })
        ));
        assert_eq!(establishments.len(), 1);
        assert!(audit_log.is_empty());
    }

    #[tokio::test]
    async fn test_create_establishment_rejects_short_name() {
        let establishments = Arc::new(MemoryEstablishmentRepository::new());
        let audit_log = Arc::new(CapturingAuditRepository::new());
        let use_case = use_case(establishments.clone(), audit_log.clone());

        let result = use_case
            .execute(
                CreateEstablishmentRequest {
                    name: "x".to_string(),
                    description: None,
                },
                &RequestContext::new(),
            )
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::ValidationError { .. })
        ));
        assert!(establishments.is_empty());
    }
}
