// Establishment Use Cases
// UC: actualización parcial de un establecimiento

use crate::audit::RecordAuditUseCase;
use crate::establishments::EstablishmentResponse;
use denda_domain::audit::AuditLog;
use denda_domain::establishments::{EstablishmentName, EstablishmentRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EstablishmentId, EstablishmentStatus};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Los campos ausentes se dejan tal cual; una descripción en blanco la borra.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEstablishmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

pub struct UpdateEstablishmentUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    audit: RecordAuditUseCase,
}

impl UpdateEstablishmentUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>, audit: RecordAuditUseCase) -> Self {
        Self {
            establishments,
            audit,
        }
    }

    pub async fn execute(
        &self,
        establishment_id: EstablishmentId,
        request: UpdateEstablishmentRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Cargar el agregado
        let mut establishment = self
            .establishments
            .find_by_id(&establishment_id)
            .await?
            .ok_or_else(|| DomainError::EstablishmentNotFound {
                establishment_id: establishment_id.clone(),
            })?;

        let mut changes = serde_json::Map::new();

        // 2. Renombrar, comprobando unicidad solo si el nombre cambia
        if let Some(raw_name) = request.name {
            let name = EstablishmentName::new(raw_name)?;
            if name != establishment.name {
                if self.establishments.exists_by_name(name.as_str()).await? {
                    return Err(DomainError::DuplicateEntry {
                        entity: "establishment".to_string(),
                        value: name.as_str().to_string(),
                    }
                    .into());
                }
                changes.insert("name".to_string(), json!(name.as_str()));
                establishment.rename(name)?;
            }
        }

        // 3. Reemplazar la descripción (en blanco la elimina)
        if let Some(description) = request.description {
            establishment.with_description(Some(description))?;
            changes.insert(
                "description".to_string(),
                json!(establishment.description.clone()),
            );
        }

        // 4. Aplicar la transición de estado solicitada
        if let Some(raw_status) = request.status {
            let status: EstablishmentStatus = raw_status
                .parse()
                .map_err(|e: String| DomainError::validation("status", e))?;
            match status {
                EstablishmentStatus::Active => establishment.activate()?,
                EstablishmentStatus::Inactive => establishment.deactivate()?,
            }
            changes.insert("status".to_string(), json!(status.to_string()));
        }

        // 5. Persistir y auditar solo si hubo cambios
        if !changes.is_empty() {
            self.establishments.save(&establishment).await?;

            tracing::info!(
                establishment_id = %establishment.id,
                "Establishment updated"
            );

            self.audit
                .execute(
                    AuditLog::new(
                        "establishment.updated",
                        "establishment",
                        establishment.id.to_string(),
                        serde_json::Value::Object(changes),
                    )
                    .with_context(ctx),
                )
                .await;
        }

        Ok(EstablishmentResponse::from(&establishment))
    }
}
