// Establishment Use Cases
// UC: gestión de redes sociales del establecimiento

use crate::audit::RecordAuditUseCase;
use crate::establishments::EstablishmentResponse;
use denda_domain::audit::AuditLog;
use denda_domain::establishments::{Establishment, EstablishmentRepository};
use denda_domain::request_context::RequestContext;
use denda_domain::shared_kernel::{DomainError, EstablishmentId, SocialMediaId};
use denda_domain::values::{SocialMediaPlatform, WebUrl};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSocialMediaRequest {
    pub platform: String,
    pub url: String,
}

/// Use Case: gestionar los perfiles sociales de un establecimiento
///
/// Se admite como máximo un perfil por plataforma.
pub struct ManageSocialMediaUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
    audit: RecordAuditUseCase,
}

impl ManageSocialMediaUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>, audit: RecordAuditUseCase) -> Self {
        Self {
            establishments,
            audit,
        }
    }

    pub async fn add(
        &self,
        establishment_id: EstablishmentId,
        request: AddSocialMediaRequest,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        // 1. Cargar el agregado y validar plataforma y URL
        let mut establishment = self.load(&establishment_id).await?;
        let platform: SocialMediaPlatform = request.platform.parse()?;
        let url = WebUrl::new(request.url)?;
        let url_value = url.as_str().to_string();

        // 2. Registrar el perfil; cada plataforma admite uno solo
        let social_media_id = establishment.add_social_media(platform, url)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            social_media_id = %social_media_id,
            platform = %platform,
            "Social media link added"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.social_media_added",
                    "establishment",
                    establishment_id.to_string(),
                    json!({
                        "social_media_id": social_media_id.to_string(),
                        "platform": platform.to_string(),
                        "url": url_value,
                    }),
                )
                .with_context(ctx),
            )
            .await;

        Ok(EstablishmentResponse::from(&establishment))
    }

    pub async fn remove(
        &self,
        establishment_id: EstablishmentId,
        social_media_id: SocialMediaId,
        ctx: &RequestContext,
    ) -> anyhow::Result<EstablishmentResponse> {
        let mut establishment = self.load(&establishment_id).await?;
        establishment.remove_social_media(&social_media_id)?;
        self.establishments.save(&establishment).await?;

        tracing::info!(
            establishment_id = %establishment_id,
            social_media_id = %social_media_id,
            "Social media link removed"
        );

        self.audit
            .execute(
                AuditLog::new(
                    "establishment.social_media_removed",
                    "establishment",
                    establishment_id.to_string(),
                    json!({ "social_media_id": social_media_id.to_string() }),
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
