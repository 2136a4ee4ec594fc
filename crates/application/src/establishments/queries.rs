// Establishment Use Cases
// UC: consulta de establecimientos

use crate::establishments::EstablishmentResponse;
use denda_domain::establishments::{EstablishmentFilter, EstablishmentRepository};
use denda_domain::shared_kernel::{DomainError, EstablishmentId, EstablishmentStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct GetEstablishmentUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
}

impl GetEstablishmentUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>) -> Self {
        Self { establishments }
    }

    pub async fn execute(
        &self,
        establishment_id: EstablishmentId,
    ) -> anyhow::Result<EstablishmentResponse> {
        let establishment = self
            .establishments
            .find_by_id(&establishment_id)
            .await?
            .ok_or(DomainError::EstablishmentNotFound { establishment_id })?;

        Ok(EstablishmentResponse::from(&establishment))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEstablishmentsRequest {
    pub status: Option<String>,
    pub name_contains: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEstablishmentsResponse {
    pub establishments: Vec<EstablishmentResponse>,
    pub total_count: usize,
    pub limit: usize,
    pub offset: usize,
}

pub struct ListEstablishmentsUseCase {
    establishments: Arc<dyn EstablishmentRepository>,
}

impl ListEstablishmentsUseCase {
    pub fn new(establishments: Arc<dyn EstablishmentRepository>) -> Self {
        Self { establishments }
    }

    pub async fn execute(
        &self,
        request: ListEstablishmentsRequest,
    ) -> anyhow::Result<ListEstablishmentsResponse> {
        // 1. Construir el filtro a partir de la petición
        let mut filter = EstablishmentFilter::new().with_pagination(
            request.limit.unwrap_or(EstablishmentFilter::DEFAULT_LIMIT),
            request.offset.unwrap_or(0),
        );
        if let Some(raw_status) = request.status {
            let status: EstablishmentStatus = raw_status
                .parse()
                .map_err(|e: String| DomainError::validation("status", e))?;
            filter = filter.with_status(status);
        }
        if let Some(fragment) = request.name_contains {
            filter = filter.with_name_contains(fragment);
        }

        // 2. Recuperar la página y el total sin paginar
        let establishments = self.establishments.find_all(&filter).await?;
        let total_count = self.establishments.count(&filter).await?;

        Ok(ListEstablishmentsResponse {
            establishments: establishments.iter().map(EstablishmentResponse::from).collect(),
            total_count,
            limit: filter.limit,
            offset: filter.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryEstablishmentRepository;
    use denda_domain::establishments::{Establishment, EstablishmentName};

    async fn seeded_repository() -> Arc<MemoryEstablishmentRepository> {
        let repo = Arc::new(MemoryEstablishmentRepository::new());
        for name in ["Denda Bat", "Denda Bi", "Taberna Hiru"] {
            let establishment =
                Establishment::new(EstablishmentName::new(name).unwrap(), None).unwrap();
            repo.save(&establishment).await.unwrap();
        }
        let mut inactive =
            Establishment::new(EstablishmentName::new("Denda Itxita").unwrap(), None).unwrap();
        inactive.deactivate().unwrap();
        repo.save(&inactive).await.unwrap();
        repo
    }

    use denda_domain::establishments::EstablishmentRepository;

    #[tokio::test]
    async fn test_get_establishment_by_id() {
        let establishment =
            Establishment::new(EstablishmentName::new("Denda Berria").unwrap(), None).unwrap();
        let id = establishment.id.clone();
        let repo = Arc::new(MemoryEstablishmentRepository::with_establishment(establishment));
        let use_case = GetEstablishmentUseCase::new(repo);

        let response = use_case.execute(id.clone()).await.unwrap();

        assert_eq!(response.id, id.to_string());
        assert_eq!(response.name, "Denda Berria");
    }

    #[tokio::test]
    async fn test_get_unknown_establishment_fails() {
        let repo = Arc::new(MemoryEstablishmentRepository::new());
        let use_case = GetEstablishmentUseCase::new(repo);

        let result = use_case.execute(EstablishmentId::new()).await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::EstablishmentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_name() {
        let repo = seeded_repository().await;
        let use_case = ListEstablishmentsUseCase::new(repo);

        let response = use_case
            .execute(ListEstablishmentsRequest {
                status: Some("ACTIVE".to_string()),
                name_contains: Some("denda".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.total_count, 2);
        assert!(response
            .establishments
            .iter()
            .all(|e| e.name.to_lowercase().contains("denda")));
    }

    #[tokio::test]
    async fn test_list_paginates_and_reports_total() {
        let repo = seeded_repository().await;
        let use_case = ListEstablishmentsUseCase::new(repo);

        let response = use_case
            .execute(ListEstablishmentsRequest {
                limit: Some(2),
                offset: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.establishments.len(), 2);
        assert_eq!(response.total_count, 4);
        assert_eq!(response.limit, 2);
        assert_eq!(response.offset, 2);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status() {
        let repo = Arc::new(MemoryEstablishmentRepository::new());
        let use_case = ListEstablishmentsUseCase::new(repo);

        let result = use_case
            .execute(ListEstablishmentsRequest {
                status: Some("CLOSED".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::ValidationError { .. })
        ));
    }
}
