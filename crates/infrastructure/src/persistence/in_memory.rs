//! In-Memory Repositories
//!
//! Adaptadores en memoria para el modo desarrollo sin base de datos. Replican
//! la semántica de los repositorios PostgreSQL: mismos filtros, misma
//! ordenación y misma paginación.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use denda_domain::audit::{AuditLog, AuditQuery, AuditQueryResult, AuditRepository};
use denda_domain::employees::{Employee, EmployeeFilter, EmployeeRepository};
use denda_domain::establishments::{Establishment, EstablishmentFilter, EstablishmentRepository};
use denda_domain::iam::{UserAccount, UserAccountRepository};
use denda_domain::shared_kernel::{EmployeeId, EstablishmentId, Result, UserId};
use denda_domain::values::EmailAddress;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Repositorio en memoria de establecimientos
#[derive(Clone, Default)]
pub struct InMemoryEstablishmentRepository {
    items: Arc<RwLock<HashMap<EstablishmentId, Establishment>>>,
}

impl InMemoryEstablishmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EstablishmentRepository for InMemoryEstablishmentRepository {
    async fn save(&self, establishment: &Establishment) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(establishment.id.clone(), establishment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        establishment_id: &EstablishmentId,
    ) -> Result<Option<Establishment>> {
        let items = self.items.read().await;
        Ok(items.get(establishment_id).cloned())
    }

    async fn find_all(&self, filter: &EstablishmentFilter) -> Result<Vec<Establishment>> {
        let items = self.items.read().await;
        let mut matching: Vec<Establishment> = items
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn count(&self, filter: &EstablishmentFilter) -> Result<usize> {
        let items = self.items.read().await;
        Ok(items.values().filter(|e| filter.matches(e)).count())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .any(|e| e.name.as_str().eq_ignore_ascii_case(name)))
    }

    async fn delete(&self, establishment_id: &EstablishmentId) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(establishment_id);
        Ok(())
    }
}

/// Repositorio en memoria de empleados
#[derive(Clone, Default)]
pub struct InMemoryEmployeeRepository {
    items: Arc<RwLock<HashMap<EmployeeId, Employee>>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn save(&self, employee: &Employee) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(employee.id.clone(), employee.clone());
        Ok(())
    }

    async fn find_by_id(&self, employee_id: &EmployeeId) -> Result<Option<Employee>> {
        let items = self.items.read().await;
        Ok(items.get(employee_id).cloned())
    }

    async fn find_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<Vec<Employee>> {
        let items = self.items.read().await;
        let mut matching: Vec<Employee> = items
            .values()
            .filter(|e| &e.establishment_id == establishment_id && filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.hired_at.cmp(&b.hired_at));
        Ok(matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn count_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<usize> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|e| &e.establishment_id == establishment_id && filter.matches(e))
            .count())
    }

    async fn count_non_terminated(&self, establishment_id: &EstablishmentId) -> Result<usize> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|e| &e.establishment_id == establishment_id && !e.status.is_terminal())
            .count())
    }

    async fn exists_by_email_in_establishment(
        &self,
        establishment_id: &EstablishmentId,
        email: &EmailAddress,
    ) -> Result<bool> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .any(|e| &e.establishment_id == establishment_id && &e.email == email))
    }

    async fn delete(&self, employee_id: &EmployeeId) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(employee_id);
        Ok(())
    }
}

/// Repositorio en memoria de cuentas de usuario
#[derive(Clone, Default)]
pub struct InMemoryUserAccountRepository {
    items: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccountRepository {
    async fn save(&self, account: &UserAccount) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>> {
        let items = self.items.read().await;
        Ok(items.get(user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .find(|a| a.username.as_str() == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserAccount>> {
        let items = self.items.read().await;
        let mut accounts: Vec<UserAccount> = items.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn count(&self) -> Result<usize> {
        let items = self.items.read().await;
        Ok(items.len())
    }

    async fn delete(&self, user_id: &UserId) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(user_id);
        Ok(())
    }
}

/// Repositorio en memoria del registro de auditoría
#[derive(Clone, Default)]
pub struct InMemoryAuditLogRepository {
    entries: Arc<RwLock<Vec<AuditLog>>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditLogRepository {
    async fn save(&self, log: &AuditLog) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(log.clone());
        Ok(())
    }

    async fn query(&self, query: AuditQuery) -> Result<AuditQueryResult> {
        let entries = self.entries.read().await;
        let mut matching: Vec<AuditLog> = entries
            .iter()
            .filter(|log| query.matches(log))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

        let total_count = matching.len() as i64;
        let logs: Vec<AuditLog> = matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect();
        let has_more = (query.offset + logs.len() as i64) < total_count;

        Ok(AuditQueryResult {
            logs,
            total_count,
            has_more,
        })
    }

    async fn find_by_entity(
        &self,
        entity: &str,
        entity_id: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>> {
        let entries = self.entries.read().await;
        let mut matching: Vec<AuditLog> = entries
            .iter()
            .filter(|log| log.entity == entity && log.entity_id == entity_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(matching.into_iter().take(limit.max(0) as usize).collect())
    }

    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let initial = entries.len();
        entries.retain(|log| log.occurred_at >= before);
        Ok((initial - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denda_domain::employees::Position;
    use denda_domain::establishments::EstablishmentName;
    use denda_domain::iam::{Role, Username};
    use denda_domain::shared_kernel::EmployeeStatus;
    use denda_domain::values::PersonName;
    use serde_json::json;

    fn establishment(name: &str) -> Establishment {
        Establishment::new(EstablishmentName::new(name).unwrap(), None).unwrap()
    }

    fn employee(establishment_id: &EstablishmentId, email: &str) -> Employee {
        Employee::new(
            establishment_id.clone(),
            PersonName::new("Miren", "Etxeberria").unwrap(),
            EmailAddress::new(email).unwrap(),
            None,
            Position::new("Dependienta").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_establishment_roundtrip_and_delete() {
        let repo = InMemoryEstablishmentRepository::new();
        let establishment = establishment("Denda Berria");

        repo.save(&establishment).await.unwrap();
        let found = repo.find_by_id(&establishment.id).await.unwrap();
        assert_eq!(found.as_ref().map(|e| e.name.as_str()), Some("Denda Berria"));
        assert!(repo.exists_by_name("denda berria").await.unwrap());

        repo.delete(&establishment.id).await.unwrap();
        assert!(repo.find_by_id(&establishment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_establishment_filter_and_pagination() {
        let repo = InMemoryEstablishmentRepository::new();
        for name in ["Denda Bat", "Denda Bi", "Taberna Zaharra"] {
            repo.save(&establishment(name)).await.unwrap();
        }

        let filter = EstablishmentFilter::new().with_name_contains("denda");
        assert_eq!(repo.count(&filter).await.unwrap(), 2);

        let page = repo
            .find_all(&EstablishmentFilter::new().with_pagination(2, 1))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_employee_status_filter_and_non_terminated_count() {
        let repo = InMemoryEmployeeRepository::new();
        let establishment_id = EstablishmentId::new();

        let active = employee(&establishment_id, "a@example.com");
        let mut terminated = employee(&establishment_id, "b@example.com");
        terminated.terminate().unwrap();
        repo.save(&active).await.unwrap();
        repo.save(&terminated).await.unwrap();

        let filter = EmployeeFilter::new().with_status(EmployeeStatus::Terminated);
        let found = repo
            .find_by_establishment(&establishment_id, &filter)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(repo.count_non_terminated(&establishment_id).await.unwrap(), 1);

        let other = EstablishmentId::new();
        assert_eq!(repo.count_non_terminated(&other).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_user_account_find_by_username() {
        let repo = InMemoryUserAccountRepository::new();
        let account = UserAccount::new(
            Username::new("miren").unwrap(),
            EmailAddress::new("miren@example.com").unwrap(),
            "hash",
            Role::Manager,
        )
        .unwrap();

        repo.save(&account).await.unwrap();
        assert!(repo.find_by_username("miren").await.unwrap().is_some());
        assert!(repo.find_by_username("beste").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_audit_query_pagination_and_retention() {
        let repo = InMemoryAuditLogRepository::new();
        for i in 0..5 {
            let log = AuditLog::new(
                "establishment.created",
                "establishment",
                format!("e-{}", i),
                json!({}),
            );
            repo.save(&log).await.unwrap();
        }

        let result = repo
            .query(AuditQuery::new().with_limit(2).with_offset(0))
            .await
            .unwrap();
        assert_eq!(result.logs.len(), 2);
        assert_eq!(result.total_count, 5);
        assert!(result.has_more);

        let removed = repo
            .delete_before(Utc::now() + chrono::Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(removed, 5);
    }
}
