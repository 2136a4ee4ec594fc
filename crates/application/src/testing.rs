//! Testing Support - Dobles en memoria para los tests de casos de uso
//!
//! Proporciona repositorios en memoria que implementan los puertos del
//! dominio, compartidos por los tests de los distintos use cases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use denda_domain::audit::{AuditLog, AuditQuery, AuditQueryResult, AuditRepository};
use denda_domain::employees::{Employee, EmployeeFilter, EmployeeRepository};
use denda_domain::establishments::{Establishment, EstablishmentFilter, EstablishmentRepository};
use denda_domain::iam::{UserAccount, UserAccountRepository};
use denda_domain::shared_kernel::{EmployeeId, EstablishmentId, Result, UserId};
use denda_domain::values::EmailAddress;
use std::collections::HashMap;
use std::sync::Mutex;

/// Repositorio de establecimientos en memoria
#[derive(Default)]
pub struct MemoryEstablishmentRepository {
    items: Mutex<HashMap<EstablishmentId, Establishment>>,
}

impl MemoryEstablishmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea el repositorio con un establecimiento ya persistido
    pub fn with_establishment(establishment: Establishment) -> Self {
        let repo = Self::new();
        repo.items
            .lock()
            .unwrap()
            .insert(establishment.id.clone(), establishment);
        repo
    }

    pub fn get(&self, establishment_id: &EstablishmentId) -> Option<Establishment> {
        self.items.lock().unwrap().get(establishment_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EstablishmentRepository for MemoryEstablishmentRepository {
    async fn save(&self, establishment: &Establishment) -> Result<()> {
        self.items
            .lock()
            .unwrap()
            .insert(establishment.id.clone(), establishment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        establishment_id: &EstablishmentId,
    ) -> Result<Option<Establishment>> {
        Ok(self.items.lock().unwrap().get(establishment_id).cloned())
    }

    async fn find_all(&self, filter: &EstablishmentFilter) -> Result<Vec<Establishment>> {
        let items = self.items.lock().unwrap();
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
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|e| filter.matches(e))
            .count())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .any(|e| e.name.as_str().eq_ignore_ascii_case(name)))
    }

    async fn delete(&self, establishment_id: &EstablishmentId) -> Result<()> {
        self.items.lock().unwrap().remove(establishment_id);
        Ok(())
    }
}

/// Repositorio de empleados en memoria
#[derive(Default)]
pub struct MemoryEmployeeRepository {
    items: Mutex<HashMap<EmployeeId, Employee>>,
}

impl MemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employee(employee: Employee) -> Self {
        let repo = Self::new();
        repo.items
            .lock()
            .unwrap()
            .insert(employee.id.clone(), employee);
        repo
    }

    pub fn get(&self, employee_id: &EmployeeId) -> Option<Employee> {
        self.items.lock().unwrap().get(employee_id).cloned()
    }

    pub fn insert(&self, employee: Employee) {
        self.items
            .lock()
            .unwrap()
            .insert(employee.id.clone(), employee);
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn save(&self, employee: &Employee) -> Result<()> {
        self.items
            .lock()
            .unwrap()
            .insert(employee.id.clone(), employee.clone());
        Ok(())
    }

    async fn find_by_id(&self, employee_id: &EmployeeId) -> Result<Option<Employee>> {
        Ok(self.items.lock().unwrap().get(employee_id).cloned())
    }

    async fn find_by_establishment(
        &self,
        establishment_id: &EstablishmentId,
        filter: &EmployeeFilter,
    ) -> Result<Vec<Employee>> {
        let items = self.items.lock().unwrap();
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
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|e| &e.establishment_id == establishment_id && filter.matches(e))
            .count())
    }

    async fn count_non_terminated(&self, establishment_id: &EstablishmentId) -> Result<usize> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|e| &e.establishment_id == establishment_id && !e.status.is_terminal())
            .count())
    }

    async fn exists_by_email_in_establishment(
        &self,
        establishment_id: &EstablishmentId,
        email: &EmailAddress,
    ) -> Result<bool> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .any(|e| &e.establishment_id == establishment_id && &e.email == email))
    }

    async fn delete(&self, employee_id: &EmployeeId) -> Result<()> {
        self.items.lock().unwrap().remove(employee_id);
        Ok(())
    }
}

/// Repositorio de cuentas de usuario en memoria
#[derive(Default)]
pub struct MemoryUserAccountRepository {
    items: Mutex<HashMap<UserId, UserAccount>>,
}

impl MemoryUserAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(account: UserAccount) -> Self {
        let repo = Self::new();
        repo.items.lock().unwrap().insert(account.id.clone(), account);
        repo
    }

    pub fn get(&self, user_id: &UserId) -> Option<UserAccount> {
        self.items.lock().unwrap().get(user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserAccountRepository for MemoryUserAccountRepository {
    async fn save(&self, account: &UserAccount) -> Result<()> {
        self.items
            .lock()
            .unwrap()
            .insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>> {
        Ok(self.items.lock().unwrap().get(user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .find(|a| a.username.as_str() == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserAccount>> {
        let items = self.items.lock().unwrap();
        let mut accounts: Vec<UserAccount> = items.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.items.lock().unwrap().len())
    }

    async fn delete(&self, user_id: &UserId) -> Result<()> {
        self.items.lock().unwrap().remove(user_id);
        Ok(())
    }
}

/// Repositorio de auditoría que captura las entradas escritas.
///
/// Permite a los tests verificar qué eventos registró un caso de uso.
#[derive(Default)]
pub struct CapturingAuditRepository {
    entries: Mutex<Vec<AuditLog>>,
}

impl CapturingAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditLog> {
        self.entries.lock().unwrap().clone()
    }

    pub fn has_event_type(&self, event_type: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.event_type == event_type)
    }

    pub fn count_event_type(&self, event_type: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditRepository for CapturingAuditRepository {
    async fn save(&self, log: &AuditLog) -> Result<()> {
        self.entries.lock().unwrap().push(log.clone());
        Ok(())
    }

    async fn query(&self, query: AuditQuery) -> Result<AuditQueryResult> {
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<AuditLog> =
            entries.iter().filter(|e| query.matches(e)).cloned().collect();
        matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        let total_count = matching.len() as i64;
        let logs: Vec<AuditLog> = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        let has_more = query.offset + (logs.len() as i64) < total_count;
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
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<AuditLog> = entries
            .iter()
            .filter(|e| e.entity == entity && e.entity_id == entity_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(matching.into_iter().take(limit as usize).collect())
    }

    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64> {
        let mut entries = self.entries.lock().unwrap();
        let initial = entries.len();
        entries.retain(|e| e.occurred_at >= before);
        Ok((initial - entries.len()) as u64)
    }
}
