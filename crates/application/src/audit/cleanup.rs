//! Audit Cleanup Service
//!
//! Aplica la política de retención del rastro de auditoría.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use denda_domain::audit::AuditRepository;
use tracing::{info, warn};

/// Configuration for audit log retention
#[derive(Debug, Clone)]
pub struct AuditRetentionConfig {
    /// Number of days to retain audit logs (default: 90)
    pub retention_days: u32,
    /// Interval between cleanup runs (default: 24 hours)
    pub cleanup_interval: Duration,
    /// Whether cleanup is enabled
    pub enabled: bool,
}

impl Default for AuditRetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: 90,
            cleanup_interval: Duration::from_secs(24 * 60 * 60),
            enabled: true,
        }
    }
}

impl AuditRetentionConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let retention_days = std::env::var("DENDA_AUDIT_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(90);

        let cleanup_interval_hours = std::env::var("DENDA_AUDIT_CLEANUP_INTERVAL_HOURS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(24);

        let enabled = std::env::var("DENDA_AUDIT_CLEANUP_ENABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(true);

        Self {
            retention_days,
            cleanup_interval: Duration::from_secs(cleanup_interval_hours * 60 * 60),
            enabled,
        }
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Result of a cleanup operation
#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub deleted_count: u64,
    pub cutoff_date: DateTime<Utc>,
    pub performed_at: DateTime<Utc>,
}

/// Service for managing audit log retention and cleanup
pub struct AuditCleanupService {
    audit_logs: Arc<dyn AuditRepository>,
    config: AuditRetentionConfig,
}

impl AuditCleanupService {
    pub fn new(audit_logs: Arc<dyn AuditRepository>, config: AuditRetentionConfig) -> Self {
        Self { audit_logs, config }
    }

    pub fn config(&self) -> &AuditRetentionConfig {
        &self.config
    }

    /// Calculate the cutoff date based on retention policy
    pub fn calculate_cutoff_date(&self) -> DateTime<Utc> {
        Utc::now() - chrono::Duration::days(self.config.retention_days as i64)
    }

    /// Run cleanup once, deleting logs older than the retention period
    pub async fn run_cleanup(&self) -> anyhow::Result<CleanupResult> {
        if !self.config.enabled {
            return Ok(CleanupResult {
                deleted_count: 0,
                cutoff_date: self.calculate_cutoff_date(),
                performed_at: Utc::now(),
            });
        }

        let cutoff_date = self.calculate_cutoff_date();
        let performed_at = Utc::now();

        info!(
            cutoff = %cutoff_date.format("%Y-%m-%d %H:%M:%S UTC"),
            retention_days = self.config.retention_days,
            "Running audit log cleanup"
        );

        let deleted_count = self.audit_logs.delete_before(cutoff_date).await?;

        if deleted_count > 0 {
            info!(deleted = deleted_count, "Audit cleanup completed");
        } else {
            info!("Audit cleanup completed: no logs to delete");
        }

        Ok(CleanupResult {
            deleted_count,
            cutoff_date,
            performed_at,
        })
    }

    /// Start the background cleanup loop at the configured interval
    pub fn start_background_cleanup(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let service = self.clone();

        tokio::spawn(async move {
            if !service.config.enabled {
                warn!("Audit cleanup is disabled. Background task will not run.");
                return;
            }

            info!(
                interval = ?service.config.cleanup_interval,
                retention_days = service.config.retention_days,
                "Starting audit cleanup background task"
            );

            if let Err(e) = service.run_cleanup().await {
                warn!("Initial audit cleanup failed: {}", e);
            }

            let mut interval = tokio::time::interval(service.config.cleanup_interval);
            // El primer tick es inmediato y la limpieza inicial ya se ejecutó
            interval.tick().await;

            loop {
                interval.tick().await;

                if let Err(e) = service.run_cleanup().await {
                    warn!("Scheduled audit cleanup failed: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use denda_domain::audit::{AuditLog, AuditQuery, AuditQueryResult};
    use denda_domain::shared_kernel::Result;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockAuditRepository {
        logs: Mutex<Vec<AuditLog>>,
    }

    impl MockAuditRepository {
        fn with_logs(logs: Vec<AuditLog>) -> Self {
            Self {
                logs: Mutex::new(logs),
            }
        }
    }

    #[async_trait::async_trait]
    impl AuditRepository for MockAuditRepository {
        async fn save(&self, log: &AuditLog) -> Result<()> {
            self.logs.lock().unwrap().push(log.clone());
            Ok(())
        }

        async fn query(&self, _query: AuditQuery) -> Result<AuditQueryResult> {
            Ok(AuditQueryResult {
                logs: vec![],
                total_count: 0,
                has_more: false,
            })
        }

        async fn find_by_entity(
            &self,
            _entity: &str,
            _entity_id: &str,
            _limit: i64,
        ) -> Result<Vec<AuditLog>> {
            Ok(vec![])
        }

        async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64> {
            let mut logs = self.logs.lock().unwrap();
            let original_len = logs.len();
            logs.retain(|l| l.occurred_at >= before);
            Ok((original_len - logs.len()) as u64)
        }
    }

    fn create_test_log(days_ago: i64) -> AuditLog {
        let mut log = AuditLog::new("establishment.created", "establishment", "e-1", json!({}));
        log.occurred_at = Utc::now() - ChronoDuration::days(days_ago);
        log
    }

    #[test]
    fn test_config_default() {
        let config = AuditRetentionConfig::default();
        assert_eq!(config.retention_days, 90);
        assert_eq!(config.cleanup_interval, Duration::from_secs(24 * 60 * 60));
        assert!(config.enabled);
    }

    #[test]
    fn test_config_builder() {
        let config = AuditRetentionConfig::default()
            .with_retention_days(30)
            .with_cleanup_interval(Duration::from_secs(3600))
            .with_enabled(false);

        assert_eq!(config.retention_days, 30);
        assert_eq!(config.cleanup_interval, Duration::from_secs(3600));
        assert!(!config.enabled);
    }

    #[test]
    fn test_calculate_cutoff_date() {
        let config = AuditRetentionConfig::default().with_retention_days(30);
        let repo = Arc::new(MockAuditRepository::with_logs(vec![]));
        let service = AuditCleanupService::new(repo, config);

        let cutoff = service.calculate_cutoff_date();
        let expected = Utc::now() - ChronoDuration::days(30);

        assert!((cutoff - expected).num_seconds().abs() < 1);
    }

    #[tokio::test]
    async fn test_run_cleanup_deletes_old_logs() {
        let logs = vec![
            create_test_log(100),
            create_test_log(95),
            create_test_log(50),
            create_test_log(10),
        ];
        let repo = Arc::new(MockAuditRepository::with_logs(logs));
        let config = AuditRetentionConfig::default().with_retention_days(90);
        let service = AuditCleanupService::new(repo.clone(), config);

        let result = service.run_cleanup().await.unwrap();

        assert_eq!(result.deleted_count, 2);
        assert_eq!(repo.logs.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_cleanup_disabled() {
        let logs = vec![create_test_log(100)];
        let repo = Arc::new(MockAuditRepository::with_logs(logs));
        let config = AuditRetentionConfig::default().with_enabled(false);
        let service = AuditCleanupService::new(repo.clone(), config);

        let result = service.run_cleanup().await.unwrap();

        assert_eq!(result.deleted_count, 0);
        assert_eq!(repo.logs.lock().unwrap().len(), 1);
    }
}
