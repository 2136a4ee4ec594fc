//! Health Check Domain Types and Service
//!
//! Core health check types and service shared by the HTTP probes and the
//! infrastructure adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Health check error types
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum HealthCheckError {
    #[error("Database connection failed: {message}")]
    DatabaseError { message: String },

    #[error("Health check timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Component not initialized: {component}")]
    NotInitialized { component: String },
}

/// Overall health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            details: None,
            error: None,
            checked_at: Utc::now(),
        }
    }

    pub fn unhealthy(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            details: None,
            error: Some(error.into()),
            checked_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Liveness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentHealth>>,
    pub check_duration_ms: u64,
}

/// Trait for checking component health
#[async_trait]
pub trait HealthChecker: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self) -> Result<ComponentHealth, HealthCheckError>;
}

/// Aggregates component checks for the HTTP probes.
///
/// Liveness only reports that the process responds; readiness requires
/// every registered component to be healthy.
#[derive(Clone)]
pub struct HealthCheckService {
    checkers: Vec<Arc<dyn HealthChecker>>,
    process_start: DateTime<Utc>,
    version: String,
}

impl HealthCheckService {
    pub fn new(checkers: Vec<Arc<dyn HealthChecker>>, version: impl Into<String>) -> Self {
        Self {
            checkers,
            process_start: Utc::now(),
            version: version.into(),
        }
    }

    pub fn register_checker(&mut self, checker: Arc<dyn HealthChecker>) {
        self.checkers.push(checker);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn uptime(&self) -> u64 {
        let duration = Utc::now().signed_duration_since(self.process_start);
        duration.to_std().unwrap_or_default().as_secs()
    }

    pub async fn check_liveness(&self) -> LivenessResponse {
        LivenessResponse {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime(),
        }
    }

    pub async fn check_readiness(&self) -> ReadinessResponse {
        let start = Utc::now();
        let mut overall_status = HealthStatus::Healthy;
        let mut components = Vec::new();

        for checker in &self.checkers {
            match checker.check().await {
                Ok(component) => {
                    if !component.status.is_healthy() && overall_status == HealthStatus::Healthy {
                        overall_status = component.status.clone();
                    }
                    components.push(component);
                }
                Err(e) => {
                    overall_status = HealthStatus::Unhealthy;
                    components.push(ComponentHealth::unhealthy(checker.name(), e.to_string()));
                }
            }
        }

        let duration = Utc::now().signed_duration_since(start);
        let check_duration_ms = duration.to_std().unwrap_or_default().as_millis() as u64;

        ReadinessResponse {
            ready: overall_status.is_healthy(),
            status: overall_status,
            timestamp: Utc::now(),
            components: Some(components),
            check_duration_ms,
        }
    }
}
