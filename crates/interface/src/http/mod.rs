//! API REST con Axum
//!
//! Rutas versionadas bajo `/api/v1`, sondas de salud y exposición de
//! métricas. Todas las respuestas van envueltas en `ApiResponse`.

pub mod audit;
pub mod employees;
pub mod establishments;
pub mod health;
pub mod metrics;
pub mod users;

use crate::auth::jwt::JwtConfig;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use denda_application::{
    ChangeEmployeeStatusUseCase, ChangeUserRoleUseCase, CreateEstablishmentUseCase,
    DeactivateUserUseCase, DeleteEstablishmentUseCase, GetEmployeeUseCase, GetEstablishmentUseCase,
    HireEmployeeUseCase, ListEmployeesUseCase, ListEstablishmentsUseCase, ListUsersUseCase,
    LoginUseCase, ManageAddressesUseCase, ManageContactsUseCase, ManagePhonesUseCase,
    ManageSocialMediaUseCase, QueryAuditLogsUseCase, RegisterUserUseCase,
    UpdateEmployeeUseCase, UpdateEstablishmentUseCase,
};
use denda_domain::health::HealthCheckService;
use denda_domain::shared_kernel::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Envoltorio uniforme de las respuestas de la API
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error HTTP con el código ya resuelto; se serializa como envoltorio
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    fn from_domain(error: &DomainError) -> Self {
        let status = match error {
            DomainError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            DomainError::EstablishmentNotFound { .. }
            | DomainError::EmployeeNotFound { .. }
            | DomainError::UserNotFound { .. }
            | DomainError::AddressNotFound { .. }
            | DomainError::PhoneNotFound { .. }
            | DomainError::SocialMediaNotFound { .. }
            | DomainError::ContactNotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::DuplicateEntry { .. }
            | DomainError::EstablishmentHasEmployees { .. }
            | DomainError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            DomainError::Unauthorized { .. } | DomainError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            DomainError::InfrastructureError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Los detalles de infraestructura no salen por la API
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %error, "Request failed with infrastructure error");
            return Self::new(status, "internal error");
        }

        Self::new(status, error.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::from_domain(&error)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast_ref::<DomainError>() {
            Some(domain) => Self::from_domain(domain),
            None => {
                tracing::error!(error = %error, "Unhandled error in request handler");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<serde_json::Value>::error(self.message));
        (self.status, body).into_response()
    }
}

/// Estado de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub create_establishment_usecase: Arc<CreateEstablishmentUseCase>,
    pub update_establishment_usecase: Arc<UpdateEstablishmentUseCase>,
    pub delete_establishment_usecase: Arc<DeleteEstablishmentUseCase>,
    pub get_establishment_usecase: Arc<GetEstablishmentUseCase>,
    pub list_establishments_usecase: Arc<ListEstablishmentsUseCase>,
    pub addresses_usecase: Arc<ManageAddressesUseCase>,
    pub phones_usecase: Arc<ManagePhonesUseCase>,
    pub social_media_usecase: Arc<ManageSocialMediaUseCase>,
    pub contacts_usecase: Arc<ManageContactsUseCase>,
    pub hire_employee_usecase: Arc<HireEmployeeUseCase>,
    pub update_employee_usecase: Arc<UpdateEmployeeUseCase>,
    pub change_employee_status_usecase: Arc<ChangeEmployeeStatusUseCase>,
    pub get_employee_usecase: Arc<GetEmployeeUseCase>,
    pub list_employees_usecase: Arc<ListEmployeesUseCase>,
    pub login_usecase: Arc<LoginUseCase>,
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    pub change_user_role_usecase: Arc<ChangeUserRoleUseCase>,
    pub deactivate_user_usecase: Arc<DeactivateUserUseCase>,
    pub list_users_usecase: Arc<ListUsersUseCase>,
    pub query_audit_logs_usecase: Arc<QueryAuditLogsUseCase>,
    pub health_service: Arc<HealthCheckService>,
    pub jwt: JwtConfig,
    pub metrics: Arc<metrics::MetricsRegistry>,
}

/// Identificadores de ruta; un UUID malformado es un 400, no un 404
pub(crate) fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("{} must be a valid UUID", field)))
}

/// Crear router de la API
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/api/v1/auth/login", post(users::login))
        // Establishments
        .route(
            "/api/v1/establishments",
            post(establishments::create).get(establishments::list),
        )
        .route(
            "/api/v1/establishments/{id}",
            get(establishments::get_by_id)
                .put(establishments::update)
                .delete(establishments::remove),
        )
        .route(
            "/api/v1/establishments/{id}/addresses",
            post(establishments::add_address),
        )
        .route(
            "/api/v1/establishments/{id}/addresses/{address_id}/primary",
            put(establishments::set_primary_address),
        )
        .route(
            "/api/v1/establishments/{id}/addresses/{address_id}",
            delete(establishments::remove_address),
        )
        .route(
            "/api/v1/establishments/{id}/phones",
            post(establishments::add_phone),
        )
        .route(
            "/api/v1/establishments/{id}/phones/{phone_id}",
            delete(establishments::remove_phone),
        )
        .route(
            "/api/v1/establishments/{id}/social-media",
            post(establishments::add_social_media),
        )
        .route(
            "/api/v1/establishments/{id}/social-media/{social_media_id}",
            delete(establishments::remove_social_media),
        )
        .route(
            "/api/v1/establishments/{id}/contacts",
            post(establishments::add_contact),
        )
        .route(
            "/api/v1/establishments/{id}/contacts/{contact_id}",
            put(establishments::update_contact).delete(establishments::remove_contact),
        )
        // Employees
        .route(
            "/api/v1/establishments/{id}/employees",
            post(employees::hire).get(employees::list),
        )
        .route(
            "/api/v1/employees/{id}",
            get(employees::get_by_id).put(employees::update),
        )
        .route(
            "/api/v1/employees/{id}/status",
            post(employees::change_status),
        )
        // Users
        .route("/api/v1/users", post(users::register).get(users::list))
        .route("/api/v1/users/{id}/role", put(users::change_role))
        .route("/api/v1/users/{id}", delete(users::deactivate))
        // Audit
        .route("/api/v1/audit", get(audit::query))
        // Probes and metrics
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(metrics::export))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
