//! Consulta del rastro de auditoría

use super::{ApiError, ApiResponse, AppState};
use crate::auth::AuthenticatedUser;
use axum::extract::{Query, State};
use axum::response::Json;
use denda_application::{QueryAuditLogsRequest, QueryAuditLogsResponse};
use denda_domain::iam::Role;

pub async fn query(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(request): Query<QueryAuditLogsRequest>,
) -> Result<Json<ApiResponse<QueryAuditLogsResponse>>, ApiError> {
    user.require(Role::Admin)?;
    let response = state.query_audit_logs_usecase.execute(request).await?;
    Ok(Json(ApiResponse::success(response)))
}
