//! Handlers de empleados

use super::{ApiError, ApiResponse, AppState, parse_uuid};
use crate::auth::AuthenticatedUser;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use denda_application::{
    ChangeEmployeeStatusRequest, EmployeeResponse, HireEmployeeRequest, ListEmployeesRequest,
    ListEmployeesResponse, UpdateEmployeeRequest,
};
use denda_domain::iam::Role;
use denda_domain::shared_kernel::{EmployeeId, EstablishmentId};

pub async fn hire(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<HireEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .hire_employee_usecase
        .execute(establishment_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Query(request): Query<ListEmployeesRequest>,
) -> Result<Json<ApiResponse<ListEmployeesResponse>>, ApiError> {
    user.require(Role::Viewer)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .list_employees_usecase
        .execute(establishment_id, request)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, ApiError> {
    user.require(Role::Viewer)?;
    let employee_id = EmployeeId(parse_uuid(&id, "employee_id")?);
    let response = state.get_employee_usecase.execute(employee_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let employee_id = EmployeeId(parse_uuid(&id, "employee_id")?);
    let response = state
        .update_employee_usecase
        .execute(employee_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Acciones de ciclo de vida: suspend, reinstate y terminate
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<ChangeEmployeeStatusRequest>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let employee_id = EmployeeId(parse_uuid(&id, "employee_id")?);
    let response = state
        .change_employee_status_usecase
        .execute(employee_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}
