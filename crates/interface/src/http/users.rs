//! Handlers de autenticación y administración de cuentas

use super::{ApiError, ApiResponse, AppState, parse_uuid};
use crate::auth::AuthenticatedUser;
use axum::extract::{Path, State};
use axum::response::Json;
use denda_application::{
    ChangeUserRoleRequest, ListUsersResponse, LoginRequest, LoginResponse, RegisterUserRequest,
    UserResponse,
};
use denda_domain::iam::Role;
use denda_domain::shared_kernel::UserId;

/// Único endpoint sin token; devuelve el JWT y la cuenta autenticada
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let response = state.login_usecase.execute(request).await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn register(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    user.require(Role::Admin)?;
    let response = state
        .register_user_usecase
        .execute(request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<ListUsersResponse>>, ApiError> {
    user.require(Role::Admin)?;
    let response = state.list_users_usecase.execute().await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn change_role(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<ChangeUserRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    user.require(Role::Admin)?;
    let user_id = UserId(parse_uuid(&id, "user_id")?);
    let response = state
        .change_user_role_usecase
        .execute(user_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Baja lógica; la cuenta queda inactiva pero conserva su historial
pub async fn deactivate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    user.require(Role::Admin)?;
    let user_id = UserId(parse_uuid(&id, "user_id")?);
    let response = state
        .deactivate_user_usecase
        .execute(user_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}
