//! Handlers de establecimientos y de sus puntos de contacto

use super::{ApiError, ApiResponse, AppState, parse_uuid};
use crate::auth::AuthenticatedUser;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use denda_application::{
    AddAddressRequest, AddPhoneRequest, AddSocialMediaRequest, ContactRequest,
    CreateEstablishmentRequest, DeleteEstablishmentResponse, EstablishmentResponse,
    ListEstablishmentsRequest, ListEstablishmentsResponse, UpdateEstablishmentRequest,
};
use denda_domain::iam::Role;
use denda_domain::shared_kernel::{AddressId, ContactId, EstablishmentId, PhoneId, SocialMediaId};

pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateEstablishmentRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let response = state
        .create_establishment_usecase
        .execute(request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(request): Query<ListEstablishmentsRequest>,
) -> Result<Json<ApiResponse<ListEstablishmentsResponse>>, ApiError> {
    user.require(Role::Viewer)?;
    let response = state.list_establishments_usecase.execute(request).await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Viewer)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state.get_establishment_usecase.execute(establishment_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateEstablishmentRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .update_establishment_usecase
        .execute(establishment_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

/// La baja se rechaza mientras queden empleados sin terminar
pub async fn remove(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteEstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .delete_establishment_usecase
        .execute(establishment_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn add_address(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddAddressRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .addresses_usecase
        .add(establishment_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn set_primary_address(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, address_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let address_id = AddressId(parse_uuid(&address_id, "address_id")?);
    let response = state
        .addresses_usecase
        .set_primary(establishment_id, address_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn remove_address(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, address_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let address_id = AddressId(parse_uuid(&address_id, "address_id")?);
    let response = state
        .addresses_usecase
        .remove(establishment_id, address_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn add_phone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddPhoneRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .phones_usecase
        .add(establishment_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn remove_phone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, phone_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let phone_id = PhoneId(parse_uuid(&phone_id, "phone_id")?);
    let response = state
        .phones_usecase
        .remove(establishment_id, phone_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn add_social_media(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddSocialMediaRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .social_media_usecase
        .add(establishment_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn remove_social_media(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, social_media_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let social_media_id = SocialMediaId(parse_uuid(&social_media_id, "social_media_id")?);
    let response = state
        .social_media_usecase
        .remove(establishment_id, social_media_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn add_contact(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let response = state
        .contacts_usecase
        .add(establishment_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, contact_id)): Path<(String, String)>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let contact_id = ContactId(parse_uuid(&contact_id, "contact_id")?);
    let response = state
        .contacts_usecase
        .update(establishment_id, contact_id, request, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn remove_contact(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, contact_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EstablishmentResponse>>, ApiError> {
    user.require(Role::Manager)?;
    let establishment_id = EstablishmentId(parse_uuid(&id, "establishment_id")?);
    let contact_id = ContactId(parse_uuid(&contact_id, "contact_id")?);
    let response = state
        .contacts_usecase
        .remove(establishment_id, contact_id, &user.context())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}
