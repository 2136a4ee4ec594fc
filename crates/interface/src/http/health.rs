//! Sondas de liveness y readiness
//!
//! Liveness responde siempre que el proceso atienda peticiones; readiness
//! consulta los componentes registrados y devuelve 503 si alguno falla.

use super::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use denda_domain::health::{LivenessResponse, ReadinessResponse};

pub async fn liveness(State(state): State<AppState>) -> Json<ApiResponse<LivenessResponse>> {
    let report = state.health_service.check_liveness().await;
    Json(ApiResponse::success(report))
}

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let report: ReadinessResponse = state.health_service.check_readiness().await;
    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ApiResponse::success(report)))
}
