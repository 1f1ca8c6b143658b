//! Schedule ("agenda") handlers, thin wrappers over the scheduling service

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use smarttech_common::ApiResponse;
use std::sync::Arc;

use crate::agenda::{self, SolicitudAsignacion};
use crate::handlers::ApiError;
use crate::models::{Asignacion, AsignacionDetalle};
use crate::AppState;

/// GET /api/agenda
pub async fn listar_agenda_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AsignacionDetalle>>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let detalles = agenda::listar(&mut storage).await?;
    Ok(Json(ApiResponse::ok(detalles)))
}

/// POST /api/agenda
pub async fn programar_orden_handler(
    State(state): State<Arc<AppState>>,
    Json(solicitud): Json<SolicitudAsignacion>,
) -> Result<(StatusCode, Json<ApiResponse<Asignacion>>), ApiError> {
    let mut storage = state.storage.lock().await;
    let asignacion = agenda::programar(&mut storage, &solicitud).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("Asignación creada", asignacion)),
    ))
}
