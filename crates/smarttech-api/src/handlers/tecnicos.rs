//! Technician CRUD handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use smarttech_common::ApiResponse;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{requerido, ApiError};
use crate::models::Tecnico;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CrearTecnicoRequest {
    pub dni: Option<String>,
    pub nombre_apellido: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActualizarTecnicoRequest {
    pub nombre_apellido: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

/// GET /api/tecnicos
pub async fn listar_tecnicos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Tecnico>>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let tecnicos = storage.listar_tecnicos().await?;
    Ok(Json(ApiResponse::ok(tecnicos)))
}

/// POST /api/tecnicos
pub async fn crear_tecnico_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CrearTecnicoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tecnico>>), ApiError> {
    const OBLIGATORIOS: &str = "DNI y nombre/apellido son campos requeridos";

    let tecnico = Tecnico {
        dni: requerido(payload.dni.as_deref(), OBLIGATORIOS)?,
        nombre_apellido: requerido(payload.nombre_apellido.as_deref(), OBLIGATORIOS)?,
        telefono: payload.telefono,
        direccion: payload.direccion,
        activo: true,
    };

    let mut storage = state.storage.lock().await;
    let creado = storage.crear_tecnico(&tecnico).await?;
    if !creado {
        return Err(ApiError::conflict("Ya existe un técnico con ese DNI"));
    }

    info!("Technician created: {}", tecnico.dni);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Técnico creado exitosamente",
            tecnico,
        )),
    ))
}

/// PUT /api/tecnicos/:dni
pub async fn actualizar_tecnico_handler(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
    Json(payload): Json<ActualizarTecnicoRequest>,
) -> Result<Json<ApiResponse<Tecnico>>, ApiError> {
    let nombre_apellido = requerido(
        payload.nombre_apellido.as_deref(),
        "El nombre/apellido es requerido",
    )?;

    let mut storage = state.storage.lock().await;
    let mut tecnico = storage
        .buscar_tecnico(dni.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Técnico no encontrado"))?;

    tecnico.nombre_apellido = nombre_apellido;
    if payload.telefono.is_some() {
        tecnico.telefono = payload.telefono;
    }
    if payload.direccion.is_some() {
        tecnico.direccion = payload.direccion;
    }

    let actualizado = storage.actualizar_tecnico(&tecnico).await?;
    if !actualizado {
        return Err(ApiError::not_found("Técnico no encontrado"));
    }

    Ok(Json(ApiResponse::ok_with_message(
        "Técnico actualizado exitosamente",
        tecnico,
    )))
}

/// PATCH /api/tecnicos/:dni/toggle-estado
pub async fn toggle_tecnico_handler(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let mut tecnico = storage
        .buscar_tecnico(dni.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Técnico no encontrado"))?;

    tecnico.activo = !tecnico.activo;
    let actualizado = storage.actualizar_tecnico(&tecnico).await?;
    if !actualizado {
        return Err(ApiError::not_found("Técnico no encontrado"));
    }

    let mensaje = if tecnico.activo {
        "Técnico activado exitosamente"
    } else {
        "Técnico desactivado exitosamente"
    };

    Ok(Json(ApiResponse::ok_with_message(
        mensaje,
        serde_json::json!({ "activo": tecnico.activo }),
    )))
}

/// DELETE /api/tecnicos/:dni
pub async fn eliminar_tecnico_handler(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let borrado = storage.eliminar_tecnico(dni.trim()).await?;
    if !borrado {
        return Err(ApiError::not_found("Técnico no encontrado"));
    }

    Ok(Json(ApiResponse::message("Técnico eliminado exitosamente")))
}
