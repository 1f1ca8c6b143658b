//! Client CRUD handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use smarttech_common::ApiResponse;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{requerido, ApiError};
use crate::models::{Cliente, TipoCliente};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CrearClienteRequest {
    pub dni: Option<String>,
    pub nombre_apellido: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub tipo_cliente: Option<TipoCliente>,
    pub nombre_empresa: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActualizarClienteRequest {
    pub nombre_apellido: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub tipo_cliente: Option<TipoCliente>,
    pub nombre_empresa: Option<String>,
}

/// GET /api/clientes
pub async fn listar_clientes_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Cliente>>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let clientes = storage.listar_clientes().await?;
    Ok(Json(ApiResponse::ok(clientes)))
}

/// GET /api/clientes/dni/:dni
pub async fn buscar_cliente_handler(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
) -> Result<Json<ApiResponse<Cliente>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let cliente = storage
        .buscar_cliente(dni.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Cliente no encontrado"))?;
    Ok(Json(ApiResponse::ok(cliente)))
}

/// POST /api/clientes
pub async fn crear_cliente_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CrearClienteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Cliente>>), ApiError> {
    const OBLIGATORIOS: &str =
        "DNI, nombre y apellido, y tipo de cliente son campos obligatorios";

    let dni = requerido(payload.dni.as_deref(), OBLIGATORIOS)?;
    let nombre_apellido = requerido(payload.nombre_apellido.as_deref(), OBLIGATORIOS)?;
    let tipo_cliente = payload
        .tipo_cliente
        .ok_or_else(|| ApiError::validation(OBLIGATORIOS))?;

    let cliente = Cliente {
        dni,
        nombre_apellido,
        telefono: payload.telefono,
        domicilio: payload.domicilio,
        tipo_cliente,
        nombre_empresa: payload.nombre_empresa,
        fecha_registro: Utc::now(),
    };

    let mut storage = state.storage.lock().await;
    let creado = storage.crear_cliente(&cliente).await?;
    if !creado {
        return Err(ApiError::conflict("Ya existe un cliente con ese DNI"));
    }

    info!("Client created: {}", cliente.dni);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Cliente creado exitosamente",
            cliente,
        )),
    ))
}

/// PUT /api/clientes/:dni
pub async fn actualizar_cliente_handler(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
    Json(payload): Json<ActualizarClienteRequest>,
) -> Result<Json<ApiResponse<Cliente>>, ApiError> {
    let nombre_apellido = requerido(
        payload.nombre_apellido.as_deref(),
        "El nombre y apellido es requerido",
    )?;

    let mut storage = state.storage.lock().await;
    let mut cliente = storage
        .buscar_cliente(dni.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Cliente no encontrado"))?;

    cliente.nombre_apellido = nombre_apellido;
    if payload.telefono.is_some() {
        cliente.telefono = payload.telefono;
    }
    if payload.domicilio.is_some() {
        cliente.domicilio = payload.domicilio;
    }
    if let Some(tipo) = payload.tipo_cliente {
        cliente.tipo_cliente = tipo;
    }
    if payload.nombre_empresa.is_some() {
        cliente.nombre_empresa = payload.nombre_empresa;
    }

    let actualizado = storage.actualizar_cliente(&cliente).await?;
    if !actualizado {
        return Err(ApiError::not_found("Cliente no encontrado"));
    }

    Ok(Json(ApiResponse::ok_with_message(
        "Cliente actualizado exitosamente",
        cliente,
    )))
}

/// DELETE /api/clientes/:dni
pub async fn eliminar_cliente_handler(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let borrado = storage.eliminar_cliente(dni.trim()).await?;
    if !borrado {
        return Err(ApiError::not_found("Cliente no encontrado"));
    }

    Ok(Json(ApiResponse::message("Cliente eliminado exitosamente")))
}
