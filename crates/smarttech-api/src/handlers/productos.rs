//! Product CRUD handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use smarttech_common::ApiResponse;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{requerido, ApiError};
use crate::models::Producto;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CrearProductoRequest {
    pub numero_serie: Option<String>,
    pub tipo_producto: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActualizarProductoRequest {
    pub tipo_producto: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}

/// GET /api/productos
pub async fn listar_productos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Producto>>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let productos = storage.listar_productos().await?;
    Ok(Json(ApiResponse::ok(productos)))
}

/// GET /api/productos/serie/:numero_serie
pub async fn buscar_producto_handler(
    State(state): State<Arc<AppState>>,
    Path(numero_serie): Path<String>,
) -> Result<Json<ApiResponse<Producto>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let producto = storage
        .buscar_producto(numero_serie.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Producto no encontrado"))?;
    Ok(Json(ApiResponse::ok(producto)))
}

/// POST /api/productos
pub async fn crear_producto_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CrearProductoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Producto>>), ApiError> {
    const OBLIGATORIOS: &str = "El número de serie y tipo de producto son obligatorios";

    let numero_serie = requerido(payload.numero_serie.as_deref(), OBLIGATORIOS)?;
    let tipo_producto = requerido(payload.tipo_producto.as_deref(), OBLIGATORIOS)?;

    let producto = Producto::nuevo(
        &numero_serie,
        &tipo_producto,
        payload.marca.as_deref().unwrap_or(""),
        payload.modelo.as_deref().unwrap_or(""),
    );

    let mut storage = state.storage.lock().await;
    let creado = storage.crear_producto(&producto).await?;
    if !creado {
        return Err(ApiError::conflict(
            "Ya existe un producto con ese número de serie",
        ));
    }

    info!("Product created: {}", producto.numero_serie);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Producto creado exitosamente",
            producto,
        )),
    ))
}

/// PUT /api/productos/:numero_serie
pub async fn actualizar_producto_handler(
    State(state): State<Arc<AppState>>,
    Path(numero_serie): Path<String>,
    Json(payload): Json<ActualizarProductoRequest>,
) -> Result<Json<ApiResponse<Producto>>, ApiError> {
    let tipo_producto = requerido(
        payload.tipo_producto.as_deref(),
        "El tipo de producto es obligatorio",
    )?;

    let mut storage = state.storage.lock().await;
    let mut producto = storage
        .buscar_producto(numero_serie.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Producto no encontrado"))?;

    producto.tipo_producto = tipo_producto.to_lowercase();
    if let Some(marca) = payload.marca {
        producto.marca = marca.trim().to_string();
    }
    if let Some(modelo) = payload.modelo {
        producto.modelo = modelo.trim().to_string();
    }
    producto.fecha_actualizacion = Some(Utc::now());

    let actualizado = storage.actualizar_producto(&producto).await?;
    if !actualizado {
        return Err(ApiError::not_found("Producto no encontrado"));
    }

    Ok(Json(ApiResponse::ok_with_message(
        "Producto actualizado exitosamente",
        producto,
    )))
}

/// PATCH /api/productos/:numero_serie/toggle-estado
pub async fn toggle_producto_handler(
    State(state): State<Arc<AppState>>,
    Path(numero_serie): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let mut producto = storage
        .buscar_producto(numero_serie.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Producto no encontrado"))?;

    producto.activo = !producto.activo;
    producto.fecha_actualizacion = Some(Utc::now());

    let actualizado = storage.actualizar_producto(&producto).await?;
    if !actualizado {
        return Err(ApiError::not_found("Producto no encontrado"));
    }

    let mensaje = if producto.activo {
        "Producto activado exitosamente"
    } else {
        "Producto desactivado exitosamente"
    };

    Ok(Json(ApiResponse::ok_with_message(
        mensaje,
        serde_json::json!({ "activo": producto.activo }),
    )))
}

/// DELETE /api/productos/:numero_serie
pub async fn eliminar_producto_handler(
    State(state): State<Arc<AppState>>,
    Path(numero_serie): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let borrado = storage.eliminar_producto(numero_serie.trim()).await?;
    if !borrado {
        return Err(ApiError::not_found("Producto no encontrado"));
    }

    Ok(Json(ApiResponse::message("Producto eliminado exitosamente")))
}
