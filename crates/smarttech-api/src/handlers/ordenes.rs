//! Work order CRUD handlers
//!
//! Creation enforces the visible-code policy: empresa clients must supply an
//! external order number, particulares get the next value of the store-wide
//! sequence. Status edits through the generic update path append to the
//! history log the same way the scheduling path does.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use smarttech_common::{ApiResponse, Error};
use std::sync::Arc;
use tracing::info;

use crate::fechas::parsear_fecha;
use crate::handlers::{requerido, ApiError};
use crate::models::{OrdenDetalle, OrdenTrabajo, TipoCliente};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CrearOrdenRequest {
    pub cliente_dni: Option<String>,
    pub producto_numero_serie: Option<String>,
    pub descripcion_falla: Option<String>,
    pub codigo_orden_visible_manual: Option<String>,
    pub fecha_ingreso: Option<String>,
    pub observaciones: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActualizarOrdenRequest {
    pub estado: Option<String>,
    pub descripcion_falla: Option<String>,
    pub observaciones: Option<String>,
}

/// Visible code for a new order: empresa clients must bring their own,
/// particulares use the sequence number.
fn codigo_visible(
    tipo: TipoCliente,
    manual: Option<&str>,
    id_orden: u64,
) -> Result<String, Error> {
    match tipo {
        TipoCliente::Empresa => manual
            .map(str::trim)
            .filter(|codigo| !codigo.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::validation("Debe ingresar un número de orden externo para clientes empresa")
            }),
        TipoCliente::Particular => Ok(id_orden.to_string()),
    }
}

/// Apply a generic update to an order. A real state change goes through the
/// history log; repeating the current state or touching other fields does
/// not.
fn aplicar_cambios(orden: &mut OrdenTrabajo, cambios: &ActualizarOrdenRequest) {
    if let Some(falla) = cambios
        .descripcion_falla
        .as_deref()
        .map(str::trim)
        .filter(|falla| !falla.is_empty())
    {
        orden.descripcion_falla = falla.to_string();
    }

    if let Some(observaciones) = &cambios.observaciones {
        orden.observaciones = observaciones.clone();
    }

    if let Some(estado) = cambios
        .estado
        .as_deref()
        .map(str::trim)
        .filter(|estado| !estado.is_empty())
    {
        if estado != orden.estado {
            orden.registrar_estado(estado, "Estado actualizado");
        }
    }
}

/// GET /api/ordenes
pub async fn listar_ordenes_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<OrdenDetalle>>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let ordenes = storage.listar_ordenes().await?;

    let mut detalles = Vec::with_capacity(ordenes.len());
    for orden in ordenes {
        let cliente = storage.buscar_cliente(&orden.cliente_dni).await?;
        let producto = storage.buscar_producto(&orden.producto_numero_serie).await?;
        detalles.push(OrdenDetalle {
            orden,
            cliente,
            producto,
        });
    }

    Ok(Json(ApiResponse::ok(detalles)))
}

/// POST /api/ordenes
pub async fn crear_orden_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CrearOrdenRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrdenTrabajo>>), ApiError> {
    const OBLIGATORIOS: &str = "DNI, número de serie y descripción de falla son obligatorios";

    let cliente_dni = requerido(payload.cliente_dni.as_deref(), OBLIGATORIOS)?;
    let producto_numero_serie = requerido(payload.producto_numero_serie.as_deref(), OBLIGATORIOS)?;
    let descripcion_falla = requerido(payload.descripcion_falla.as_deref(), OBLIGATORIOS)?;

    let fecha_ingreso = match payload.fecha_ingreso.as_deref().map(str::trim) {
        Some(texto) if !texto.is_empty() => parsear_fecha(texto)
            .ok_or_else(|| ApiError::validation("Fecha de ingreso inválida"))?,
        _ => Utc::now(),
    };

    let mut storage = state.storage.lock().await;

    let cliente = storage
        .buscar_cliente(&cliente_dni)
        .await?
        .ok_or_else(|| ApiError::not_found("Cliente no encontrado"))?;
    storage
        .buscar_producto(&producto_numero_serie)
        .await?
        .ok_or_else(|| ApiError::not_found("Producto no encontrado"))?;

    let codigo_manual = payload.codigo_orden_visible_manual.as_deref();
    if cliente.tipo_cliente == TipoCliente::Empresa {
        if let Some(codigo) = codigo_manual.map(str::trim).filter(|c| !c.is_empty()) {
            if storage.buscar_orden(codigo).await?.is_some() {
                return Err(ApiError::conflict(
                    "Ya existe una orden con ese número de orden externo",
                ));
            }
        }
    }

    let id_orden = storage.proximo_id_orden().await?;
    let codigo = codigo_visible(cliente.tipo_cliente, codigo_manual, id_orden)?;

    let orden = OrdenTrabajo::nueva(
        id_orden,
        codigo,
        cliente_dni,
        producto_numero_serie,
        fecha_ingreso,
        descripcion_falla,
        payload.observaciones.unwrap_or_default(),
        payload
            .estado
            .filter(|estado| !estado.trim().is_empty()),
    );

    let creado = storage.crear_orden(&orden).await?;
    if !creado {
        return Err(ApiError::conflict(
            "Ya existe una orden con ese número de orden externo",
        ));
    }

    info!(
        "Work order created: {} for client {}",
        orden.codigo_orden_visible, orden.cliente_dni
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Orden de trabajo creada exitosamente",
            orden,
        )),
    ))
}

/// PUT /api/ordenes/:id
pub async fn actualizar_orden_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ActualizarOrdenRequest>,
) -> Result<Json<ApiResponse<OrdenTrabajo>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let mut orden = storage
        .buscar_orden(id.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Orden de trabajo no encontrada"))?;

    aplicar_cambios(&mut orden, &payload);

    let actualizado = storage.actualizar_orden(&orden).await?;
    if !actualizado {
        return Err(ApiError::not_found("Orden de trabajo no encontrada"));
    }

    Ok(Json(ApiResponse::ok_with_message(
        "Orden de trabajo actualizada exitosamente",
        orden,
    )))
}

/// DELETE /api/ordenes/:id
pub async fn eliminar_orden_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let borrado = storage.eliminar_orden(id.trim()).await?;
    if !borrado {
        return Err(ApiError::not_found("Orden de trabajo no encontrada"));
    }

    Ok(Json(ApiResponse::message(
        "Orden de trabajo eliminada exitosamente",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ESTADO_ASIGNADA, ESTADO_INGRESADO};

    fn orden_de_prueba() -> OrdenTrabajo {
        OrdenTrabajo::nueva(
            7,
            "7".to_string(),
            "11222333".to_string(),
            "SN-7".to_string(),
            Utc::now(),
            "No carga".to_string(),
            String::new(),
            None,
        )
    }

    #[test]
    fn test_codigo_visible_empresa_requiere_manual() {
        let err = codigo_visible(TipoCliente::Empresa, None, 12).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = codigo_visible(TipoCliente::Empresa, Some("  "), 12).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let codigo = codigo_visible(TipoCliente::Empresa, Some(" EXT-55 "), 12).unwrap();
        assert_eq!(codigo, "EXT-55");
    }

    #[test]
    fn test_codigo_visible_particular_usa_la_secuencia() {
        let codigo = codigo_visible(TipoCliente::Particular, None, 42).unwrap();
        assert_eq!(codigo, "42");

        // A stray manual code on a particular client is ignored
        let codigo = codigo_visible(TipoCliente::Particular, Some("EXT-1"), 43).unwrap();
        assert_eq!(codigo, "43");
    }

    #[test]
    fn test_cambio_de_estado_agrega_historial() {
        let mut orden = orden_de_prueba();
        aplicar_cambios(
            &mut orden,
            &ActualizarOrdenRequest {
                estado: Some("En revisión".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(orden.estado, "En revisión");
        assert_eq!(orden.historial.len(), 2);
        assert_eq!(orden.historial[1].estado, "En revisión");
        assert_eq!(orden.historial[1].descripcion, "Estado actualizado");
    }

    #[test]
    fn test_repetir_estado_no_duplica_historial() {
        let mut orden = orden_de_prueba();
        aplicar_cambios(
            &mut orden,
            &ActualizarOrdenRequest {
                estado: Some(ESTADO_INGRESADO.to_string()),
                ..Default::default()
            },
        );

        assert_eq!(orden.estado, ESTADO_INGRESADO);
        assert_eq!(orden.historial.len(), 1);
    }

    #[test]
    fn test_editar_falla_no_toca_historial() {
        let mut orden = orden_de_prueba();
        aplicar_cambios(
            &mut orden,
            &ActualizarOrdenRequest {
                descripcion_falla: Some("Batería agotada".to_string()),
                observaciones: Some("cliente avisado".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(orden.descripcion_falla, "Batería agotada");
        assert_eq!(orden.observaciones, "cliente avisado");
        assert_eq!(orden.historial.len(), 1);
    }

    #[test]
    fn test_estado_en_blanco_se_ignora() {
        let mut orden = orden_de_prueba();
        orden.registrar_estado(ESTADO_ASIGNADA, "Asignada a técnico 1 para revisión");

        aplicar_cambios(
            &mut orden,
            &ActualizarOrdenRequest {
                estado: Some("  ".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(orden.estado, ESTADO_ASIGNADA);
        assert_eq!(orden.historial.len(), 2);
    }
}
