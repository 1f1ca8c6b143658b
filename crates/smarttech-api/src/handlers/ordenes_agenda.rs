//! Filtered work-order listing backing the agenda screen

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use smarttech_common::{ApiResponse, Error};
use std::sync::Arc;

use crate::fechas::{fin_de_dia, parsear_fecha};
use crate::handlers::ApiError;
use crate::models::OrdenTrabajo;
use crate::AppState;

/// Query filters. Date bounds are inclusive; `hasta` covers its whole day.
#[derive(Debug, Default, Deserialize)]
pub struct FiltroOrdenes {
    pub estado: Option<String>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub q: Option<String>,
}

/// Apply the agenda filters, preserving the newest-first order of the input.
pub fn filtrar_ordenes(
    ordenes: Vec<OrdenTrabajo>,
    filtro: &FiltroOrdenes,
) -> Result<Vec<OrdenTrabajo>, Error> {
    let desde = match filtro.desde.as_deref().map(str::trim) {
        Some(texto) if !texto.is_empty() => Some(
            parsear_fecha(texto).ok_or_else(|| Error::validation("Fecha 'desde' inválida"))?,
        ),
        _ => None,
    };

    let hasta = match filtro.hasta.as_deref().map(str::trim) {
        Some(texto) if !texto.is_empty() => Some(fin_de_dia(
            parsear_fecha(texto).ok_or_else(|| Error::validation("Fecha 'hasta' inválida"))?,
        )),
        _ => None,
    };

    let estado = filtro.estado.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let q = filtro
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    Ok(ordenes
        .into_iter()
        .filter(|orden| {
            if let Some(estado) = estado {
                if orden.estado != estado {
                    return false;
                }
            }
            if let Some(desde) = desde {
                if orden.fecha_ingreso < desde {
                    return false;
                }
            }
            if let Some(hasta) = hasta {
                if orden.fecha_ingreso > hasta {
                    return false;
                }
            }
            if let Some(q) = &q {
                let en_codigo = orden.codigo_orden_visible.to_lowercase().contains(q);
                let en_falla = orden.descripcion_falla.to_lowercase().contains(q);
                if !en_codigo && !en_falla {
                    return false;
                }
            }
            true
        })
        .collect())
}

/// GET /api/ordenes-agenda
pub async fn listar_ordenes_agenda_handler(
    State(state): State<Arc<AppState>>,
    Query(filtro): Query<FiltroOrdenes>,
) -> Result<Json<ApiResponse<Vec<OrdenTrabajo>>>, ApiError> {
    let mut storage = state.storage.lock().await;
    let ordenes = storage.listar_ordenes().await?;
    let filtradas = filtrar_ordenes(ordenes, &filtro)?;
    Ok(Json(ApiResponse::ok(filtradas)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ESTADO_ASIGNADA;
    use chrono::{TimeZone, Utc};

    fn orden(codigo: &str, estado: &str, falla: &str, dia: u32, hora: u32) -> OrdenTrabajo {
        let mut orden = OrdenTrabajo::nueva(
            1,
            codigo.to_string(),
            "11222333".to_string(),
            "SN-1".to_string(),
            Utc.with_ymd_and_hms(2024, 3, dia, hora, 0, 0).unwrap(),
            falla.to_string(),
            String::new(),
            None,
        );
        orden.estado = estado.to_string();
        orden
    }

    #[test]
    fn test_filtra_por_estado_exacto() {
        let ordenes = vec![
            orden("1", "Ingresado", "no enciende", 1, 10),
            orden("2", ESTADO_ASIGNADA, "pantalla", 2, 10),
        ];

        let filtro = FiltroOrdenes {
            estado: Some(ESTADO_ASIGNADA.to_string()),
            ..Default::default()
        };
        let resultado = filtrar_ordenes(ordenes, &filtro).unwrap();

        assert_eq!(resultado.len(), 1);
        assert_eq!(resultado[0].codigo_orden_visible, "2");
    }

    #[test]
    fn test_hasta_incluye_el_dia_completo() {
        // Intake late in the evening of the `hasta` day still matches
        let ordenes = vec![
            orden("1", "Ingresado", "falla", 5, 22),
            orden("2", "Ingresado", "falla", 6, 1),
        ];

        let filtro = FiltroOrdenes {
            hasta: Some("2024-03-05".to_string()),
            ..Default::default()
        };
        let resultado = filtrar_ordenes(ordenes, &filtro).unwrap();

        assert_eq!(resultado.len(), 1);
        assert_eq!(resultado[0].codigo_orden_visible, "1");
    }

    #[test]
    fn test_desde_es_inclusivo() {
        let ordenes = vec![
            orden("1", "Ingresado", "falla", 4, 23),
            orden("2", "Ingresado", "falla", 5, 0),
        ];

        let filtro = FiltroOrdenes {
            desde: Some("2024-03-05".to_string()),
            ..Default::default()
        };
        let resultado = filtrar_ordenes(ordenes, &filtro).unwrap();

        assert_eq!(resultado.len(), 1);
        assert_eq!(resultado[0].codigo_orden_visible, "2");
    }

    #[test]
    fn test_q_busca_en_codigo_y_falla_sin_distinguir_mayusculas() {
        let ordenes = vec![
            orden("EXT-100", "Ingresado", "no enciende", 1, 10),
            orden("2", "Ingresado", "Pantalla EXTraña", 2, 10),
            orden("3", "Ingresado", "teclado", 3, 10),
        ];

        let filtro = FiltroOrdenes {
            q: Some("ext".to_string()),
            ..Default::default()
        };
        let resultado = filtrar_ordenes(ordenes, &filtro).unwrap();

        assert_eq!(resultado.len(), 2);
    }

    #[test]
    fn test_fecha_invalida_es_error_de_validacion() {
        let filtro = FiltroOrdenes {
            desde: Some("ayer".to_string()),
            ..Default::default()
        };
        let err = filtrar_ordenes(Vec::new(), &filtro).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_sin_filtros_devuelve_todo_en_orden() {
        let ordenes = vec![
            orden("b", "Ingresado", "falla", 9, 10),
            orden("a", "Ingresado", "falla", 1, 10),
        ];

        let resultado = filtrar_ordenes(ordenes, &FiltroOrdenes::default()).unwrap();
        assert_eq!(resultado.len(), 2);
        assert_eq!(resultado[0].codigo_orden_visible, "b");
    }
}
