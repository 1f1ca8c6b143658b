//! Scheduling service
//!
//! Validates a proposed order/technician/date assignment, computes the
//! deadline from the client's SLA window, writes the schedule entry and moves
//! the order to "Asignada" with a history record.

use serde::Deserialize;
use smarttech_common::{Error, Result};
use tracing::{error, info};

use crate::fechas::parsear_fecha;
use crate::models::{Asignacion, AsignacionDetalle, ESTADO_ASIGNADA};
use crate::plazos::{plazo_dias_habiles, sumar_dias_habiles};
use crate::storage::Storage;

/// Request to schedule an order. The order code is accepted under any of its
/// historical field names.
#[derive(Debug, Default, Deserialize)]
pub struct SolicitudAsignacion {
    pub codigo_orden_visible: Option<String>,
    pub codigo: Option<String>,
    pub id_orden: Option<String>,
    pub tecnico_dni: Option<String>,
    pub fecha_revision: Option<String>,
}

impl SolicitudAsignacion {
    /// The order code, whichever alias it arrived under. Blank values count
    /// as missing.
    pub fn codigo(&self) -> Option<&str> {
        self.codigo_orden_visible
            .as_deref()
            .or(self.codigo.as_deref())
            .or(self.id_orden.as_deref())
            .map(str::trim)
            .filter(|codigo| !codigo.is_empty())
    }

    fn tecnico(&self) -> Option<&str> {
        self.tecnico_dni
            .as_deref()
            .map(str::trim)
            .filter(|dni| !dni.is_empty())
    }
}

/// Create a schedule entry for a work order.
///
/// The entry insert and the order update are two separate writes; if the
/// second one fails the entry is deleted again so callers never observe a
/// half-applied assignment.
pub async fn programar(
    storage: &mut Storage,
    solicitud: &SolicitudAsignacion,
) -> Result<Asignacion> {
    let codigo = solicitud
        .codigo()
        .ok_or_else(|| Error::validation("Faltan campos requeridos"))?;
    let tecnico_dni = solicitud
        .tecnico()
        .ok_or_else(|| Error::validation("Faltan campos requeridos"))?;
    let fecha_texto = solicitud
        .fecha_revision
        .as_deref()
        .map(str::trim)
        .filter(|fecha| !fecha.is_empty())
        .ok_or_else(|| Error::validation("Faltan campos requeridos"))?;
    let fecha_revision =
        parsear_fecha(fecha_texto).ok_or_else(|| Error::validation("Fecha de revisión inválida"))?;

    let mut orden = storage
        .resolver_orden(codigo)
        .await?
        .ok_or_else(|| Error::not_found("Orden no encontrada"))?;
    let cliente = storage
        .buscar_cliente(&orden.cliente_dni)
        .await?
        .ok_or_else(|| Error::not_found("Cliente no encontrado"))?;

    let plazo = plazo_dias_habiles(&cliente);
    let fecha_limite = sumar_dias_habiles(orden.fecha_ingreso, plazo);

    let asignacion = Asignacion::nueva(
        orden.codigo_orden_visible.clone(),
        tecnico_dni.to_string(),
        fecha_revision,
        fecha_limite,
    );

    storage.crear_asignacion(&asignacion).await?;

    orden.registrar_estado(
        ESTADO_ASIGNADA,
        format!("Asignada a técnico {tecnico_dni} para revisión"),
    );

    match storage.actualizar_orden(&orden).await {
        Ok(true) => {}
        Ok(false) => {
            revertir(storage, &asignacion).await;
            return Err(Error::not_found("Orden no encontrada"));
        }
        Err(err) => {
            revertir(storage, &asignacion).await;
            return Err(err);
        }
    }

    info!(
        "Scheduled order {} with technician {} ({} business days, deadline {})",
        asignacion.codigo_orden_visible, tecnico_dni, plazo, fecha_limite
    );

    Ok(asignacion)
}

async fn revertir(storage: &mut Storage, asignacion: &Asignacion) {
    if let Err(err) = storage.eliminar_asignacion(&asignacion.id).await {
        error!(
            "Failed to roll back schedule entry {}: {}",
            asignacion.id, err
        );
    }
}

/// All schedule entries sorted by review date, each left-joined with its
/// order, client and technician.
pub async fn listar(storage: &mut Storage) -> Result<Vec<AsignacionDetalle>> {
    let asignaciones = storage.listar_asignaciones().await?;

    let mut detalles = Vec::with_capacity(asignaciones.len());
    for asignacion in asignaciones {
        let orden = storage
            .buscar_orden(&asignacion.codigo_orden_visible)
            .await?;
        let cliente = match &orden {
            Some(orden) => storage.buscar_cliente(&orden.cliente_dni).await?,
            None => None,
        };
        let tecnico = storage.buscar_tecnico(&asignacion.tecnico_dni).await?;

        detalles.push(AsignacionDetalle {
            asignacion,
            orden,
            cliente,
            tecnico,
        });
    }

    Ok(detalles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codigo_toma_el_primer_alias_presente() {
        let solicitud = SolicitudAsignacion {
            codigo: Some("EXT-9".to_string()),
            id_orden: Some("4".to_string()),
            ..Default::default()
        };
        assert_eq!(solicitud.codigo(), Some("EXT-9"));

        let solo_legado = SolicitudAsignacion {
            id_orden: Some("4".to_string()),
            ..Default::default()
        };
        assert_eq!(solo_legado.codigo(), Some("4"));
    }

    #[test]
    fn test_codigo_en_blanco_cuenta_como_faltante() {
        let solicitud = SolicitudAsignacion {
            codigo_orden_visible: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(solicitud.codigo(), None);
    }

    #[test]
    fn test_codigo_recorta_espacios() {
        let solicitud = SolicitudAsignacion {
            codigo_orden_visible: Some("  ORD-7 ".to_string()),
            ..Default::default()
        };
        assert_eq!(solicitud.codigo(), Some("ORD-7"));
    }
}
