//! Domain models for SmartTech Manager
//!
//! Field names match the JSON wire format the Vue frontend consumes, which is
//! why they are in Spanish. Every record is stored as one JSON document in
//! Redis, keyed by its natural identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Initial state of every work order
pub const ESTADO_INGRESADO: &str = "Ingresado";

/// State set by the scheduling flow
pub const ESTADO_ASIGNADA: &str = "Asignada";

/// Client tier, drives order-code generation and SLA policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoCliente {
    Particular,
    Empresa,
}

/// Repair-shop client, keyed by national ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    /// Unique national ID
    pub dni: String,

    pub nombre_apellido: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domicilio: Option<String>,

    pub tipo_cliente: TipoCliente,

    /// Organization name, only meaningful for empresa clients
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_empresa: Option<String>,

    pub fecha_registro: DateTime<Utc>,
}

/// Technician, keyed by national ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tecnico {
    pub dni: String,

    pub nombre_apellido: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,

    /// Whether the technician can currently take work
    pub activo: bool,
}

/// Product under repair, keyed by serial number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producto {
    /// Unique serial number, trimmed
    pub numero_serie: String,

    /// Category, stored lower-cased and trimmed
    pub tipo_producto: String,

    pub marca: String,

    pub modelo: String,

    pub activo: bool,

    pub fecha_creacion: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

impl Producto {
    /// Build a product normalizing its key fields: serial trimmed, category
    /// lower-cased and trimmed.
    pub fn nuevo(numero_serie: &str, tipo_producto: &str, marca: &str, modelo: &str) -> Self {
        Self {
            numero_serie: numero_serie.trim().to_string(),
            tipo_producto: tipo_producto.trim().to_lowercase(),
            marca: marca.trim().to_string(),
            modelo: modelo.trim().to_string(),
            activo: true,
            fecha_creacion: Utc::now(),
            fecha_actualizacion: None,
        }
    }
}

/// One entry in a work order's append-only status history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoHistorial {
    pub fecha: DateTime<Utc>,
    pub estado: String,
    pub descripcion: String,
}

/// Work order, keyed by its visible code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenTrabajo {
    /// Store-wide sequence number minted from the counter
    pub id_orden: u64,

    /// Human-facing identifier: supplied by empresa clients, derived from
    /// `id_orden` for particulares
    pub codigo_orden_visible: String,

    pub cliente_dni: String,

    pub producto_numero_serie: String,

    pub fecha_ingreso: DateTime<Utc>,

    pub descripcion_falla: String,

    pub observaciones: String,

    /// Current state. "Ingresado" and "Asignada" are the states this service
    /// sets itself; further states arrive as free text from the frontend.
    pub estado: String,

    /// Append-only, ordered oldest first
    pub historial: Vec<EventoHistorial>,
}

impl OrdenTrabajo {
    /// Create an order in its initial state with the opening history entry.
    pub fn nueva(
        id_orden: u64,
        codigo_orden_visible: String,
        cliente_dni: String,
        producto_numero_serie: String,
        fecha_ingreso: DateTime<Utc>,
        descripcion_falla: String,
        observaciones: String,
        estado: Option<String>,
    ) -> Self {
        let estado = estado.unwrap_or_else(|| ESTADO_INGRESADO.to_string());
        Self {
            id_orden,
            codigo_orden_visible,
            cliente_dni,
            producto_numero_serie,
            fecha_ingreso,
            descripcion_falla,
            observaciones,
            estado: estado.clone(),
            historial: vec![EventoHistorial {
                fecha: Utc::now(),
                estado,
                descripcion: "Orden creada".to_string(),
            }],
        }
    }

    /// Move the order to a new state, appending the matching history entry.
    /// History is never rewritten, only appended to.
    pub fn registrar_estado(&mut self, estado: &str, descripcion: impl Into<String>) {
        self.estado = estado.to_string();
        self.historial.push(EventoHistorial {
            fecha: Utc::now(),
            estado: estado.to_string(),
            descripcion: descripcion.into(),
        });
    }
}

/// Schedule entry binding a work order to a technician and a review/deadline
/// date pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asignacion {
    pub id: Uuid,

    pub codigo_orden_visible: String,

    pub tecnico_dni: String,

    pub fecha_revision: DateTime<Utc>,

    /// Computed from the order's intake date and the client's SLA window
    pub fecha_limite: DateTime<Utc>,

    pub creada_en: DateTime<Utc>,
}

impl Asignacion {
    pub fn nueva(
        codigo_orden_visible: String,
        tecnico_dni: String,
        fecha_revision: DateTime<Utc>,
        fecha_limite: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            codigo_orden_visible,
            tecnico_dni,
            fecha_revision,
            fecha_limite,
            creada_en: Utc::now(),
        }
    }
}

/// Schedule entry joined with its order, client and technician. Left-join
/// semantics: a dangling reference leaves the field absent, the entry still
/// appears.
#[derive(Debug, Clone, Serialize)]
pub struct AsignacionDetalle {
    #[serde(flatten)]
    pub asignacion: Asignacion,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub orden: Option<OrdenTrabajo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente: Option<Cliente>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tecnico: Option<Tecnico>,
}

/// Work order joined with its client and product (left-join)
#[derive(Debug, Clone, Serialize)]
pub struct OrdenDetalle {
    #[serde(flatten)]
    pub orden: OrdenTrabajo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente: Option<Cliente>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto: Option<Producto>,
}
