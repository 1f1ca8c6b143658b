//! Redis storage for SmartTech Manager
//!
//! One JSON document per record under `entidad:{clave}`, with a set index per
//! collection (`clientes:all`, `tecnicos:all`, ...) so listings do not need a
//! keyspace scan. Order identifiers come from an atomic counter (`INCR`).
//! Redis is the sole arbiter of consistency; there is no in-process locking
//! between requests.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use smarttech_common::Result;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Asignacion, Cliente, OrdenTrabajo, Producto, Tecnico};

const INDICE_CLIENTES: &str = "clientes:all";
const INDICE_TECNICOS: &str = "tecnicos:all";
const INDICE_PRODUCTOS: &str = "productos:all";
const INDICE_ORDENES: &str = "ordenes:all";
const INDICE_AGENDA: &str = "agenda:all";
const CONTADOR_ORDENES: &str = "contador:ordenes_trabajo";

/// Storage handle for every collection. Constructed once at startup and
/// shared through the application state; never reached through a global.
pub struct Storage {
    conn: ConnectionManager,
}

impl Storage {
    /// Create a new storage instance
    pub async fn new(redis_url: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        info!("Connected to Redis at {}", redis_url);

        Ok(Self { conn })
    }

    // ---- generic document helpers ----

    async fn leer_doc<T: DeserializeOwned>(&mut self, clave: &str) -> Result<Option<T>> {
        let json: Option<String> = self.conn.get(clave).await?;

        match json {
            Some(datos) => Ok(Some(serde_json::from_str(&datos)?)),
            None => Ok(None),
        }
    }

    async fn escribir_doc<T: Serialize>(&mut self, clave: &str, valor: &T) -> Result<()> {
        let json = serde_json::to_string(valor)?;
        let _: () = self.conn.set(clave, json).await?;
        Ok(())
    }

    /// Write a new document and register it in the collection index.
    /// Returns false without touching anything if the key is already taken.
    async fn crear_doc<T: Serialize>(
        &mut self,
        clave: &str,
        indice: &str,
        miembro: &str,
        valor: &T,
    ) -> Result<bool> {
        let existe: bool = self.conn.exists(clave).await?;
        if existe {
            debug!("Key already taken: {}", clave);
            return Ok(false);
        }

        self.escribir_doc(clave, valor).await?;
        let _: () = self.conn.sadd(indice, miembro).await?;
        Ok(true)
    }

    /// Overwrite an existing document. Returns false if it does not exist.
    async fn actualizar_doc<T: Serialize>(&mut self, clave: &str, valor: &T) -> Result<bool> {
        let existe: bool = self.conn.exists(clave).await?;
        if !existe {
            return Ok(false);
        }

        self.escribir_doc(clave, valor).await?;
        Ok(true)
    }

    /// Delete a document and drop it from the collection index.
    async fn eliminar_doc(&mut self, clave: &str, indice: &str, miembro: &str) -> Result<bool> {
        let borrado: bool = self.conn.del(clave).await?;
        if borrado {
            let _: () = self.conn.srem(indice, miembro).await?;
        }
        Ok(borrado)
    }

    async fn leer_indice<T: DeserializeOwned>(
        &mut self,
        indice: &str,
        prefijo: &str,
    ) -> Result<Vec<T>> {
        let miembros: Vec<String> = self.conn.smembers(indice).await?;

        let mut documentos = Vec::with_capacity(miembros.len());
        for miembro in miembros {
            if let Some(doc) = self.leer_doc(&format!("{prefijo}:{miembro}")).await? {
                documentos.push(doc);
            }
        }
        Ok(documentos)
    }

    // ---- clientes ----

    pub async fn listar_clientes(&mut self) -> Result<Vec<Cliente>> {
        self.leer_indice(INDICE_CLIENTES, "cliente").await
    }

    pub async fn buscar_cliente(&mut self, dni: &str) -> Result<Option<Cliente>> {
        self.leer_doc(&format!("cliente:{dni}")).await
    }

    /// Returns false if a client with that DNI already exists.
    pub async fn crear_cliente(&mut self, cliente: &Cliente) -> Result<bool> {
        let creado = self
            .crear_doc(
                &format!("cliente:{}", cliente.dni),
                INDICE_CLIENTES,
                &cliente.dni,
                cliente,
            )
            .await?;
        if creado {
            info!("Created client: {}", cliente.dni);
        }
        Ok(creado)
    }

    pub async fn actualizar_cliente(&mut self, cliente: &Cliente) -> Result<bool> {
        self.actualizar_doc(&format!("cliente:{}", cliente.dni), cliente)
            .await
    }

    pub async fn eliminar_cliente(&mut self, dni: &str) -> Result<bool> {
        self.eliminar_doc(&format!("cliente:{dni}"), INDICE_CLIENTES, dni)
            .await
    }

    // ---- tecnicos ----

    /// All technicians, sorted by name.
    pub async fn listar_tecnicos(&mut self) -> Result<Vec<Tecnico>> {
        let mut tecnicos: Vec<Tecnico> = self.leer_indice(INDICE_TECNICOS, "tecnico").await?;
        tecnicos.sort_by(|a, b| a.nombre_apellido.cmp(&b.nombre_apellido));
        Ok(tecnicos)
    }

    pub async fn buscar_tecnico(&mut self, dni: &str) -> Result<Option<Tecnico>> {
        self.leer_doc(&format!("tecnico:{dni}")).await
    }

    pub async fn crear_tecnico(&mut self, tecnico: &Tecnico) -> Result<bool> {
        let creado = self
            .crear_doc(
                &format!("tecnico:{}", tecnico.dni),
                INDICE_TECNICOS,
                &tecnico.dni,
                tecnico,
            )
            .await?;
        if creado {
            info!("Created technician: {}", tecnico.dni);
        }
        Ok(creado)
    }

    pub async fn actualizar_tecnico(&mut self, tecnico: &Tecnico) -> Result<bool> {
        self.actualizar_doc(&format!("tecnico:{}", tecnico.dni), tecnico)
            .await
    }

    pub async fn eliminar_tecnico(&mut self, dni: &str) -> Result<bool> {
        self.eliminar_doc(&format!("tecnico:{dni}"), INDICE_TECNICOS, dni)
            .await
    }

    // ---- productos ----

    /// All products, sorted by category.
    pub async fn listar_productos(&mut self) -> Result<Vec<Producto>> {
        let mut productos: Vec<Producto> = self.leer_indice(INDICE_PRODUCTOS, "producto").await?;
        productos.sort_by(|a, b| a.tipo_producto.cmp(&b.tipo_producto));
        Ok(productos)
    }

    pub async fn buscar_producto(&mut self, numero_serie: &str) -> Result<Option<Producto>> {
        self.leer_doc(&format!("producto:{numero_serie}")).await
    }

    pub async fn crear_producto(&mut self, producto: &Producto) -> Result<bool> {
        let creado = self
            .crear_doc(
                &format!("producto:{}", producto.numero_serie),
                INDICE_PRODUCTOS,
                &producto.numero_serie,
                producto,
            )
            .await?;
        if creado {
            info!("Created product: {}", producto.numero_serie);
        }
        Ok(creado)
    }

    pub async fn actualizar_producto(&mut self, producto: &Producto) -> Result<bool> {
        self.actualizar_doc(&format!("producto:{}", producto.numero_serie), producto)
            .await
    }

    pub async fn eliminar_producto(&mut self, numero_serie: &str) -> Result<bool> {
        self.eliminar_doc(
            &format!("producto:{numero_serie}"),
            INDICE_PRODUCTOS,
            numero_serie,
        )
        .await
    }

    // ---- ordenes de trabajo ----

    /// All work orders, newest intake first.
    pub async fn listar_ordenes(&mut self) -> Result<Vec<OrdenTrabajo>> {
        let mut ordenes: Vec<OrdenTrabajo> = self.leer_indice(INDICE_ORDENES, "orden").await?;
        ordenes.sort_by(|a, b| b.fecha_ingreso.cmp(&a.fecha_ingreso));
        Ok(ordenes)
    }

    pub async fn buscar_orden(&mut self, codigo: &str) -> Result<Option<OrdenTrabajo>> {
        self.leer_doc(&format!("orden:{codigo}")).await
    }

    /// Resolve an order by its visible code, falling back to the legacy
    /// numeric identifier rendered as a string.
    pub async fn resolver_orden(&mut self, codigo: &str) -> Result<Option<OrdenTrabajo>> {
        if let Some(orden) = self.buscar_orden(codigo).await? {
            return Ok(Some(orden));
        }

        // Legacy lookup walks the collection; acceptable at this data volume.
        let ordenes = self.listar_ordenes().await?;
        Ok(ordenes
            .into_iter()
            .find(|orden| orden.id_orden.to_string() == codigo))
    }

    pub async fn crear_orden(&mut self, orden: &OrdenTrabajo) -> Result<bool> {
        let creado = self
            .crear_doc(
                &format!("orden:{}", orden.codigo_orden_visible),
                INDICE_ORDENES,
                &orden.codigo_orden_visible,
                orden,
            )
            .await?;
        if creado {
            info!(
                "Created work order: {} (#{})",
                orden.codigo_orden_visible, orden.id_orden
            );
        }
        Ok(creado)
    }

    pub async fn actualizar_orden(&mut self, orden: &OrdenTrabajo) -> Result<bool> {
        self.actualizar_doc(&format!("orden:{}", orden.codigo_orden_visible), orden)
            .await
    }

    pub async fn eliminar_orden(&mut self, codigo: &str) -> Result<bool> {
        self.eliminar_doc(&format!("orden:{codigo}"), INDICE_ORDENES, codigo)
            .await
    }

    /// Mint the next order sequence number. Atomic in Redis, so two
    /// concurrent creations never share an id.
    pub async fn proximo_id_orden(&mut self) -> Result<u64> {
        let id: u64 = self.conn.incr(CONTADOR_ORDENES, 1u64).await?;
        Ok(id)
    }

    // ---- agenda ----

    /// All schedule entries, earliest review date first.
    pub async fn listar_asignaciones(&mut self) -> Result<Vec<Asignacion>> {
        let mut asignaciones: Vec<Asignacion> =
            self.leer_indice(INDICE_AGENDA, "asignacion").await?;
        asignaciones.sort_by(|a, b| a.fecha_revision.cmp(&b.fecha_revision));
        Ok(asignaciones)
    }

    pub async fn crear_asignacion(&mut self, asignacion: &Asignacion) -> Result<()> {
        let clave = format!("asignacion:{}", asignacion.id);
        self.escribir_doc(&clave, asignacion).await?;
        let _: () = self
            .conn
            .sadd(INDICE_AGENDA, asignacion.id.to_string())
            .await?;
        info!(
            "Created schedule entry {} for order {}",
            asignacion.id, asignacion.codigo_orden_visible
        );
        Ok(())
    }

    /// Compensating delete for a schedule entry whose order update failed.
    pub async fn eliminar_asignacion(&mut self, id: &Uuid) -> Result<bool> {
        self.eliminar_doc(&format!("asignacion:{id}"), INDICE_AGENDA, &id.to_string())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TipoCliente;
    use chrono::Utc;

    async fn get_test_storage() -> Storage {
        Storage::new("redis://127.0.0.1:6379/15")
            .await
            .expect("Failed to connect to test Redis")
    }

    fn cliente_de_prueba(dni: &str) -> Cliente {
        Cliente {
            dni: dni.to_string(),
            nombre_apellido: "Ana Pérez".to_string(),
            telefono: Some("1155551234".to_string()),
            domicilio: None,
            tipo_cliente: TipoCliente::Particular,
            nombre_empresa: None,
            fecha_registro: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a local Redis instance"]
    async fn test_crear_y_buscar_cliente() {
        let mut storage = get_test_storage().await;

        let cliente = cliente_de_prueba("storage-cli-1");
        assert!(storage.crear_cliente(&cliente).await.unwrap());

        let encontrado = storage
            .buscar_cliente("storage-cli-1")
            .await
            .unwrap()
            .expect("client not found");
        assert_eq!(encontrado.nombre_apellido, "Ana Pérez");

        // Duplicate DNI is rejected without overwriting
        assert!(!storage.crear_cliente(&cliente).await.unwrap());

        storage.eliminar_cliente("storage-cli-1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a local Redis instance"]
    async fn test_contador_es_monotono() {
        let mut storage = get_test_storage().await;

        let a = storage.proximo_id_orden().await.unwrap();
        let b = storage.proximo_id_orden().await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    #[ignore = "requires a local Redis instance"]
    async fn test_resolver_orden_por_id_legado() {
        let mut storage = get_test_storage().await;

        let orden = OrdenTrabajo::nueva(
            987_654,
            "storage-ord-legacy".to_string(),
            "11222333".to_string(),
            "SN-LEG".to_string(),
            Utc::now(),
            "No enciende".to_string(),
            String::new(),
            None,
        );
        assert!(storage.crear_orden(&orden).await.unwrap());

        let por_codigo = storage.resolver_orden("storage-ord-legacy").await.unwrap();
        assert!(por_codigo.is_some());

        let por_id = storage.resolver_orden("987654").await.unwrap();
        assert_eq!(
            por_id.map(|o| o.codigo_orden_visible),
            Some("storage-ord-legacy".to_string())
        );

        storage.eliminar_orden("storage-ord-legacy").await.unwrap();
    }
}
