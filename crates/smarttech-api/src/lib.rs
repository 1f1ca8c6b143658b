//! SmartTech Manager REST API
//!
//! Backend for the repair-shop frontend: CRUD over clients, technicians,
//! products and work orders, plus the scheduling flow that assigns orders to
//! technicians and computes SLA deadlines.
//!
//! ## Endpoints
//!
//! - `POST /api/auth/login` - hardcoded login stub
//! - `GET/POST /api/clientes`, `GET /api/clientes/dni/:dni`,
//!   `PUT/DELETE /api/clientes/:dni`
//! - `GET/POST /api/tecnicos`, `PUT/DELETE /api/tecnicos/:dni`,
//!   `PATCH /api/tecnicos/:dni/toggle-estado`
//! - `GET/POST /api/productos`, `GET /api/productos/serie/:numero_serie`,
//!   `PUT/DELETE /api/productos/:numero_serie`,
//!   `PATCH /api/productos/:numero_serie/toggle-estado`
//! - `GET/POST /api/ordenes`, `PUT/DELETE /api/ordenes/:id`
//! - `GET /api/ordenes-agenda?estado=&desde=&hasta=&q=` - filtered listing
//! - `GET/POST /api/agenda` - schedule entries
//! - `GET /api/health` - health check

pub mod agenda;
pub mod config;
pub mod fechas;
pub mod handlers;
pub mod models;
pub mod plazos;
pub mod storage;

use axum::routing::{get, patch, post, put};
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use storage::Storage;

/// Shared application state. The storage handle is created once at startup
/// and owned here for the life of the process.
pub struct AppState {
    pub storage: Mutex<Storage>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        // Clientes
        .route(
            "/api/clientes",
            get(handlers::clientes::listar_clientes_handler)
                .post(handlers::clientes::crear_cliente_handler),
        )
        .route(
            "/api/clientes/dni/:dni",
            get(handlers::clientes::buscar_cliente_handler),
        )
        .route(
            "/api/clientes/:dni",
            put(handlers::clientes::actualizar_cliente_handler)
                .delete(handlers::clientes::eliminar_cliente_handler),
        )
        // Técnicos
        .route(
            "/api/tecnicos",
            get(handlers::tecnicos::listar_tecnicos_handler)
                .post(handlers::tecnicos::crear_tecnico_handler),
        )
        .route(
            "/api/tecnicos/:dni",
            put(handlers::tecnicos::actualizar_tecnico_handler)
                .delete(handlers::tecnicos::eliminar_tecnico_handler),
        )
        .route(
            "/api/tecnicos/:dni/toggle-estado",
            patch(handlers::tecnicos::toggle_tecnico_handler),
        )
        // Productos
        .route(
            "/api/productos",
            get(handlers::productos::listar_productos_handler)
                .post(handlers::productos::crear_producto_handler),
        )
        .route(
            "/api/productos/serie/:numero_serie",
            get(handlers::productos::buscar_producto_handler),
        )
        .route(
            "/api/productos/:numero_serie",
            put(handlers::productos::actualizar_producto_handler)
                .delete(handlers::productos::eliminar_producto_handler),
        )
        .route(
            "/api/productos/:numero_serie/toggle-estado",
            patch(handlers::productos::toggle_producto_handler),
        )
        // Órdenes de trabajo
        .route(
            "/api/ordenes",
            get(handlers::ordenes::listar_ordenes_handler)
                .post(handlers::ordenes::crear_orden_handler),
        )
        .route(
            "/api/ordenes/:id",
            put(handlers::ordenes::actualizar_orden_handler)
                .delete(handlers::ordenes::eliminar_orden_handler),
        )
        // Agenda
        .route(
            "/api/ordenes-agenda",
            get(handlers::ordenes_agenda::listar_ordenes_agenda_handler),
        )
        .route(
            "/api/agenda",
            get(handlers::agenda::listar_agenda_handler)
                .post(handlers::agenda::programar_orden_handler),
        )
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
