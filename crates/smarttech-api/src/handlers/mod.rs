//! API request handlers
//!
//! One module per resource. Every handler returns the shared
//! `{success, message?, data?}` envelope; failures map the error taxonomy to
//! HTTP status codes (validation 400, not found 404, conflict 409, anything
//! else a logged 500).

pub mod agenda;
pub mod auth;
pub mod clientes;
pub mod ordenes;
pub mod ordenes_agenda;
pub mod productos;
pub mod tecnicos;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use smarttech_common::{ApiResponse, Error};
use tracing::error;

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.message);
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => Self::validation(message),
            Error::NotFound(message) => Self::not_found(message),
            Error::Conflict(message) => Self::conflict(message),
            otro => {
                error!("Internal error: {}", otro);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Error interno del servidor".to_string(),
                }
            }
        }
    }
}

/// Extract a required text field, treating blank values as missing.
pub(crate) fn requerido(valor: Option<&str>, mensaje: &str) -> Result<String, ApiError> {
    valor
        .map(str::trim)
        .filter(|texto| !texto.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(mensaje))
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "OK",
        "message": "SmartTech Manager API funcionando",
        "timestamp": Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomia_mapea_a_los_estados_http() {
        assert_eq!(
            ApiError::from(Error::validation("faltan campos")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(Error::not_found("no está")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(Error::conflict("duplicado")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(Error::Other(anyhow::anyhow!("boom"))).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_interno_no_filtra_detalle() {
        let err = ApiError::from(Error::Other(anyhow::anyhow!("redis down at 10.0.0.3")));
        assert_eq!(err.message, "Error interno del servidor");
    }

    #[test]
    fn test_requerido_rechaza_blancos() {
        assert!(requerido(None, "falta").is_err());
        assert!(requerido(Some("   "), "falta").is_err());
        assert_eq!(requerido(Some(" 123 "), "falta").unwrap(), "123");
    }
}
