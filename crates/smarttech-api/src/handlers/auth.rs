//! Authentication stub
//!
//! Single hardcoded credential check. No session or token is issued and no
//! other route checks anything.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use smarttech_common::ApiResponse;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
pub async fn login_handler(Json(payload): Json<LoginRequest>) -> Response {
    let valido = payload.username.as_deref() == Some("admin")
        && payload.password.as_deref() == Some("admin123");

    if valido {
        info!("Login accepted for admin");
        Json(serde_json::json!({
            "success": true,
            "user": {
                "username": "admin",
                "nombre": "Administrador",
                "email": "admin@smarttech.com",
                "rol": "admin",
            }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("Credenciales inválidas")),
        )
            .into_response()
    }
}
