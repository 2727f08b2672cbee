// src/web/handlers/system_handlers.rs
use crate::auth::BearerToken;
use crate::web::types::*;

use rocket::serde::json::Json;
use tracing::info;

pub async fn health_handler(token: BearerToken) -> Json<TextResponse> {
    if token.0.is_some() {
        info!("Health check with bearer token");
    } else {
        info!("Health check by anonymous caller");
    }

    Json(TextResponse::success("OK".to_string()))
}
