// handlers/public/pages.rs - GET /, /about/ and /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - landing page with a map of the site
pub async fn home() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Cat Collector",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "about": "/about/ (public)",
                "accounts": "/signup/, /login/, /logout/ (public)",
                "cats": "/cats/[:cat_id/[update|delete|add-feeding]/] (login required)",
                "cat_toys": "/cats/:cat_id/associate-toy/:toy_id/, /cats/:cat_id/remove-toy/:toy_id/ (login required)",
                "toys": "/toys/[:toy_id/[update|delete]/] (login required)",
            }
        }
    }))
}

/// GET /about/
pub async fn about() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "title": "About the Cat Collector",
            "text": "Keep track of your cats, what they eat and which toys they play with.",
        }
    }))
}

/// GET /health - liveness plus a storage round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
