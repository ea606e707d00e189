//! GET /api/health - liveness probe.

use axum::Json;
use serde_json::{json, Value};

/// Static OK payload; no auth, cannot fail.
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
