use crate::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": "ok",
        "database": database,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
