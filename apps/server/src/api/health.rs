use std::sync::Arc;

use crate::{main_lib::AppState, models::HealthResponse};
use axum::{extract::State, routing::get, Json, Router};

async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cooling_down: state.cooldown.is_cooling_down(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}
