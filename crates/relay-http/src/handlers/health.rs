//! `GET /` and `GET /health` — liveness endpoints (`spec.md` §6).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    status: &'static str,
    timestamp: chrono::DateTime<Utc>,
    port: u16,
    env: Option<String>,
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        timestamp: Utc::now(),
        port: state.settings.port,
        env: state.settings.env.clone(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    uptime: f64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
