use super::error::AppResult;
use super::store::{ConfigPatch, ConfigSnapshot};
use super::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub ok: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: u64,
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigSnapshot> {
    Json(state.store.get().await)
}

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ConfigPatch>,
) -> AppResult<Json<UpdateResponse>> {
    let snapshot = state.store.update(patch).await?;
    Ok(Json(UpdateResponse {
        ok: true,
        updated_at: snapshot.updated_at,
        version: snapshot.version,
    }))
}
