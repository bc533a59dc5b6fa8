//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    domain::DisplayName,
    infrastructure::dto::http::{HealthDto, RosterDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Debug endpoint to inspect the current roster (for testing purposes)
pub async fn debug_roster(State(state): State<Arc<AppState>>) -> Json<RosterDto> {
    let snapshot = state.get_roster_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RosterDto {
        users: snapshot
            .users
            .into_iter()
            .map(DisplayName::into_string)
            .collect(),
        connections: snapshot.connections,
    })
}
