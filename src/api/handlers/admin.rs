use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::{AppState, respond};
use crate::api::models::PeriodResponse;

pub async fn reset_cycle(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    log::info!("Admin triggered activity cycle reset");
    let result = state
        .connection()
        .and_then(|mut conn| state.service().reset_cycle_activity(&mut conn));

    respond(StatusCode::OK, result)
}

pub async fn new_period(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    log::info!("Admin triggered new ranking period");
    let result = state
        .connection()
        .and_then(|mut conn| state.service().start_new_period(&mut conn))
        .map(|entities_updated| PeriodResponse { entities_updated });

    respond(StatusCode::OK, result)
}
