use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, parse_body, respond};
use crate::api::models::{CreatePlayerRequest, HistoryQuery, ListResponse};
use crate::ladder::EntityId;

const DEFAULT_HISTORY_LIMIT: i64 = 50;

pub async fn list_players(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = state
        .connection()
        .and_then(|conn| state.service().singles_standings(&conn))
        .map(ListResponse::from);

    respond(StatusCode::OK, result)
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> impl IntoResponse {
    let result = parse_body(payload).and_then(|request| {
        let mut conn = state.connection()?;
        state
            .service()
            .create_player(&mut conn, &request.to_new_player(), request.position)
    });

    respond(StatusCode::CREATED, result)
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<EntityId>,
) -> impl IntoResponse {
    let result = state
        .connection()
        .and_then(|conn| state.service().player_detail(&conn, player_id));

    respond(StatusCode::OK, result)
}

pub async fn get_player_history(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<EntityId>,
    Query(params): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);

    let result = state
        .connection()
        .and_then(|conn| state.service().player_history(&conn, player_id, limit))
        .map(ListResponse::from);

    respond(StatusCode::OK, result)
}
