use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, parse_body, respond};
use crate::api::models::{EditMatchRequest, SubmitResultRequest};
use crate::ladder::Discipline;

pub async fn submit_result(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitResultRequest>, JsonRejection>,
) -> impl IntoResponse {
    let result = parse_body(payload).and_then(|request| {
        let mut conn = state.connection()?;
        state.service().submit_result(
            &mut conn,
            request.discipline.unwrap_or(Discipline::Singles),
            request.challenger_id,
            request.challenged_id,
            &request.sets,
            request.challenge_id,
        )
    });

    respond(StatusCode::CREATED, result)
}

pub async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
) -> impl IntoResponse {
    let result = state
        .connection()
        .and_then(|conn| state.service().match_detail(&conn, match_id));

    respond(StatusCode::OK, result)
}

pub async fn edit_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    payload: Result<Json<EditMatchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let result = parse_body(payload).and_then(|request| {
        let mut conn = state.connection()?;
        state
            .service()
            .edit_match(&mut conn, match_id, &request.sets)
    });

    respond(StatusCode::OK, result)
}

pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
) -> impl IntoResponse {
    let result = state
        .connection()
        .and_then(|mut conn| state.service().delete_match(&mut conn, match_id));

    respond(StatusCode::OK, result)
}
