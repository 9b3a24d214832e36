use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, parse_body, respond};
use crate::api::models::{ChallengeRequest, ListResponse, PendingQuery};
use crate::ladder::{ChallengeStatus, Discipline};

pub async fn validate_challenge(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChallengeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let result = parse_body(payload).and_then(|request| {
        let conn = state.connection()?;
        state.service().validate_challenge(
            &conn,
            request.discipline.unwrap_or(Discipline::Singles),
            request.challenger_id,
            request.challenged_id,
        )
    });

    respond(StatusCode::OK, result)
}

pub async fn propose_challenge(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChallengeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let result = parse_body(payload).and_then(|request| {
        let mut conn = state.connection()?;
        state.service().propose_challenge(
            &mut conn,
            request.discipline.unwrap_or(Discipline::Singles),
            request.challenger_id,
            request.challenged_id,
        )
    });

    respond(StatusCode::CREATED, result)
}

pub async fn list_pending_challenges(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PendingQuery>,
) -> impl IntoResponse {
    let result = state
        .connection()
        .and_then(|conn| state.service().pending_challenges(&conn, params.discipline))
        .map(ListResponse::from);

    respond(StatusCode::OK, result)
}

pub async fn reject_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    close(&state, id, ChallengeStatus::Rejected)
}

pub async fn ignore_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    close(&state, id, ChallengeStatus::Ignored)
}

pub async fn cancel_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    close(&state, id, ChallengeStatus::Cancelled)
}

fn close(state: &AppState, id: i64, status: ChallengeStatus) -> axum::response::Response {
    let result = state.connection().and_then(|mut conn| {
        let service = state.service();
        match status {
            ChallengeStatus::Rejected => service.reject_challenge(&mut conn, id),
            ChallengeStatus::Ignored => service.ignore_challenge(&mut conn, id),
            _ => service.cancel_challenge(&mut conn, id),
        }
    });

    respond(StatusCode::OK, result)
}
