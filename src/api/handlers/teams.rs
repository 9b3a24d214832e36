use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, parse_body, respond};
use crate::api::models::{CreateTeamRequest, ListResponse, TeamsQuery};
use crate::ladder::{Discipline, EntityId};
use crate::services::ladder::TournamentContext;

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeamsQuery>,
) -> impl IntoResponse {
    let result = state.connection().and_then(|conn| {
        let ctx = TournamentContext::resolve(&conn, Discipline::Doubles)?;
        state.service().doubles_standings(&conn, ctx, params.gender)
    });

    respond(StatusCode::OK, result.map(ListResponse::from))
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> impl IntoResponse {
    let result = parse_body(payload).and_then(|request| {
        let mut conn = state.connection()?;
        let ctx = TournamentContext::resolve(&conn, Discipline::Doubles)?;
        state.service().create_team(
            &mut conn,
            ctx,
            request.player1_id,
            request.player2_id,
            &request.team_name,
        )
    });

    respond(StatusCode::CREATED, result)
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<EntityId>,
) -> impl IntoResponse {
    let result = state
        .connection()
        .and_then(|conn| state.service().team_detail(&conn, team_id));

    respond(StatusCode::OK, result)
}
