use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    admin::{new_period, reset_cycle},
    challenges::{
        cancel_challenge, ignore_challenge, list_pending_challenges, propose_challenge,
        reject_challenge, validate_challenge,
    },
    matches::{delete_match, edit_match, get_match, submit_result},
    players::{create_player, get_player, get_player_history, list_players},
    teams::{create_team, get_team, list_teams},
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(list_players).post(create_player))
        .route("/api/players/:id", get(get_player))
        .route("/api/players/:id/history", get(get_player_history))
        .route("/api/teams", get(list_teams).post(create_team))
        .route("/api/teams/:id", get(get_team))
        .route("/api/challenges", post(propose_challenge))
        .route("/api/challenges/validate", post(validate_challenge))
        .route("/api/challenges/pending", get(list_pending_challenges))
        .route("/api/challenges/:id/reject", post(reject_challenge))
        .route("/api/challenges/:id/ignore", post(ignore_challenge))
        .route("/api/challenges/:id/cancel", post(cancel_challenge))
        .route("/api/matches", post(submit_result))
        .route(
            "/api/matches/:id",
            get(get_match).put(edit_match).delete(delete_match),
        )
        .route("/api/admin/reset-cycle", post(reset_cycle))
        .route("/api/admin/new-period", post(new_period))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::settings::AppConfig;
    use crate::database::{create_memory_pool, get_connection, setup::init_database};

    fn test_router() -> Router {
        let pool = create_memory_pool().unwrap();
        {
            let conn = get_connection(&pool).unwrap();
            init_database(&conn).unwrap();
        }
        create_router(Arc::new(AppState::new(pool, AppConfig::new())))
    }

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(value) => Body::from(value.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn seed_players(router: &Router, n: usize) -> Vec<i64> {
        let mut ids = Vec::new();
        for i in 1..=n {
            let (status, body) = call(
                router,
                Method::POST,
                "/api/players",
                Some(json!({
                    "firstName": format!("Player{i}"),
                    "lastName": "Api",
                    "email": format!("p{i}@ladder.test"),
                    "gender": "female",
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            ids.push(body["id"].as_i64().unwrap());
        }
        ids
    }

    #[tokio::test]
    async fn test_standings_are_ordered_by_position() {
        let router = test_router();
        let ids = seed_players(&router, 3).await;

        let (status, body) = call(&router, Method::GET, "/api/players", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["items"][0]["id"].as_i64().unwrap(), ids[0]);
        assert_eq!(body["items"][2]["currentPosition"], 3);
        assert_eq!(body["items"][0]["activityStatus"], "red");
    }

    #[tokio::test]
    async fn test_challenge_then_result_flow() {
        let router = test_router();
        let ids = seed_players(&router, 6).await;

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/challenges/validate",
            Some(json!({ "challengerId": ids[4], "challengedId": ids[0] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/challenges",
            Some(json!({ "challengerId": ids[4], "challengedId": ids[0] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "rule_violation");

        let (status, challenge) = call(
            &router,
            Method::POST,
            "/api/challenges",
            Some(json!({ "challengerId": ids[4], "challengedId": ids[2] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            &router,
            Method::GET,
            "/api/challenges/pending?discipline=singles",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let (status, report) = call(
            &router,
            Method::POST,
            "/api/matches",
            Some(json!({
                "challengerId": ids[4],
                "challengedId": ids[2],
                "sets": [[6, 4], [3, 6], [6, 2]],
                "challengeId": challenge["id"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(report["match"]["positionsSwapped"], true);
        assert_eq!(report["outcome"]["newChallengerPosition"], 3);

        let match_uri = format!("/api/matches/{}", report["match"]["id"]);
        let (status, detail) = call(&router, Method::GET, &match_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["sets"], json!([[6, 4], [3, 6], [6, 2]]));

        let history_uri = format!("/api/players/{}/history", ids[2]);
        let (status, history) = call(&router, Method::GET, &history_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["total"], 1);
    }

    #[tokio::test]
    async fn test_bad_scores_are_validation_errors() {
        let router = test_router();
        let ids = seed_players(&router, 3).await;

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/matches",
            Some(json!({ "challengerId": ids[2], "challengedId": ids[1], "sets": [[6, 4]] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, _) = call(
            &router,
            Method::POST,
            "/api/matches",
            Some(json!({ "challengerId": ids[2], "challengedId": ids[1], "sets": [[-1, 6], [6, 0]] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_and_delete_match() {
        let router = test_router();
        let ids = seed_players(&router, 4).await;

        let (_, report) = call(
            &router,
            Method::POST,
            "/api/matches",
            Some(
                json!({ "challengerId": ids[3], "challengedId": ids[2], "sets": [[6, 1], [6, 1]] }),
            ),
        )
        .await;
        let match_uri = format!("/api/matches/{}", report["match"]["id"]);

        let (status, edited) = call(
            &router,
            Method::PUT,
            &match_uri,
            Some(json!({ "sets": [[1, 6], [1, 6]] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["match"]["positionsSwapped"], false);

        let (status, _) = call(&router, Method::DELETE, &match_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&router, Method::GET, &match_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_teams_and_conflicts() {
        let router = test_router();
        let ids = seed_players(&router, 3).await;

        let (status, team) = call(
            &router,
            Method::POST,
            "/api/teams",
            Some(json!({ "player1Id": ids[0], "player2Id": ids[1], "teamName": "Baseline" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(team["currentPosition"], 1);

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/teams",
            Some(json!({ "player1Id": ids[1], "player2Id": ids[2], "teamName": "Volley" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");

        let (status, body) = call(&router, Method::GET, "/api/teams?gender=female", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["teamName"], "Baseline");
    }

    #[tokio::test]
    async fn test_admin_endpoints_and_challenge_transitions() {
        let router = test_router();
        let ids = seed_players(&router, 5).await;

        let (_, challenge) = call(
            &router,
            Method::POST,
            "/api/challenges",
            Some(json!({ "challengerId": ids[4], "challengedId": ids[3] })),
        )
        .await;
        let reject_uri = format!("/api/challenges/{}/reject", challenge["id"]);
        let (status, body) = call(&router, Method::POST, &reject_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "rejected");

        let (status, _) = call(&router, Method::POST, &reject_uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(&router, Method::POST, "/api/admin/reset-cycle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playersReset"], 5);

        let (status, body) = call(&router, Method::POST, "/api/admin/new-period", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entitiesUpdated"], 5);

        let (status, _) = call(&router, Method::GET, "/api/players/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
