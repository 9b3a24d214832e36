use serde::{Deserialize, Serialize};

use crate::database::NewPlayer;
use crate::ladder::{Discipline, EntityId, Gender, Position, SetScore};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResponse {
    pub entities_updated: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub category: Option<String>,
    pub position: Option<Position>,
}

impl CreatePlayerRequest {
    pub fn to_new_player(&self) -> NewPlayer {
        NewPlayer {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            gender: self.gender,
            category: self.category.clone().filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub player1_id: EntityId,
    pub player2_id: EntityId,
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    pub discipline: Option<Discipline>,
    pub challenger_id: EntityId,
    pub challenged_id: EntityId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub discipline: Option<Discipline>,
    pub challenger_id: EntityId,
    pub challenged_id: EntityId,
    pub sets: Vec<SetScore>,
    pub challenge_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMatchRequest {
    pub sets: Vec<SetScore>,
}

#[derive(Debug, Deserialize)]
pub struct TeamsQuery {
    pub gender: Option<Gender>,
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub discipline: Option<Discipline>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}
