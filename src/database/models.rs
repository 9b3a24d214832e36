use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::ladder::{
    ActivityCounters, ActivityStatus, ChallengeStatus, Discipline, EntityId, Gender, Pool, Position,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub category: Option<String>,
    pub initial_position: Position,
    pub current_position: Position,
    pub singles: ActivityCounters,
    pub doubles: ActivityCounters,
    pub rejections_current_cycle: i64,
    pub rejections_total: i64,
    pub activity_index_singles: i64,
    pub activity_status_singles: ActivityStatus,
    pub activity_index_doubles: i64,
    pub activity_status_doubles: ActivityStatus,
    pub activity_status: ActivityStatus,
    pub created_at: Option<NaiveDateTime>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: EntityId,
    pub tournament_id: i64,
    pub player1_id: EntityId,
    pub player2_id: EntityId,
    pub team_name: String,
    pub gender: Gender,
    pub initial_position: Position,
    pub current_position: Position,
    pub counters: ActivityCounters,
    pub rejections_current_cycle: i64,
    pub rejections_total: i64,
    pub activity_index: i64,
    pub activity_status: ActivityStatus,
    pub created_at: Option<NaiveDateTime>,
}

impl Team {
    pub fn members(&self) -> [EntityId; 2] {
        [self.player1_id, self.player2_id]
    }
}

/// Discipline-independent view of a ladder participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntity {
    pub id: EntityId,
    pub name: String,
    pub pool: Pool,
    pub initial_position: Position,
    pub current_position: Position,
}

impl RankedEntity {
    pub fn discipline(&self) -> Discipline {
        self.pool.discipline()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub discipline: Discipline,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: i64,
    pub discipline: Discipline,
    pub challenger_id: EntityId,
    pub challenged_id: EntityId,
    pub status: ChallengeStatus,
    pub created_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChallengeRow {
    pub id: i64,
    pub discipline: Discipline,
    pub challenger_id: EntityId,
    pub challenger_name: String,
    pub challenged_id: EntityId,
    pub challenged_name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub discipline: Discipline,
    pub challenge_id: Option<i64>,
    pub challenger_id: EntityId,
    pub challenged_id: EntityId,
    pub winner_id: EntityId,
    pub loser_id: EntityId,
    pub score_text: String,
    pub is_challenger_winner: bool,
    pub positions_swapped: bool,
    pub challenger_position_before: Position,
    pub challenged_position_before: Position,
    pub played_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Match {
    /// Positions this match left the two sides in, as (challenger, challenged).
    pub fn positions_after(&self) -> (Position, Position) {
        if self.positions_swapped {
            (
                self.challenged_position_before,
                self.challenger_position_before,
            )
        } else {
            (
                self.challenger_position_before,
                self.challenged_position_before,
            )
        }
    }
}

/// Fields written when a result is applied or re-applied.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub winner_id: EntityId,
    pub loser_id: EntityId,
    pub score_text: String,
    pub is_challenger_winner: bool,
    pub positions_swapped: bool,
    pub challenger_position_before: Position,
    pub challenged_position_before: Position,
}

// DTO for joined history queries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: i64,
    pub discipline: Discipline,
    pub played_at: NaiveDateTime,
    pub score_text: String,
    pub challenger_name: String,
    pub challenged_name: String,
    pub winner_name: String,
    pub loser_name: String,
    pub positions_swapped: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCycle {
    pub id: i64,
    pub started_at: NaiveDateTime,
}

/// Reads a TEXT column into one of the ladder's string-backed enums.
pub(crate) fn get_parsed<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

pub(crate) fn get_counters(
    row: &rusqlite::Row,
    first: usize,
) -> rusqlite::Result<ActivityCounters> {
    Ok(ActivityCounters {
        challenges_emitted: row.get(first)?,
        challenges_accepted: row.get(first + 1)?,
        challenges_won: row.get(first + 2)?,
        defenses_successful: row.get(first + 3)?,
    })
}
