use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{Team, get_counters, get_parsed};
use crate::ladder::{EntityId, Gender, Position, TeamActivity};

const TEAM_COLUMNS: &str = "id, tournament_id, player1_id, player2_id, team_name, gender_category, \
    initial_position, current_position, \
    challenges_emitted, challenges_accepted, challenges_won, defenses_successful, \
    rejections_current_cycle, rejections_total, activity_index, activity_status, created_at";

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        player1_id: row.get(2)?,
        player2_id: row.get(3)?,
        team_name: row.get(4)?,
        gender: get_parsed(row, 5)?,
        initial_position: row.get(6)?,
        current_position: row.get(7)?,
        counters: get_counters(row, 8)?,
        rejections_current_cycle: row.get(12)?,
        rejections_total: row.get(13)?,
        activity_index: row.get(14)?,
        activity_status: get_parsed(row, 15)?,
        created_at: row.get(16)?,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn insert_team(
    conn: &Connection,
    tournament_id: i64,
    player1_id: EntityId,
    player2_id: EntityId,
    team_name: &str,
    gender: Gender,
    position: Position,
) -> Result<Team> {
    let sql = format!(
        "INSERT INTO teams (tournament_id, player1_id, player2_id, team_name, gender_category, initial_position, current_position) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING {TEAM_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament_id,
            player1_id,
            player2_id,
            team_name,
            gender.as_str(),
            position
        ],
        parse_team_row,
    )
    .context("Failed to insert new team")
}

pub fn find_by_id(conn: &Connection, id: EntityId) -> Result<Option<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

/// The team, if any, that `player_id` already belongs to within a tournament.
pub fn find_for_player(
    conn: &Connection,
    tournament_id: i64,
    player_id: EntityId,
) -> Result<Option<Team>> {
    let sql = format!(
        "SELECT {TEAM_COLUMNS} FROM teams WHERE tournament_id = ?1 AND (player1_id = ?2 OR player2_id = ?2)"
    );

    conn.query_row(&sql, params![tournament_id, player_id], parse_team_row)
        .optional()
        .context("Failed to query team by member")
}

pub fn list_ids_for_player(conn: &Connection, player_id: EntityId) -> Result<Vec<EntityId>> {
    let mut stmt = conn.prepare("SELECT id FROM teams WHERE player1_id = ?1 OR player2_id = ?1")?;
    let rows = stmt
        .query_map(params![player_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Teams of a tournament ordered by gender then position; `gender` narrows to one pool.
pub fn list_by_position(
    conn: &Connection,
    tournament_id: i64,
    gender: Option<Gender>,
) -> Result<Vec<Team>> {
    let sql = format!(
        "SELECT {TEAM_COLUMNS} FROM teams WHERE tournament_id = ?1 AND (?2 IS NULL OR gender_category = ?2) \
         ORDER BY gender_category ASC, current_position ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![tournament_id, gender.map(|g| g.as_str())],
            parse_team_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_ids(conn: &Connection) -> Result<Vec<EntityId>> {
    let mut stmt = conn.prepare("SELECT id FROM teams ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_activity(conn: &Connection, id: EntityId, activity: &TeamActivity) -> Result<()> {
    conn.execute(
        "UPDATE teams SET activity_index = ?1, activity_status = ?2 WHERE id = ?3",
        params![activity.doubles.index, activity.general.as_str(), id],
    )
    .context("Failed to update team activity")
    .map(|_| ())
}

pub fn reset_cycle_rejections(conn: &Connection) -> Result<usize> {
    conn.execute("UPDATE teams SET rejections_current_cycle = 0", [])
        .context("Failed to reset team rejections")
}
