use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{NewPlayer, Player, get_counters, get_parsed};
use crate::ladder::{EntityId, PlayerActivity, Position};

const PLAYER_COLUMNS: &str = "id, first_name, last_name, email, gender, category, \
    initial_position, current_position, \
    singles_challenges_emitted, singles_challenges_accepted, singles_challenges_won, singles_defenses_successful, \
    doubles_challenges_emitted, doubles_challenges_accepted, doubles_challenges_won, doubles_defenses_successful, \
    rejections_current_cycle, rejections_total, \
    activity_index_singles, activity_status_singles, activity_index_doubles, activity_status_doubles, \
    activity_status, created_at";

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        gender: get_parsed(row, 4)?,
        category: row.get(5)?,
        initial_position: row.get(6)?,
        current_position: row.get(7)?,
        singles: get_counters(row, 8)?,
        doubles: get_counters(row, 12)?,
        rejections_current_cycle: row.get(16)?,
        rejections_total: row.get(17)?,
        activity_index_singles: row.get(18)?,
        activity_status_singles: get_parsed(row, 19)?,
        activity_index_doubles: row.get(20)?,
        activity_status_doubles: get_parsed(row, 21)?,
        activity_status: get_parsed(row, 22)?,
        created_at: row.get(23)?,
    })
}

pub fn insert_player(conn: &Connection, player: &NewPlayer, position: Position) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (first_name, last_name, email, gender, category, initial_position, current_position) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            player.first_name,
            player.last_name,
            player.email,
            player.gender.as_str(),
            player.category,
            position
        ],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

/// Moves every player at or below `position` one place down the ladder.
pub fn shift_down_from(conn: &Connection, position: Position) -> Result<usize> {
    conn.execute(
        "UPDATE players SET current_position = current_position + 1 WHERE current_position >= ?1",
        params![position],
    )
    .context("Failed to shift player positions")
}

pub fn find_by_id(conn: &Connection, id: EntityId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE email = ?1");

    conn.query_row(&sql, params![email], parse_player_row)
        .optional()
        .context("Failed to query player by email")
}

pub fn list_by_position(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY current_position ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
        .context("Failed to count players")
}

pub fn list_ids(conn: &Connection) -> Result<Vec<EntityId>> {
    let mut stmt = conn.prepare("SELECT id FROM players ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_activity(conn: &Connection, id: EntityId, activity: &PlayerActivity) -> Result<()> {
    conn.execute(
        "UPDATE players SET activity_index_singles = ?1, activity_status_singles = ?2, \
         activity_index_doubles = ?3, activity_status_doubles = ?4, activity_status = ?5 WHERE id = ?6",
        params![
            activity.singles.index,
            activity.singles.status.as_str(),
            activity.doubles.index,
            activity.doubles.status.as_str(),
            activity.general.as_str(),
            id
        ],
    )
    .context("Failed to update player activity")
    .map(|_| ())
}

pub fn reset_cycle_rejections(conn: &Connection) -> Result<usize> {
    conn.execute("UPDATE players SET rejections_current_cycle = 0", [])
        .context("Failed to reset player rejections")
}
