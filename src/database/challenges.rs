use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{Challenge, PendingChallengeRow, get_parsed};
use crate::ladder::{ChallengeStatus, Discipline, EntityId};

const CHALLENGE_COLUMNS: &str =
    "id, discipline, challenger_id, challenged_id, status, created_at, resolved_at";

fn parse_challenge_row(row: &rusqlite::Row) -> rusqlite::Result<Challenge> {
    Ok(Challenge {
        id: row.get(0)?,
        discipline: get_parsed(row, 1)?,
        challenger_id: row.get(2)?,
        challenged_id: row.get(3)?,
        status: get_parsed(row, 4)?,
        created_at: row.get(5)?,
        resolved_at: row.get(6)?,
    })
}

pub fn insert_challenge(
    conn: &Connection,
    discipline: Discipline,
    challenger_id: EntityId,
    challenged_id: EntityId,
) -> Result<Challenge> {
    let sql = format!(
        "INSERT INTO challenges (discipline, challenger_id, challenged_id, status) \
         VALUES (?1, ?2, ?3, 'pending') RETURNING {CHALLENGE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![discipline.as_str(), challenger_id, challenged_id],
        parse_challenge_row,
    )
    .context("Failed to insert challenge")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Challenge>> {
    let sql = format!("SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_challenge_row)
        .optional()
        .context("Failed to query challenge by id")
}

/// A pending challenge between the two entities, in either direction.
pub fn find_pending_between(
    conn: &Connection,
    discipline: Discipline,
    first: EntityId,
    second: EntityId,
) -> Result<Option<Challenge>> {
    let sql = format!(
        "SELECT {CHALLENGE_COLUMNS} FROM challenges \
         WHERE discipline = ?1 AND status = 'pending' \
         AND ((challenger_id = ?2 AND challenged_id = ?3) OR (challenger_id = ?3 AND challenged_id = ?2)) \
         ORDER BY id LIMIT 1"
    );

    conn.query_row(
        &sql,
        params![discipline.as_str(), first, second],
        parse_challenge_row,
    )
    .optional()
    .context("Failed to query pending challenge")
}

/// Moves a pending challenge to a terminal status.
///
/// Returns `false` when the challenge was no longer pending.
pub fn resolve(
    conn: &Connection,
    id: i64,
    status: ChallengeStatus,
    resolved_at: NaiveDateTime,
) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE challenges SET status = ?1, resolved_at = ?2 WHERE id = ?3 AND status = 'pending'",
            params![status.as_str(), resolved_at, id],
        )
        .context("Failed to update challenge status")?;

    Ok(changed == 1)
}

pub fn list_pending(
    conn: &Connection,
    discipline: Option<Discipline>,
) -> Result<Vec<PendingChallengeRow>> {
    let sql = "
        SELECT c.id, c.discipline, c.challenger_id,
               CASE c.discipline WHEN 'singles' THEN pa.first_name || ' ' || pa.last_name ELSE ta.team_name END,
               c.challenged_id,
               CASE c.discipline WHEN 'singles' THEN pb.first_name || ' ' || pb.last_name ELSE tb.team_name END,
               c.created_at
        FROM challenges c
        LEFT JOIN players pa ON c.discipline = 'singles' AND pa.id = c.challenger_id
        LEFT JOIN players pb ON c.discipline = 'singles' AND pb.id = c.challenged_id
        LEFT JOIN teams ta ON c.discipline = 'doubles' AND ta.id = c.challenger_id
        LEFT JOIN teams tb ON c.discipline = 'doubles' AND tb.id = c.challenged_id
        WHERE c.status = 'pending' AND (?1 IS NULL OR c.discipline = ?1)
        ORDER BY c.created_at ASC, c.id ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![discipline.map(|d| d.as_str())], |row| {
            Ok(PendingChallengeRow {
                id: row.get(0)?,
                discipline: get_parsed(row, 1)?,
                challenger_id: row.get(2)?,
                challenger_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                challenged_id: row.get(4)?,
                challenged_name: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                created_at: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
