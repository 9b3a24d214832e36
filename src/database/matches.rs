use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{Match, MatchResult, MatchSummary, get_parsed};
use crate::ladder::{Discipline, EntityId};

const MATCH_COLUMNS: &str = "id, discipline, challenge_id, challenger_id, challenged_id, winner_id, loser_id, \
    score_text, is_challenger_winner, positions_swapped, \
    challenger_position_before, challenged_position_before, played_at, updated_at";

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        discipline: get_parsed(row, 1)?,
        challenge_id: row.get(2)?,
        challenger_id: row.get(3)?,
        challenged_id: row.get(4)?,
        winner_id: row.get(5)?,
        loser_id: row.get(6)?,
        score_text: row.get(7)?,
        is_challenger_winner: row.get(8)?,
        positions_swapped: row.get(9)?,
        challenger_position_before: row.get(10)?,
        challenged_position_before: row.get(11)?,
        played_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn insert_match(
    conn: &Connection,
    discipline: Discipline,
    challenge_id: Option<i64>,
    challenger_id: EntityId,
    challenged_id: EntityId,
    result: &MatchResult,
    played_at: NaiveDateTime,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (discipline, challenge_id, challenger_id, challenged_id, winner_id, loser_id, \
         score_text, is_challenger_winner, positions_swapped, challenger_position_before, \
         challenged_position_before, played_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            discipline.as_str(),
            challenge_id,
            challenger_id,
            challenged_id,
            result.winner_id,
            result.loser_id,
            result.score_text,
            result.is_challenger_winner,
            result.positions_swapped,
            result.challenger_position_before,
            result.challenged_position_before,
            played_at
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn update_result(
    conn: &Connection,
    id: i64,
    result: &MatchResult,
    updated_at: NaiveDateTime,
) -> Result<Match> {
    let sql = format!(
        "UPDATE matches SET winner_id = ?1, loser_id = ?2, score_text = ?3, is_challenger_winner = ?4, \
         positions_swapped = ?5, challenger_position_before = ?6, challenged_position_before = ?7, \
         updated_at = ?8 WHERE id = ?9 RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            result.winner_id,
            result.loser_id,
            result.score_text,
            result.is_challenger_winner,
            result.positions_swapped,
            result.challenger_position_before,
            result.challenged_position_before,
            updated_at,
            id
        ],
        parse_match_row,
    )
    .context("Failed to update match result")
}

pub fn delete_match(conn: &Connection, id: i64) -> Result<bool> {
    let changed = conn
        .execute("DELETE FROM matches WHERE id = ?1", params![id])
        .context("Failed to delete match")?;
    Ok(changed == 1)
}

/// Singles matches of the player plus doubles matches of any team they belong to, newest first.
pub fn list_for_player(
    conn: &Connection,
    player_id: EntityId,
    limit: i64,
) -> Result<Vec<MatchSummary>> {
    let sql = "
        SELECT m.id, m.discipline, m.played_at, m.score_text,
               pc.first_name || ' ' || pc.last_name,
               pd.first_name || ' ' || pd.last_name,
               pw.first_name || ' ' || pw.last_name,
               pl.first_name || ' ' || pl.last_name,
               m.positions_swapped
        FROM matches m
        JOIN players pc ON pc.id = m.challenger_id
        JOIN players pd ON pd.id = m.challenged_id
        JOIN players pw ON pw.id = m.winner_id
        JOIN players pl ON pl.id = m.loser_id
        WHERE m.discipline = 'singles' AND (m.challenger_id = ?1 OR m.challenged_id = ?1)
        UNION ALL
        SELECT m.id, m.discipline, m.played_at, m.score_text,
               tc.team_name, td.team_name, tw.team_name, tl.team_name,
               m.positions_swapped
        FROM matches m
        JOIN teams tc ON tc.id = m.challenger_id
        JOIN teams td ON td.id = m.challenged_id
        JOIN teams tw ON tw.id = m.winner_id
        JOIN teams tl ON tl.id = m.loser_id
        WHERE m.discipline = 'doubles'
          AND (tc.player1_id = ?1 OR tc.player2_id = ?1 OR td.player1_id = ?1 OR td.player2_id = ?1)
        ORDER BY 3 DESC, 1 DESC
        LIMIT ?2
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id, limit], |row| {
            Ok(MatchSummary {
                id: row.get(0)?,
                discipline: get_parsed(row, 1)?,
                played_at: row.get(2)?,
                score_text: row.get(3)?,
                challenger_name: row.get(4)?,
                challenged_name: row.get(5)?,
                winner_name: row.get(6)?,
                loser_name: row.get(7)?,
                positions_swapped: row.get(8)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
