use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{Tournament, get_parsed};
use crate::ladder::Discipline;

const TOURNAMENT_COLUMNS: &str = "id, name, discipline, is_active, created_at";

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        discipline: get_parsed(row, 2)?,
        is_active: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// The tournament new teams and doubles standings are scoped to.
pub fn find_active(conn: &Connection, discipline: Discipline) -> Result<Option<Tournament>> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE discipline = ?1 AND is_active = 1 \
         ORDER BY id DESC LIMIT 1"
    );

    conn.query_row(&sql, params![discipline.as_str()], parse_tournament_row)
        .optional()
        .context("Failed to query active tournament")
}
