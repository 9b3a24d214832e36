use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use super::models::ActivityCycle;

pub fn insert_cycle(conn: &Connection, started_at: NaiveDateTime) -> Result<ActivityCycle> {
    conn.query_row(
        "INSERT INTO activity_cycles (started_at) VALUES (?1) RETURNING id, started_at",
        params![started_at],
        |row| {
            Ok(ActivityCycle {
                id: row.get(0)?,
                started_at: row.get(1)?,
            })
        },
    )
    .context("Failed to insert activity cycle")
}

pub fn latest(conn: &Connection) -> Result<Option<ActivityCycle>> {
    conn.query_row(
        "SELECT id, started_at FROM activity_cycles ORDER BY id DESC LIMIT 1",
        [],
        |row| {
            Ok(ActivityCycle {
                id: row.get(0)?,
                started_at: row.get(1)?,
            })
        },
    )
    .optional()
    .context("Failed to query latest activity cycle")
}
