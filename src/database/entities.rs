use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{RankedEntity, get_parsed};
use crate::ladder::{Discipline, EntityId, Gender, Pool, Position};

/// Increments applied to one counter set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDeltas {
    pub emitted: i64,
    pub accepted: i64,
    pub won: i64,
    pub defended: i64,
    pub rejections: i64,
}

impl CounterDeltas {
    pub fn emitted() -> Self {
        Self {
            emitted: 1,
            ..Self::default()
        }
    }

    pub fn accepted() -> Self {
        Self {
            accepted: 1,
            ..Self::default()
        }
    }

    pub fn won() -> Self {
        Self {
            won: 1,
            ..Self::default()
        }
    }

    pub fn defended() -> Self {
        Self {
            defended: 1,
            ..Self::default()
        }
    }

    pub fn rejection() -> Self {
        Self {
            rejections: 1,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which counter columns a delta lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTarget {
    Player {
        id: EntityId,
        discipline: Discipline,
    },
    Team(EntityId),
}

impl CounterTarget {
    fn table_and_prefix(&self) -> (&'static str, &'static str) {
        match self {
            CounterTarget::Player {
                discipline: Discipline::Singles,
                ..
            } => ("players", "singles_"),
            CounterTarget::Player {
                discipline: Discipline::Doubles,
                ..
            } => ("players", "doubles_"),
            CounterTarget::Team(_) => ("teams", ""),
        }
    }

    fn id(&self) -> EntityId {
        match self {
            CounterTarget::Player { id, .. } | CounterTarget::Team(id) => *id,
        }
    }
}

fn select_sql(discipline: Discipline) -> &'static str {
    match discipline {
        Discipline::Singles => {
            "SELECT id, first_name || ' ' || last_name, initial_position, current_position, NULL, NULL FROM players"
        }
        Discipline::Doubles => {
            "SELECT id, team_name, initial_position, current_position, tournament_id, gender_category FROM teams"
        }
    }
}

fn parse_entity_row(row: &rusqlite::Row, discipline: Discipline) -> rusqlite::Result<RankedEntity> {
    let pool = match discipline {
        Discipline::Singles => Pool::Singles,
        Discipline::Doubles => Pool::Doubles {
            tournament_id: row.get(4)?,
            gender: get_parsed::<Gender>(row, 5)?,
        },
    };

    Ok(RankedEntity {
        id: row.get(0)?,
        name: row.get(1)?,
        pool,
        initial_position: row.get(2)?,
        current_position: row.get(3)?,
    })
}

pub fn find_entity(
    conn: &Connection,
    discipline: Discipline,
    id: EntityId,
) -> Result<Option<RankedEntity>> {
    let sql = format!("{} WHERE id = ?1", select_sql(discipline));

    conn.query_row(&sql, params![id], |row| parse_entity_row(row, discipline))
        .optional()
        .with_context(|| format!("Failed to query {discipline} entity by id"))
}

pub fn list_by_position(conn: &Connection, pool: Pool) -> Result<Vec<RankedEntity>> {
    let discipline = pool.discipline();
    let mut stmt;
    let rows = match pool {
        Pool::Singles => {
            stmt = conn.prepare(&format!(
                "{} ORDER BY current_position ASC",
                select_sql(discipline)
            ))?;
            stmt.query_map([], |row| parse_entity_row(row, discipline))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        }
        Pool::Doubles {
            tournament_id,
            gender,
        } => {
            stmt = conn.prepare(&format!(
                "{} WHERE tournament_id = ?1 AND gender_category = ?2 ORDER BY current_position ASC",
                select_sql(discipline)
            ))?;
            stmt.query_map(params![tournament_id, gender.as_str()], |row| {
                parse_entity_row(row, discipline)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        }
    };

    Ok(rows)
}

pub fn count_in_pool(conn: &Connection, pool: Pool) -> Result<i64> {
    match pool {
        Pool::Singles => conn.query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0)),
        Pool::Doubles {
            tournament_id,
            gender,
        } => conn.query_row(
            "SELECT COUNT(*) FROM teams WHERE tournament_id = ?1 AND gender_category = ?2",
            params![tournament_id, gender.as_str()],
            |row| row.get(0),
        ),
    }
    .context("Failed to count pool members")
}

pub fn max_position(conn: &Connection, pool: Pool) -> Result<Position> {
    match pool {
        Pool::Singles => conn.query_row(
            "SELECT COALESCE(MAX(current_position), 0) FROM players",
            [],
            |row| row.get(0),
        ),
        Pool::Doubles { tournament_id, gender } => conn.query_row(
            "SELECT COALESCE(MAX(current_position), 0) FROM teams WHERE tournament_id = ?1 AND gender_category = ?2",
            params![tournament_id, gender.as_str()],
            |row| row.get(0),
        ),
    }
    .context("Failed to read last pool position")
}

/// Compare-and-swap write of `current_position`.
///
/// Returns `false` when the row no longer holds `expected`.
pub fn update_position(
    conn: &Connection,
    discipline: Discipline,
    id: EntityId,
    expected: Position,
    new_position: Position,
) -> Result<bool> {
    let sql = format!(
        "UPDATE {} SET current_position = ?1 WHERE id = ?2 AND current_position = ?3",
        discipline.entity_table()
    );

    let changed = conn
        .execute(&sql, params![new_position, id, expected])
        .context("Failed to update position")?;
    Ok(changed == 1)
}

pub fn apply_counter_deltas(
    conn: &Connection,
    target: CounterTarget,
    deltas: &CounterDeltas,
) -> Result<()> {
    if deltas.is_empty() {
        return Ok(());
    }

    let (table, prefix) = target.table_and_prefix();
    let sql = format!(
        "UPDATE {table} SET \
         {prefix}challenges_emitted = {prefix}challenges_emitted + ?1, \
         {prefix}challenges_accepted = {prefix}challenges_accepted + ?2, \
         {prefix}challenges_won = {prefix}challenges_won + ?3, \
         {prefix}defenses_successful = {prefix}defenses_successful + ?4, \
         rejections_current_cycle = rejections_current_cycle + ?5, \
         rejections_total = rejections_total + ?5 \
         WHERE id = ?6"
    );

    conn.execute(
        &sql,
        params![
            deltas.emitted,
            deltas.accepted,
            deltas.won,
            deltas.defended,
            deltas.rejections,
            target.id()
        ],
    )
    .with_context(|| format!("Failed to update counters on {table}"))
    .map(|_| ())
}

/// Starts a new ranking period: current positions become the initial ones.
pub fn snapshot_initial_positions(conn: &Connection) -> Result<usize> {
    let players = conn
        .execute("UPDATE players SET initial_position = current_position", [])
        .context("Failed to snapshot player positions")?;
    let teams = conn
        .execute("UPDATE teams SET initial_position = current_position", [])
        .context("Failed to snapshot team positions")?;
    Ok(players + teams)
}
