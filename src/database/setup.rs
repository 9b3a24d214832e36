use anyhow::{Context, Result};
use rusqlite::Connection;

/// Creates missing tables and seeds the active tournaments. Safe to re-run.
pub fn init_database(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::info!("Database schema initialized");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};

    #[test]
    fn test_init_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();

        init_database(&conn).unwrap();
        init_database(&conn).unwrap();

        let tournaments: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM tournaments WHERE is_active = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        let cycles: i64 = conn
            .query_row("SELECT COUNT(*) FROM activity_cycles", [], |r| r.get(0))
            .unwrap();
        assert_eq!(tournaments, 2);
        assert_eq!(cycles, 1);
    }
}
