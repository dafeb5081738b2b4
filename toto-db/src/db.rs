use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    date        TEXT PRIMARY KEY,
    number_1    INTEGER NOT NULL,
    number_2    INTEGER NOT NULL,
    number_3    INTEGER NOT NULL,
    number_4    INTEGER NOT NULL,
    number_5    INTEGER NOT NULL,
    number_6    INTEGER NOT NULL,
    additional  INTEGER NOT NULL
);
";

const SELECT_DRAW: &str =
    "SELECT date, number_1, number_2, number_3, number_4, number_5, number_6, additional FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("toto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (date, number_1, number_2, number_3, number_4, number_5, number_6, additional)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.additional,
        ],
    ).with_context(|| format!("Échec de l'insertion du tirage du {}", draw.date))?;
    Ok(changed > 0)
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        date: row.get(0)?,
        numbers: [
            row.get::<_, u8>(1)?,
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
        ],
        additional: row.get(7)?,
    })
}

/// Tirages du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_DRAW} ORDER BY date DESC LIMIT ?1"))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let n = count_draws(conn)?;
    fetch_last_draws(conn, n)
}

pub fn fetch_draw_by_date(conn: &Connection, date: &str) -> Result<Option<Draw>> {
    let draw = conn
        .query_row(&format!("{SELECT_DRAW} WHERE date = ?1"), [date], row_to_draw)
        .optional()
        .with_context(|| format!("Échec de la lecture du tirage du {}", date))?;
    Ok(draw)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(date: &str) -> Draw {
        Draw {
            date: date.to_string(),
            numbers: [1, 5, 31, 34, 38, 45],
            additional: 21,
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("2025-10-31")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, &test_draw("2025-10-31")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("2025-10-31")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = memory_db();

        insert_draw(&conn, &test_draw("2025-10-24")).unwrap();
        insert_draw(&conn, &test_draw("2025-10-31")).unwrap();
        insert_draw(&conn, &test_draw("2025-10-27")).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date, "2025-10-31");
        assert_eq!(draws[1].date, "2025-10-27");
        assert_eq!(draws[2].date, "2025-10-24");

        let last = fetch_last_draws(&conn, 1).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].date, "2025-10-31");
    }

    #[test]
    fn test_roundtrip_numbers() {
        let conn = memory_db();
        let draw = test_draw("2025-10-31");
        insert_draw(&conn, &draw).unwrap();

        let all = fetch_all_draws(&conn).unwrap();
        assert_eq!(all, vec![draw]);
    }

    #[test]
    fn test_fetch_by_date() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw("2025-10-31")).unwrap();

        assert!(fetch_draw_by_date(&conn, "2025-10-31").unwrap().is_some());
        assert!(fetch_draw_by_date(&conn, "2025-01-01").unwrap().is_none());
    }
}
