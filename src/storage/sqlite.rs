use crate::error::Result;
use crate::types::{BoxscoreRecord, GameRecord};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

pub const GAMES_TABLE: &str = "games";
pub const BOXSCORES_TABLE: &str = "boxscores";

pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Connection> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}

/// Empty strings are stored as NULL, matching how blank CSV cells load.
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) if s.is_empty() => SqlValue::Null,
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn row_values<T: Serialize>(record: &T, columns: &[&str]) -> Result<Vec<SqlValue>> {
    let value = serde_json::to_value(record)?;
    Ok(columns
        .iter()
        .map(|c| value.get(*c).map(to_sql_value).unwrap_or(SqlValue::Null))
        .collect())
}

fn quoted(columns: &[&str]) -> String {
    columns.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ")
}

/// Drops and recreates `table`, then inserts every row.
fn replace_table(
    conn: &Connection,
    table: &str,
    columns: &[&str],
    rows: impl Iterator<Item = Result<Vec<SqlValue>>>,
) -> Result<usize> {
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS \"{table}\"; CREATE TABLE \"{table}\" ({});",
        quoted(columns)
    ))?;
    let placeholders = (1..=columns.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ");
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO \"{table}\" ({}) VALUES ({})",
        quoted(columns),
        placeholders
    ))?;
    let mut count = 0;
    for values in rows {
        stmt.execute(params_from_iter(values?))?;
        count += 1;
    }
    Ok(count)
}

/// Writes the `games` and `boxscores` tables (replacing them) plus the two
/// lookup indexes. Boxscores gain a numeric `MIN_float` column.
pub fn save_to_sqlite(conn: &mut Connection, games: &[GameRecord], box_rows: &[BoxscoreRecord]) -> Result<()> {
    let tx = conn.transaction()?;

    let n_games = replace_table(
        &tx,
        GAMES_TABLE,
        GameRecord::COLUMNS,
        games.iter().map(|g| row_values(g, GameRecord::COLUMNS)),
    )?;

    let mut box_columns = BoxscoreRecord::COLUMNS.to_vec();
    box_columns.push("MIN_float");
    let n_box = replace_table(
        &tx,
        BOXSCORES_TABLE,
        &box_columns,
        box_rows.iter().map(|b| {
            let mut values = row_values(b, BoxscoreRecord::COLUMNS)?;
            values.push(SqlValue::Real(b.minutes()));
            Ok(values)
        }),
    )?;

    tx.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_box_game ON boxscores (GAME_ID);
        CREATE INDEX IF NOT EXISTS idx_box_player ON boxscores (PLAYER_NAME);
        "#,
    )?;
    tx.commit()?;

    info!("Wrote {} games and {} boxscore rows", n_games, n_box);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorerTotal {
    pub player_name: String,
    pub total_pts: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreesGame {
    pub game_id: String,
    pub player_name: String,
    pub fg3m: f64,
    pub pts: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleMinutes {
    pub role: String,
    pub avg_min: f64,
}

pub fn top_scorers(conn: &Connection, limit: usize) -> Result<Vec<ScorerTotal>> {
    let mut stmt = conn.prepare(
        "SELECT PLAYER_NAME, SUM(PTS) AS total_pts
         FROM boxscores
         GROUP BY PLAYER_NAME
         ORDER BY total_pts DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(ScorerTotal {
            player_name: row.get(0)?,
            total_pts: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn player_threes_games(conn: &Connection, player: &str, min_threes: f64) -> Result<Vec<ThreesGame>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT GAME_ID, PLAYER_NAME, FG3M, PTS
         FROM boxscores
         WHERE PLAYER_NAME = ?1 AND FG3M >= ?2
         ORDER BY GAME_ID",
    )?;
    let rows = stmt.query_map(params![player, min_threes], |row| {
        Ok(ThreesGame {
            game_id: row.get(0)?,
            player_name: row.get(1)?,
            fg3m: row.get(2)?,
            pts: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn avg_minutes_by_role(conn: &Connection) -> Result<Vec<RoleMinutes>> {
    let mut stmt = conn.prepare(
        "SELECT CASE WHEN START_POSITION IS NULL THEN 'Bench' ELSE 'Starter' END AS role,
                ROUND(AVG(MIN_float), 2) AS avg_min
         FROM boxscores
         GROUP BY role",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RoleMinutes {
            role: row.get(0)?,
            avg_min: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
