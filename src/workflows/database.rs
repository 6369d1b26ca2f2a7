use crate::config::Config;
use crate::constants::DEFAULT_MIN_THREES;
use crate::error::{AnalyticsError, Result};
use crate::storage::read_records_if_exists;
use crate::storage::sqlite::{
    avg_minutes_by_role, open_database, player_threes_games, save_to_sqlite, top_scorers, RoleMinutes,
    ScorerTotal, ThreesGame,
};
use crate::types::{BoxscoreRecord, GameRecord};
use std::fmt;
use std::path::PathBuf;

/// Loads both CSVs into the SQLite database, replacing its tables.
pub fn export_to_sqlite(config: &Config) -> Result<PathBuf> {
    let games_path = config.games_csv();
    let box_path = config.boxscores_csv();
    let games: Vec<GameRecord> = read_records_if_exists(&games_path)?
        .ok_or_else(|| AnalyticsError::MissingInput(games_path.display().to_string()))?;
    let box_rows: Vec<BoxscoreRecord> = read_records_if_exists(&box_path)?
        .ok_or_else(|| AnalyticsError::MissingInput(box_path.display().to_string()))?;

    let db_path = config.sqlite_db();
    let mut conn = open_database(&db_path)?;
    save_to_sqlite(&mut conn, &games, &box_rows)?;
    Ok(db_path)
}

#[derive(Debug, Clone)]
pub struct QueryReport {
    pub top_scorers: Vec<ScorerTotal>,
    pub player: String,
    pub threes_games: Vec<ThreesGame>,
    pub minutes_by_role: Vec<RoleMinutes>,
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top {} scorers by total points:", self.top_scorers.len())?;
        for s in &self.top_scorers {
            writeln!(f, "  {:<28} {:>7.0}", s.player_name, s.total_pts)?;
        }
        writeln!(f, "\n{} games with >= 5 made threes:", self.player)?;
        for g in &self.threes_games {
            let pts = g.pts.map(|p| format!("{:.0}", p)).unwrap_or_else(|| "-".into());
            writeln!(f, "  {}  FG3M {:>2.0}  PTS {:>3}", g.game_id, g.fg3m, pts)?;
        }
        writeln!(f, "\nAverage minutes by role:")?;
        for r in &self.minutes_by_role {
            writeln!(f, "  {:<8} {:.2}", r.role, r.avg_min)?;
        }
        Ok(())
    }
}

pub fn run_example_queries(config: &Config, player: &str) -> Result<QueryReport> {
    let db_path = config.sqlite_db();
    if !db_path.exists() {
        return Err(AnalyticsError::MissingInput(db_path.display().to_string()));
    }
    let conn = open_database(&db_path)?;
    Ok(QueryReport {
        top_scorers: top_scorers(&conn, 10)?,
        player: player.to_string(),
        threes_games: player_threes_games(&conn, player, DEFAULT_MIN_THREES)?,
        minutes_by_role: avg_minutes_by_role(&conn)?,
    })
}
