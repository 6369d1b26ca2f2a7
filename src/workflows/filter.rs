use crate::center::normalize_game_id;
use crate::constants::{
    BENCH_CSV, BENCH_MAX_MINUTES, BENCH_MIN_MINUTES, BOXSCORES_CSV, DEFAULT_MIN_THREES,
    DEFAULT_THREES_PLAYER, GAMES_CSV, THREES_CSV,
};
use crate::error::Result;
use crate::storage::{read_records_if_exists, write_records};
use crate::types::{BoxscoreRecord, GameRecord};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub player: String,
    pub min_threes: f64,
    pub bench_min_minutes: f64,
    pub bench_max_minutes: f64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            player: DEFAULT_THREES_PLAYER.to_string(),
            min_threes: DEFAULT_MIN_THREES,
            bench_min_minutes: BENCH_MIN_MINUTES,
            bench_max_minutes: BENCH_MAX_MINUTES,
        }
    }
}

pub fn home_away_counts(games: &[GameRecord]) -> (usize, usize) {
    let home = games.iter().filter(|g| g.is_home()).count();
    let away = games.iter().filter(|g| g.is_away()).count();
    (home, away)
}

/// Rows for `player` with at least `min_threes` made threes.
pub fn player_threes(box_rows: &[BoxscoreRecord], player: &str, min_threes: f64) -> Vec<BoxscoreRecord> {
    box_rows
        .iter()
        .filter(|r| r.player_name == player && r.fg3m.is_some_and(|m| m >= min_threes))
        .cloned()
        .collect()
}

pub fn distinct_games(rows: &[BoxscoreRecord]) -> usize {
    rows.iter().map(|r| normalize_game_id(&r.game_id)).collect::<HashSet<_>>().len()
}

/// Non-starters whose minutes fall in `[lo, hi]`.
pub fn bench_in_minutes(box_rows: &[BoxscoreRecord], lo: f64, hi: f64) -> Vec<BoxscoreRecord> {
    box_rows
        .iter()
        .filter(|r| !r.is_starter())
        .filter(|r| {
            let m = r.minutes();
            m >= lo && m <= hi
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub home_away: Option<(usize, usize)>,
    pub player: String,
    pub min_threes: f64,
    pub threes_games: Option<usize>,
    pub bench_rows: Option<usize>,
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.home_away {
            Some((home, away)) => writeln!(f, "Home Games: {} Away Games: {}", home, away)?,
            None => writeln!(f, "Skipping games (not found)")?,
        }
        match (self.threes_games, self.bench_rows) {
            (Some(threes), Some(bench)) => {
                writeln!(f, "{} games with >={} threes: {}", self.player, self.min_threes, threes)?;
                write!(f, "Bench rows in minute range: {}", bench)
            }
            _ => write!(f, "Skipping boxscores (not found)"),
        }
    }
}

/// Runs every filter over the CSVs in `data_dir`; missing inputs are skipped.
pub fn run_filters(data_dir: &Path, options: &FilterOptions) -> Result<FilterReport> {
    let mut report = FilterReport {
        player: options.player.clone(),
        min_threes: options.min_threes,
        ..Default::default()
    };

    if let Some(games) = read_records_if_exists::<GameRecord, _>(data_dir.join(GAMES_CSV))? {
        report.home_away = Some(home_away_counts(&games));
    } else {
        info!("Skipping games (not found)");
    }

    if let Some(box_rows) = read_records_if_exists::<BoxscoreRecord, _>(data_dir.join(BOXSCORES_CSV))? {
        let threes = player_threes(&box_rows, &options.player, options.min_threes);
        report.threes_games = Some(distinct_games(&threes));
        write_records(data_dir.join(THREES_CSV), &threes)?;

        let bench = bench_in_minutes(&box_rows, options.bench_min_minutes, options.bench_max_minutes);
        report.bench_rows = Some(bench.len());
        write_records(data_dir.join(BENCH_CSV), &bench)?;
    } else {
        info!("Skipping boxscores (not found)");
    }

    Ok(report)
}
