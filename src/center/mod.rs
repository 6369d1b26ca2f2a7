//! Shared data preparation for the center-impact analysis.
//!
//! Games and boxscores are joined on the normalized game id, the team's
//! boxscore rows are scanned for players who started at center, and each game
//! is labelled by whether a traditional center started it.

pub mod summary;

use crate::config::{CenterConfig, Config};
use crate::constants::{
    DEFAULT_TEAM_ID, EXCLUDE_SMALL_BALL_DEFAULT, INCLUDE_TRADITIONAL_DEFAULT, PLAYOFFS, REGULAR_SEASON,
};
use crate::types::{BoxscoreRecord, GameRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

static CENTER_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bC\b").expect("valid regex"));

/// A game after normalization, carrying the derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGame {
    pub record: GameRecord,
    pub gid_norm: String,
    pub pts_opp: Option<f64>,
    pub has_center: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBoxscore {
    pub record: BoxscoreRecord,
    pub gid_norm: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterStarter {
    pub gid_norm: String,
    pub player_name: String,
    pub player_name_norm: String,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub team_id: i64,
    pub exclude_small_ball: BTreeSet<String>,
    pub include_traditional: BTreeSet<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TEAM_ID, &CenterConfig::default())
    }
}

impl PipelineOptions {
    /// Empty name lists fall back to the built-in defaults.
    pub fn new(team_id: i64, center: &CenterConfig) -> Self {
        let or_default = |set: &BTreeSet<String>, default: &[&str]| {
            if set.is_empty() {
                default.iter().map(|s| s.to_string()).collect()
            } else {
                set.clone()
            }
        };
        Self {
            team_id,
            exclude_small_ball: or_default(&center.exclude_small_ball, EXCLUDE_SMALL_BALL_DEFAULT),
            include_traditional: or_default(&center.include_traditional, INCLUDE_TRADITIONAL_DEFAULT),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.team_id, &config.center)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub games: Vec<PreparedGame>,
    pub team_boxscores: Vec<PreparedBoxscore>,
    pub center_starters: Vec<CenterStarter>,
    pub allowed_traditional: BTreeSet<String>,
}

impl PipelineOutput {
    pub fn split_by_center(&self) -> (Vec<&PreparedGame>, Vec<&PreparedGame>) {
        self.games.iter().partition(|g| g.has_center)
    }
}

/// `"0022400061"` and `"22400061"` name the same game.
pub fn normalize_game_id(game_id: &str) -> String {
    game_id.trim_start_matches('0').to_string()
}

/// `PTS - PLUS_MINUS`, absent when either side is.
pub fn points_allowed(game: &GameRecord) -> Option<f64> {
    Some(game.pts? - game.plus_minus?)
}

pub fn prepare_games(games: Vec<GameRecord>) -> Vec<PreparedGame> {
    games
        .into_iter()
        .map(|record| PreparedGame {
            gid_norm: normalize_game_id(&record.game_id),
            pts_opp: points_allowed(&record),
            has_center: false,
            record,
        })
        .collect()
}

pub fn prepare_boxscores(box_rows: Vec<BoxscoreRecord>) -> Vec<PreparedBoxscore> {
    box_rows
        .into_iter()
        .map(|mut record| {
            if record.start_position.is_none() {
                record.start_position = Some(String::new());
            }
            PreparedBoxscore { gid_norm: normalize_game_id(&record.game_id), record }
        })
        .collect()
}

/// Keeps regular season and playoff games. Uses `SEASON_TYPE` when any game
/// carries it, otherwise the game id prefix (2 = regular season, 4 = playoffs).
pub fn filter_regular_season_and_playoffs(games: Vec<PreparedGame>) -> Vec<PreparedGame> {
    let has_season_type = games.iter().any(|g| g.record.season_type.is_some());
    games
        .into_iter()
        .filter(|g| {
            if has_season_type {
                matches!(g.record.season_type.as_deref(), Some(REGULAR_SEASON) | Some(PLAYOFFS))
            } else {
                g.gid_norm.starts_with('2') || g.gid_norm.starts_with('4')
            }
        })
        .collect()
}

/// Rows for `team_id` that belong to one of `games`.
pub fn build_team_boxscores(
    box_rows: Vec<PreparedBoxscore>,
    games: &[PreparedGame],
    team_id: i64,
) -> Vec<PreparedBoxscore> {
    let valid: HashSet<&str> = games.iter().map(|g| g.gid_norm.as_str()).collect();
    box_rows
        .into_iter()
        .filter(|b| b.record.team_id == Some(team_id) && valid.contains(b.gid_norm.as_str()))
        .collect()
}

pub fn is_center_slot(start_position: &str) -> bool {
    let pos = start_position.trim().to_uppercase();
    CENTER_SLOT.is_match(&pos) || pos.starts_with('C') || pos.ends_with('C')
}

pub fn detect_center_starters(team_box: &[PreparedBoxscore]) -> Vec<CenterStarter> {
    team_box
        .iter()
        .filter(|b| is_center_slot(b.record.start_position()))
        .map(|b| CenterStarter {
            gid_norm: b.gid_norm.clone(),
            player_name: b.record.player_name.clone(),
            player_name_norm: b.record.player_name.trim().to_uppercase(),
        })
        .collect()
}

/// `(detected - exclude) | include`, all compared upper-cased.
pub fn build_allowed_traditional_set(
    starters: &[CenterStarter],
    exclude_small_ball: &BTreeSet<String>,
    include_traditional: &BTreeSet<String>,
) -> BTreeSet<String> {
    let exclude: HashSet<String> = exclude_small_ball.iter().map(|n| n.to_uppercase()).collect();
    starters
        .iter()
        .map(|s| s.player_name_norm.clone())
        .filter(|n| !exclude.contains(n))
        .chain(include_traditional.iter().map(|n| n.to_uppercase()))
        .collect()
}

/// Flags each game in which an allowed name started at center.
pub fn label_has_traditional_center(
    games: &mut [PreparedGame],
    starters: &[CenterStarter],
    allowed: &BTreeSet<String>,
) {
    let allowed_games: HashSet<&str> = starters
        .iter()
        .filter(|s| allowed.contains(&s.player_name_norm))
        .map(|s| s.gid_norm.as_str())
        .collect();
    for game in games.iter_mut() {
        game.has_center = allowed_games.contains(game.gid_norm.as_str());
    }
}

/// Runs normalization, filtering, center detection and labelling in order.
pub fn run_pipeline(
    games: Vec<GameRecord>,
    box_rows: Vec<BoxscoreRecord>,
    options: &PipelineOptions,
) -> PipelineOutput {
    let games = filter_regular_season_and_playoffs(prepare_games(games));
    let box_rows = prepare_boxscores(box_rows);
    let team_boxscores = build_team_boxscores(box_rows, &games, options.team_id);
    debug!("{} boxscore rows for team {}", team_boxscores.len(), options.team_id);

    let center_starters = detect_center_starters(&team_boxscores);
    let allowed_traditional = build_allowed_traditional_set(
        &center_starters,
        &options.exclude_small_ball,
        &options.include_traditional,
    );

    let mut games = games;
    label_has_traditional_center(&mut games, &center_starters, &allowed_traditional);
    info!(
        "Labelled {} games, {} with a traditional center",
        games.len(),
        games.iter().filter(|g| g.has_center).count()
    );

    PipelineOutput { games, team_boxscores, center_starters, allowed_traditional }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn game(id: &str, wl: &str, pts: f64, plus_minus: f64) -> GameRecord {
        GameRecord {
            game_id: id.into(),
            game_date: "2024-11-01".into(),
            matchup: "GSW vs. LAL".into(),
            wl: Some(wl.into()),
            pts: Some(pts),
            plus_minus: Some(plus_minus),
            team_id: Some(DEFAULT_TEAM_ID),
            ..Default::default()
        }
    }

    pub fn starter(game_id: &str, team_id: i64, name: &str, pos: Option<&str>) -> BoxscoreRecord {
        BoxscoreRecord {
            game_id: game_id.into(),
            team_id: Some(team_id),
            player_name: name.into(),
            start_position: pos.map(String::from),
            ..Default::default()
        }
    }
}
