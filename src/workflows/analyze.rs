use crate::center::summary::{fmt_pct, summarize_games, team_efficiency, win_rate, CenterSplitSummary, Efficiency};
use crate::center::{run_pipeline, PipelineOptions, PipelineOutput, PreparedGame};
use crate::config::Config;
use crate::constants::CENTER_SUMMARY_CSV;
use crate::error::{AnalyticsError, Result};
use crate::storage::{read_records_if_exists, write_records};
use crate::types::{BoxscoreRecord, GameRecord};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Per-game breakdown written for notebooks and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CenterImpactRow {
    pub game_date: String,
    pub matchup: String,
    pub wl: Option<String>,
    pub pts: Option<f64>,
    pub pts_opp: Option<f64>,
    pub plus_minus: Option<f64>,
    pub has_center: bool,
}

impl From<&PreparedGame> for CenterImpactRow {
    fn from(g: &PreparedGame) -> Self {
        Self {
            game_date: g.record.game_date.clone(),
            matchup: g.record.matchup.clone(),
            wl: g.record.wl.clone(),
            pts: g.record.pts,
            pts_opp: g.pts_opp,
            plus_minus: g.record.plus_minus,
            has_center: g.has_center,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CenterImpactReport {
    pub recognized_centers: Vec<String>,
    pub games_with: usize,
    pub games_without: usize,
    pub win_rate_with: Option<f64>,
    pub win_rate_without: Option<f64>,
    pub efficiency_with: Efficiency,
    pub efficiency_without: Efficiency,
    pub summary: Vec<CenterSplitSummary>,
    pub rows: Vec<CenterImpactRow>,
}

pub fn build_report(output: &PipelineOutput) -> CenterImpactReport {
    let (with, without) = output.split_by_center();
    CenterImpactReport {
        recognized_centers: output.allowed_traditional.iter().cloned().collect(),
        games_with: with.len(),
        games_without: without.len(),
        win_rate_with: win_rate(with.iter().copied()),
        win_rate_without: win_rate(without.iter().copied()),
        efficiency_with: team_efficiency(&with),
        efficiency_without: team_efficiency(&without),
        summary: summarize_games(&output.games),
        rows: output.games.iter().map(CenterImpactRow::from).collect(),
    }
}

fn or_na(v: Option<i64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn write_efficiency(f: &mut fmt::Formatter<'_>, heading: &str, eff: &Efficiency) -> fmt::Result {
    writeln!(f, "\nEfficiency {}:", heading)?;
    writeln!(f, "  Avg Points Scored : {}", or_na(eff.avg_pts_scored))?;
    writeln!(f, "  Avg Points Allowed: {}", or_na(eff.avg_pts_allowed))?;
    writeln!(f, "  Net Rating        : {}", or_na(eff.net_rating))
}

impl fmt::Display for CenterImpactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recognized_centers.is_empty() {
            writeln!(f, "Recognized traditional centers from data: None")?;
        } else {
            writeln!(f, "Recognized traditional centers from data: {}", self.recognized_centers.join(", "))?;
        }
        writeln!(f, "Games WITH a traditional center: {}", self.games_with)?;
        writeln!(f, "Games WITHOUT a traditional center: {}", self.games_without)?;
        writeln!(f, "Win rate WITH a traditional center: {}", fmt_pct(self.win_rate_with))?;
        writeln!(f, "Win rate WITHOUT a traditional center: {}", fmt_pct(self.win_rate_without))?;
        write_efficiency(f, "WITH traditional center", &self.efficiency_with)?;
        write_efficiency(f, "WITHOUT traditional center", &self.efficiency_without)?;

        writeln!(f, "\n{:<28} {:>6} {:>5} {:>9} {:>9}", "Split", "Games", "Wins", "Win %", "Net")?;
        for s in &self.summary {
            let net = s.net_rating.map(|n| format!("{:+.1}", n)).unwrap_or_else(|| "N/A".into());
            let pct = s.win_rate.map(|w| format!("{:.1}%", w)).unwrap_or_else(|| "N/A".into());
            writeln!(f, "{:<28} {:>6} {:>5} {:>9} {:>9}", s.label, s.games_played, s.wins, pct, net)?;
        }
        Ok(())
    }
}

fn require<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_records_if_exists(path)?.ok_or_else(|| AnalyticsError::MissingInput(path.display().to_string()))
}

/// Loads both CSVs, labels every game, and writes the per-game breakdown.
pub fn analyze_center_impact(config: &Config) -> Result<(CenterImpactReport, PathBuf)> {
    let games: Vec<GameRecord> = require(&config.games_csv())?;
    let box_rows: Vec<BoxscoreRecord> = require(&config.boxscores_csv())?;
    info!("Loaded {} games and {} boxscore rows", games.len(), box_rows.len());

    let output = run_pipeline(games, box_rows, &PipelineOptions::from_config(config));
    let report = build_report(&output);

    let out_path = config.data_dir.join(CENTER_SUMMARY_CSV);
    write_records(&out_path, &report.rows)?;
    Ok((report, out_path))
}
