use super::PreparedGame;
use crate::constants::{WITHOUT_CENTER_LABEL, WITH_CENTER_LABEL};
use serde::Serialize;

/// Scoring efficiency over a set of games, rounded half-to-even.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Efficiency {
    pub avg_pts_scored: Option<i64>,
    pub avg_pts_allowed: Option<i64>,
    pub net_rating: Option<i64>,
}

/// One `HAS_CENTER` group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterSplitSummary {
    pub has_center: bool,
    pub games_played: usize,
    pub wins: usize,
    pub avg_pts_scored: Option<f64>,
    pub avg_pts_allowed: Option<f64>,
    /// Percent, 0-100; `None` when no game in the group has a date
    pub win_rate: Option<f64>,
    pub net_rating: Option<f64>,
    pub label: &'static str,
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values.flatten().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn round_int(v: f64) -> i64 {
    v.round_ties_even() as i64
}

/// Fraction of games won; `None` for no games.
pub fn win_rate<'a, I>(games: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a PreparedGame>,
{
    let (wins, n) = games
        .into_iter()
        .fold((0usize, 0usize), |(w, n), g| (w + g.record.is_win() as usize, n + 1));
    (n > 0).then(|| wins as f64 / n as f64)
}

pub fn team_efficiency(games: &[&PreparedGame]) -> Efficiency {
    if games.is_empty() {
        return Efficiency::default();
    }
    let scored = mean(games.iter().map(|g| g.record.pts));
    let allowed = mean(games.iter().map(|g| g.pts_opp));
    Efficiency {
        avg_pts_scored: scored.map(round_int),
        avg_pts_allowed: allowed.map(round_int),
        net_rating: scored.zip(allowed).map(|(s, a)| round_int(s - a)),
    }
}

/// Per-group totals, `false` before `true`; groups with no games are omitted.
pub fn summarize_games(games: &[PreparedGame]) -> Vec<CenterSplitSummary> {
    [false, true]
        .into_iter()
        .filter_map(|flag| {
            let group: Vec<&PreparedGame> = games.iter().filter(|g| g.has_center == flag).collect();
            if group.is_empty() {
                return None;
            }
            let games_played = group.iter().filter(|g| !g.record.game_date.is_empty()).count();
            let wins = group.iter().filter(|g| g.record.is_win()).count();
            let avg_pts_scored = mean(group.iter().map(|g| g.record.pts));
            let avg_pts_allowed = mean(group.iter().map(|g| g.pts_opp));
            let win_rate = (games_played > 0).then(|| wins as f64 / games_played as f64 * 100.0);
            Some(CenterSplitSummary {
                has_center: flag,
                games_played,
                wins,
                avg_pts_scored,
                avg_pts_allowed,
                win_rate,
                net_rating: avg_pts_scored.zip(avg_pts_allowed).map(|(s, a)| s - a),
                label: if flag { WITH_CENTER_LABEL } else { WITHOUT_CENTER_LABEL },
            })
        })
        .collect()
}

/// `0.6` renders as `"60%"`.
pub fn fmt_pct(p: Option<f64>) -> String {
    match p {
        Some(p) if p.is_finite() => format!("{}%", round_int(p * 100.0)),
        _ => "N/A".to_string(),
    }
}
