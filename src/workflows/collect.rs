use crate::apis::StatsApi;
use crate::center::normalize_game_id;
use crate::config::{Config, HttpConfig};
use crate::error::{AnalyticsError, Result};
use crate::storage::{read_records_if_exists, write_records};
use crate::teams;
use crate::types::{BoxscoreRecord, GameRecord};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Fixed delay before every attempt plus linear backoff after each failure.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(http: &HttpConfig) -> Self {
        Self { retries: http.retries.max(1), base_delay: http.base_delay() }
    }

    /// Sleep after failed `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt * 3) / 2
    }
}

/// `"22024"` becomes `"2024-25"`; non-numeric ids pass through.
pub fn normalize_season_id(season_id: &str) -> String {
    if season_id.is_empty() || !season_id.chars().all(|c| c.is_ascii_digit()) {
        return season_id.to_string();
    }
    let tail = &season_id[season_id.len().saturating_sub(4)..];
    let Ok(year) = tail.parse::<u32>() else {
        return season_id.to_string();
    };
    let next = (year + 1).to_string();
    format!("{}-{}", year, &next[next.len().saturating_sub(2)..])
}

/// Fills `SEASON_DISPLAY`, keeps `season` only and orders by date.
pub fn games_for_season(mut games: Vec<GameRecord>, season: &str) -> Vec<GameRecord> {
    if games.iter().any(|g| g.season_id.is_some()) {
        for g in &mut games {
            g.season_display = g.season_id.as_deref().map(normalize_season_id);
        }
        games.retain(|g| g.season_display.as_deref() == Some(season));
    }
    games.sort_by(|a, b| a.game_date.cmp(&b.game_date));
    games
}

#[instrument(skip(api, policy))]
pub fn fetch_boxscore_with_retry<A: StatsApi + ?Sized>(
    api: &A,
    game_id: &str,
    policy: &RetryPolicy,
) -> Result<Vec<BoxscoreRecord>> {
    let mut last_err = None;
    for attempt in 1..=policy.retries {
        // Polite delay to stay under the rate limit
        thread::sleep(policy.base_delay);
        match api.boxscore_traditional(game_id) {
            Ok(mut rows) => {
                for row in &mut rows {
                    row.game_id = game_id.to_string();
                }
                return Ok(rows);
            }
            Err(e) => {
                warn!("attempt {}/{} failed: {}", attempt, policy.retries, e);
                last_err = Some(e);
                thread::sleep(policy.backoff(attempt));
            }
        }
    }
    Err(AnalyticsError::FetchFailed {
        game_id: game_id.to_string(),
        attempts: policy.retries,
        source: Box::new(last_err.unwrap_or_else(|| AnalyticsError::Api {
            message: "no attempts were made".to_string(),
        })),
    })
}

/// Fetches sequentially into `rows`. The first game that exhausts its retries
/// stops the loop; rows fetched before it stay in `rows`.
pub fn fetch_boxscores<A: StatsApi + ?Sized>(
    api: &A,
    game_ids: &[String],
    policy: &RetryPolicy,
    rows: &mut Vec<BoxscoreRecord>,
) -> Result<()> {
    for (i, gid) in game_ids.iter().enumerate() {
        rows.extend(fetch_boxscore_with_retry(api, gid, policy)?);
        if (i + 1) % 10 == 0 {
            info!("Fetched {}/{} boxscores", i + 1, game_ids.len());
        }
    }
    Ok(())
}

/// Drops repeated (game, player) rows, keeping the last occurrence in place.
pub fn dedupe_keep_last(rows: Vec<BoxscoreRecord>) -> Vec<BoxscoreRecord> {
    let mut seen = HashSet::new();
    let mut kept: Vec<BoxscoreRecord> = rows
        .into_iter()
        .rev()
        .filter(|r| seen.insert((normalize_game_id(&r.game_id), r.player_id)))
        .collect();
    kept.reverse();
    kept
}

#[derive(Debug, Clone)]
pub struct CollectSummary {
    pub team_id: i64,
    pub season: String,
    pub games_saved: usize,
    pub games_path: PathBuf,
    pub already_on_disk: usize,
    pub fetched: usize,
    pub boxscore_rows: usize,
    pub boxscores_path: PathBuf,
}

impl fmt::Display for CollectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved {} games to {}", self.games_saved, self.games_path.display())?;
        if self.already_on_disk > 0 {
            writeln!(f, "Resuming: found {} boxscores already on disk", self.already_on_disk)?;
        }
        writeln!(f, "Fetched {} remaining boxscores", self.fetched)?;
        write!(f, "Saved {} boxscore rows to {}", self.boxscore_rows, self.boxscores_path.display())
    }
}

/// Writes the season's games, then every boxscore not already on disk.
pub fn collect<A: StatsApi + ?Sized>(api: &A, config: &Config) -> Result<CollectSummary> {
    std::fs::create_dir_all(&config.data_dir)?;
    let policy = RetryPolicy::from_config(&config.http);

    let team_id = teams::get_team_id(&config.team_abbr)?;
    let games = games_for_season(api.league_game_finder(team_id)?, &config.season);
    let games_path = config.games_csv();
    write_records(&games_path, &games)?;

    let mut game_ids: Vec<String> = Vec::new();
    for g in &games {
        if !game_ids.contains(&g.game_id) {
            game_ids.push(g.game_id.clone());
        }
    }

    let boxscores_path = config.boxscores_csv();
    let existing: Vec<BoxscoreRecord> = read_records_if_exists(&boxscores_path)?.unwrap_or_default();
    let already: HashSet<String> = existing.iter().map(|r| normalize_game_id(&r.game_id)).collect();
    if !already.is_empty() {
        info!("Resuming: found {} boxscores already on disk", already.len());
    }

    let remaining: Vec<String> = game_ids
        .into_iter()
        .filter(|g| !already.contains(&normalize_game_id(g)))
        .collect();
    info!("Fetching {} remaining boxscores", remaining.len());

    let boxscore_rows = if remaining.is_empty() {
        existing.len()
    } else {
        let mut new_rows = Vec::new();
        let fetched = fetch_boxscores(api, &remaining, &policy, &mut new_rows);
        let fetched_any = !new_rows.is_empty();
        let total = if fetched_any {
            let merged = if existing.is_empty() {
                new_rows
            } else {
                let mut all = existing;
                all.extend(new_rows);
                dedupe_keep_last(all)
            };
            write_records(&boxscores_path, &merged)?;
            merged.len()
        } else {
            existing.len()
        };
        if let Err(e) = fetched {
            if fetched_any {
                warn!("Saved {} boxscore rows before stopping; rerun to resume", total);
            }
            return Err(e);
        }
        total
    };

    Ok(CollectSummary {
        team_id,
        season: config.season.clone(),
        games_saved: games.len(),
        games_path,
        already_on_disk: already.len(),
        fetched: remaining.len(),
        boxscore_rows,
        boxscores_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_season_id() {
        assert_eq!(normalize_season_id("22024"), "2024-25");
        assert_eq!(normalize_season_id("41999"), "1999-00");
        assert_eq!(normalize_season_id("2024-25"), "2024-25");
        assert_eq!(normalize_season_id(""), "");
    }

    #[test]
    fn test_games_for_season_filters_and_sorts() {
        let g = |sid: &str, id: &str, date: &str| GameRecord {
            season_id: Some(sid.into()),
            game_id: id.into(),
            game_date: date.into(),
            ..Default::default()
        };
        let games = vec![
            g("22024", "0022400077", "2024-10-25"),
            g("22023", "0022300001", "2023-10-24"),
            g("22024", "0022400061", "2024-10-23"),
            g("42024", "0042400101", "2025-04-20"),
        ];
        let kept = games_for_season(games, "2024-25");
        let ids: Vec<&str> = kept.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["0022400061", "0022400077", "0042400101"]);
        assert_eq!(kept[0].season_display.as_deref(), Some("2024-25"));
    }

    #[test]
    fn test_backoff_grows_linearly() {
        let p = RetryPolicy { retries: 5, base_delay: Duration::from_millis(1200) };
        assert_eq!(p.backoff(1), Duration::from_millis(1800));
        assert_eq!(p.backoff(2), Duration::from_millis(3600));
    }

    #[test]
    fn test_dedupe_keeps_last() {
        let row = |gid: &str, pid: i64, pts: f64| BoxscoreRecord {
            game_id: gid.into(),
            player_id: Some(pid),
            pts: Some(pts),
            ..Default::default()
        };
        let rows = vec![row("0022400061", 1, 10.0), row("0022400061", 2, 5.0), row("22400061", 1, 12.0)];
        let out = dedupe_keep_last(rows);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].player_id, Some(2));
        assert_eq!(out[1].pts, Some(12.0));
    }
}
