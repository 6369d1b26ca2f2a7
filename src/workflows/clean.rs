use crate::center::normalize_game_id;
use crate::constants::{BOXSCORES_CSV, CLEANED_DIR, GAMES_CSV, PER_TEAM_DIR};
use crate::error::Result;
use crate::storage::{read_records_if_exists, write_records};
use crate::types::{BoxscoreRecord, GameRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Inputs skipped because they were missing, and every file written.
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    pub skipped: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
}

pub fn normalize_abbreviation(abbr: &str) -> String {
    abbr.trim().to_uppercase()
}

/// Missing ids sort after present ones.
fn cmp_team_id(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_games(games: &mut [GameRecord]) {
    for g in games.iter_mut() {
        g.team_abbreviation = normalize_abbreviation(&g.team_abbreviation);
    }
    // sort_by is stable, so equal keys keep their file order
    games.sort_by(|a, b| {
        cmp_team_id(a.team_id, b.team_id)
            .then_with(|| a.team_abbreviation.cmp(&b.team_abbreviation))
            .then_with(|| a.game_date.cmp(&b.game_date))
            .then_with(|| a.matchup.cmp(&b.matchup))
    });
}

pub fn sort_boxscores(rows: &mut Vec<BoxscoreRecord>) {
    for r in rows.iter_mut() {
        r.team_abbreviation = normalize_abbreviation(&r.team_abbreviation);
    }
    let mut keyed: Vec<(String, String, BoxscoreRecord)> = rows
        .drain(..)
        .map(|r| (r.player_name.trim().to_uppercase(), normalize_game_id(&r.game_id), r))
        .collect();
    keyed.sort_by(|(pa, ga, a), (pb, gb, b)| {
        cmp_team_id(a.team_id, b.team_id)
            .then_with(|| a.team_abbreviation.cmp(&b.team_abbreviation))
            .then_with(|| pa.cmp(pb))
            .then_with(|| ga.cmp(gb))
    });
    rows.extend(keyed.into_iter().map(|(_, _, r)| r));
}

/// Splits rows by team abbreviation; rows without one are left out.
fn by_team<T: Clone>(rows: &[T], abbr: impl Fn(&T) -> &str) -> BTreeMap<String, Vec<T>> {
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for row in rows {
        let key = abbr(row);
        if !key.is_empty() {
            groups.entry(key.to_string()).or_default().push(row.clone());
        }
    }
    groups
}

fn write_split<T: Serialize + Clone>(
    out: &mut CleanOutcome,
    data_dir: &Path,
    sorted_name: &str,
    suffix: &str,
    rows: &[T],
    abbr: impl Fn(&T) -> &str,
) -> Result<()> {
    let sorted_path = data_dir.join(CLEANED_DIR).join(sorted_name);
    write_records(&sorted_path, rows)?;
    out.written.push(sorted_path);

    for (team, sub) in by_team(rows, abbr) {
        let path = data_dir.join(PER_TEAM_DIR).join(format!("{}_{}.csv", team, suffix));
        write_records(&path, &sub)?;
        out.written.push(path);
    }
    Ok(())
}

pub fn clean_games(data_dir: &Path, out: &mut CleanOutcome) -> Result<()> {
    let src = data_dir.join(GAMES_CSV);
    let Some(mut games) = read_records_if_exists::<GameRecord, _>(&src)? else {
        info!("Skipping games (not found): {}", src.display());
        out.skipped.push(src);
        return Ok(());
    };
    sort_games(&mut games);
    write_split(out, data_dir, "games_sorted.csv", "games", &games, |g| g.team_abbreviation.as_str())
}

pub fn clean_boxscores(data_dir: &Path, out: &mut CleanOutcome) -> Result<()> {
    let src = data_dir.join(BOXSCORES_CSV);
    let Some(mut rows) = read_records_if_exists::<BoxscoreRecord, _>(&src)? else {
        info!("Skipping boxscores (not found): {}", src.display());
        out.skipped.push(src);
        return Ok(());
    };
    sort_boxscores(&mut rows);
    write_split(out, data_dir, "boxscores_sorted.csv", "boxscores", &rows, |r| r.team_abbreviation.as_str())
}

pub fn clean_all(data_dir: &Path) -> Result<CleanOutcome> {
    let mut out = CleanOutcome::default();
    clean_games(data_dir, &mut out)?;
    clean_boxscores(data_dir, &mut out)?;
    Ok(out)
}
