//! Defaults shared by the collection and analysis workflows.

pub const DEFAULT_SEASON: &str = "2024-25";
pub const DEFAULT_TEAM_ABBR: &str = "GSW";
/// Golden State Warriors
pub const DEFAULT_TEAM_ID: i64 = 1610612744;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const CONFIG_FILE: &str = "config.toml";

// Players who start at C but play small ball
pub const EXCLUDE_SMALL_BALL_DEFAULT: &[&str] = &["DRAYMOND GREEN"];
pub const INCLUDE_TRADITIONAL_DEFAULT: &[&str] = &["KEVON LOONEY", "TRAYCE JACKSON-DAVIS"];

// File names under the data directory
pub const GAMES_CSV: &str = "gsw_games.csv";
pub const BOXSCORES_CSV: &str = "gsw_boxscores.csv";
pub const SQLITE_DB: &str = "gsw.db";
pub const HTTP_CACHE_DB: &str = "nba_cache.sqlite";
pub const CENTER_SUMMARY_CSV: &str = "center_impact_summary.csv";
pub const THREES_CSV: &str = "curry_5plus_threes.csv";
pub const BENCH_CSV: &str = "bench_15to24.csv";
pub const CLEANED_DIR: &str = "cleaned";
pub const PER_TEAM_DIR: &str = "teams";

// NBA stats API
pub const NBA_STATS_BASE_URL: &str = "https://stats.nba.com/stats/";
pub const LEAGUE_GAME_FINDER_ENDPOINT: &str = "leaguegamefinder";
pub const BOXSCORE_TRADITIONAL_ENDPOINT: &str = "boxscoretraditionalv2";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 90;
pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1200;
pub const DEFAULT_CACHE_TTL_SECONDS: i64 = 86_400;

// Season types carried by SEASON_TYPE when present
pub const REGULAR_SEASON: &str = "Regular Season";
pub const PLAYOFFS: &str = "Playoffs";

pub const WITH_CENTER_LABEL: &str = "With Traditional Center";
pub const WITHOUT_CENTER_LABEL: &str = "Without Traditional Center";

// Filter defaults
pub const DEFAULT_THREES_PLAYER: &str = "Stephen Curry";
pub const DEFAULT_MIN_THREES: f64 = 5.0;
pub const BENCH_MIN_MINUTES: f64 = 15.0;
pub const BENCH_MAX_MINUTES: f64 = 24.0;
