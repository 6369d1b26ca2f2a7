use crate::constants::*;
use crate::error::{AnalyticsError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub season: String,
    pub team_abbr: String,
    /// Team the analysis pipeline filters boxscores by
    pub team_id: i64,
    pub data_dir: PathBuf,
    pub http: HttpConfig,
    pub center: CenterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub retries: u32,
    pub base_delay_ms: u64,
    pub cache_enabled: bool,
    pub cache_ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    pub exclude_small_ball: BTreeSet<String>,
    pub include_traditional: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            team_abbr: DEFAULT_TEAM_ABBR.to_string(),
            team_id: DEFAULT_TEAM_ID,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http: HttpConfig::default(),
            center: CenterConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retries: DEFAULT_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            cache_enabled: true,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            exclude_small_ball: EXCLUDE_SMALL_BALL_DEFAULT.iter().map(|s| s.to_string()).collect(),
            include_traditional: INCLUDE_TRADITIONAL_DEFAULT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Config {
    /// Loads `config.toml` from the working directory if present, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyticsError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overrides from `SEASON`, `TEAM_ABBR`, `TEAM_ID` and `DATA_DIR`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(season) = lookup("SEASON") {
            self.season = season;
        }
        if let Some(abbr) = lookup("TEAM_ABBR") {
            self.team_abbr = abbr;
        }
        if let Some(team_id) = lookup("TEAM_ID") {
            self.team_id = team_id.trim().parse().map_err(|_| {
                AnalyticsError::Config(format!("TEAM_ID must be an integer, got '{}'", team_id))
            })?;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn games_csv(&self) -> PathBuf {
        self.data_dir.join(GAMES_CSV)
    }

    pub fn boxscores_csv(&self) -> PathBuf {
        self.data_dir.join(BOXSCORES_CSV)
    }

    pub fn sqlite_db(&self) -> PathBuf {
        self.data_dir.join(SQLITE_DB)
    }

    pub fn http_cache_db(&self) -> PathBuf {
        self.data_dir.join(HTTP_CACHE_DB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::from_file("does/not/exist.toml").unwrap();
        assert_eq!(config.season, "2024-25");
        assert_eq!(config.team_id, 1610612744);
        assert_eq!(config.http.retries, 5);
        assert!(config.center.exclude_small_ball.contains("DRAYMOND GREEN"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
season = "2023-24"

[http]
retries = 2

[center]
include_traditional = ["JAMES WISEMAN"]
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.season, "2023-24");
        assert_eq!(config.team_abbr, "GSW");
        assert_eq!(config.http.retries, 2);
        assert_eq!(config.http.base_delay_ms, 1200);
        assert_eq!(config.center.include_traditional.len(), 1);
        assert!(config.center.exclude_small_ball.contains("DRAYMOND GREEN"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            [("SEASON", "2022-23"), ("TEAM_ID", "1610612747"), ("DATA_DIR", "/tmp/nba")].into();
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.season, "2022-23");
        assert_eq!(config.team_id, 1610612747);
        assert_eq!(config.games_csv(), PathBuf::from("/tmp/nba/gsw_games.csv"));
    }

    #[test]
    fn test_bad_team_id_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(|k| (k == "TEAM_ID").then(|| "warriors".to_string()))
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }
}
