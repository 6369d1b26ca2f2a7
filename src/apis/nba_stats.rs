use crate::apis::http_cache::ResponseCache;
use crate::apis::result_set::decode_result_set;
use crate::config::HttpConfig;
use crate::constants::{
    BOXSCORE_TRADITIONAL_ENDPOINT, LEAGUE_GAME_FINDER_ENDPOINT, NBA_STATS_BASE_URL,
};
use crate::error::{AnalyticsError, Result};
use crate::types::{BoxscoreRecord, GameRecord};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// The two endpoints the collection workflow needs.
pub trait StatsApi {
    /// Every game the team has on record, across seasons.
    fn league_game_finder(&self, team_id: i64) -> Result<Vec<GameRecord>>;

    /// Player rows of the traditional boxscore. Empty when the endpoint has none.
    fn boxscore_traditional(&self, game_id: &str) -> Result<Vec<BoxscoreRecord>>;
}

/// Blocking client for `stats.nba.com`.
pub struct NbaStatsClient {
    client: Client,
    base_url: String,
    cache: Option<ResponseCache>,
}

fn stats_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
        ),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    // The endpoint stalls without these
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    headers
}

pub fn build_url(base_url: &str, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
    let base = format!("{}{}", base_url, endpoint);
    let url = Url::parse_with_params(&base, params).map_err(|e| AnalyticsError::Api {
        message: format!("Invalid URL '{}': {}", base, e),
    })?;
    Ok(url.to_string())
}

pub fn league_game_finder_params(team_id: i64) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("PlayerOrTeam", "T".to_string()),
        ("TeamID", team_id.to_string()),
    ];
    // Unused filters must still be sent, empty
    for key in [
        "Conference", "DateFrom", "DateTo", "Division", "DraftNumber", "DraftRound",
        "DraftTeamID", "DraftYear", "GameID", "LeagueID", "Location", "Outcome", "PORound",
        "PlayerID", "RookieYear", "Season", "SeasonSegment", "SeasonType", "StarterBench",
        "VsConference", "VsDivision", "VsTeamID", "YearsExperience",
    ] {
        params.push((key, String::new()));
    }
    params
}

pub fn boxscore_params(game_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("GameID", game_id.to_string()),
        ("StartPeriod", "0".to_string()),
        ("EndPeriod", "0".to_string()),
        ("StartRange", "0".to_string()),
        ("EndRange", "0".to_string()),
        ("RangeType", "0".to_string()),
    ]
}

impl NbaStatsClient {
    pub fn new(http: &HttpConfig, cache: Option<ResponseCache>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(stats_headers())
            .timeout(http.timeout())
            .gzip(true)
            .build()?;
        Ok(Self { client, base_url: NBA_STATS_BASE_URL.to_string(), cache })
    }

    /// Points the client at another host; the endpoint name is appended to `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[instrument(skip(self, params))]
    fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = build_url(&self.base_url, endpoint, params)?;
        let now = chrono::Utc::now().timestamp();

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&url, now)? {
                debug!("cache hit");
                return Ok(serde_json::from_str(&body)?);
            }
        }

        debug!("GET {}", url);
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        let value: Value = serde_json::from_str(&body)?;

        // Only well-formed payloads are cached
        if let Some(cache) = &self.cache {
            cache.put(&url, &body, now)?;
        }
        Ok(value)
    }
}

impl StatsApi for NbaStatsClient {
    fn league_game_finder(&self, team_id: i64) -> Result<Vec<GameRecord>> {
        let payload = self.get_json(LEAGUE_GAME_FINDER_ENDPOINT, &league_game_finder_params(team_id))?;
        let games: Vec<GameRecord> = decode_result_set(&payload, 0)?;
        info!("Game finder returned {} rows for team {}", games.len(), team_id);
        Ok(games)
    }

    fn boxscore_traditional(&self, game_id: &str) -> Result<Vec<BoxscoreRecord>> {
        let payload = self.get_json(BOXSCORE_TRADITIONAL_ENDPOINT, &boxscore_params(game_id))?;
        let mut rows: Vec<BoxscoreRecord> = decode_result_set(&payload, 0)?;
        for row in &mut rows {
            row.game_id = game_id.to_string();
        }
        Ok(rows)
    }
}
