use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Input file not found: {0}")]
    MissingInput(String),

    #[error("Team {0} not found")]
    TeamNotFound(String),

    #[error("Failed to fetch boxscore for GAME_ID={game_id} after {attempts} attempts")]
    FetchFailed {
        game_id: String,
        attempts: u32,
        #[source]
        source: Box<AnalyticsError>,
    },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
