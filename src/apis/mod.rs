pub mod http_cache;
pub mod nba_stats;
pub mod result_set;

pub use http_cache::ResponseCache;
pub use nba_stats::{NbaStatsClient, StatsApi};
