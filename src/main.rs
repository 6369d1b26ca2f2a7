use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use gsw_analytics::apis::{NbaStatsClient, ResponseCache};
use gsw_analytics::config::Config;
use gsw_analytics::constants::{DEFAULT_MIN_THREES, DEFAULT_THREES_PLAYER};
use gsw_analytics::logging;
use gsw_analytics::workflows::{self, FilterOptions};

#[derive(Parser)]
#[command(name = "gsw_analytics")]
#[command(about = "Basketball stats collector and center-impact analysis")]
#[command(version = "0.1.0")]
struct Cli {
    /// Directory holding the CSV and SQLite files (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the season's games and boxscores to CSV (resumable)
    Collect {
        /// Season as displayed, e.g. 2024-25 (overrides SEASON)
        #[arg(long)]
        season: Option<String>,
        /// Team abbreviation (overrides TEAM_ABBR)
        #[arg(long)]
        team: Option<String>,
        /// Always hit the network
        #[arg(long)]
        no_cache: bool,
    },
    /// Normalize team columns and write sorted + per-team CSVs
    Clean,
    /// Home/away counts, made-threes and bench-minutes filters
    Filter {
        #[arg(long, default_value = DEFAULT_THREES_PLAYER)]
        player: String,
        #[arg(long, default_value_t = DEFAULT_MIN_THREES)]
        min_threes: f64,
    },
    /// Load both CSVs into SQLite
    SaveSqlite,
    /// Run the example queries against the SQLite database
    Query {
        #[arg(long, default_value = DEFAULT_THREES_PLAYER)]
        player: String,
    },
    /// Win rate and efficiency with and without a traditional center
    Analyze {
        /// Team whose boxscores are scanned (overrides TEAM_ID)
        #[arg(long)]
        team_id: Option<i64>,
    },
    /// Collect, then analyze
    Run {
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        no_cache: bool,
    },
}

fn run_collect(config: &Config, no_cache: bool) -> anyhow::Result<()> {
    let cache = if config.http.cache_enabled && !no_cache {
        let cache = ResponseCache::open(config.http_cache_db(), config.http.cache_ttl_seconds)?;
        let purged = cache.purge_expired(chrono::Utc::now().timestamp())?;
        if purged > 0 {
            info!("Purged {} expired cache entries", purged);
        }
        Some(cache)
    } else {
        None
    };
    let client = NbaStatsClient::new(&config.http, cache)?;

    info!(season = %config.season, team = %config.team_abbr, "Starting collection");
    let summary = workflows::collect(&client, config)
        .with_context(|| format!("collecting {} {}", config.team_abbr, config.season))?;
    println!("{}", summary);
    Ok(())
}

fn run_analyze(config: &Config) -> anyhow::Result<()> {
    let (report, out_path) = workflows::analyze_center_impact(config)?;
    println!("{}", report);
    println!("\nSaved detailed breakdown to {}", out_path.display());
    Ok(())
}

fn dispatch(command: Commands, mut config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Collect { season, team, no_cache } => {
            if let Some(season) = season {
                config.season = season;
            }
            if let Some(team) = team {
                config.team_abbr = team;
            }
            run_collect(&config, no_cache)
        }
        Commands::Clean => {
            let out = workflows::clean_all(&config.data_dir)?;
            for path in &out.skipped {
                println!("Skipping (not found): {}", path.display());
            }
            for path in &out.written {
                println!("Saved: {}", path.display());
            }
            println!("\nDone.");
            Ok(())
        }
        Commands::Filter { player, min_threes } => {
            let options = FilterOptions { player, min_threes, ..Default::default() };
            let report = workflows::run_filters(&config.data_dir, &options)?;
            println!("{}", report);
            println!("Saved filtered files in {}", config.data_dir.display());
            Ok(())
        }
        Commands::SaveSqlite => {
            let db_path = workflows::export_to_sqlite(&config)?;
            println!("Wrote {} with tables: games, boxscores", db_path.display());
            Ok(())
        }
        Commands::Query { player } => {
            let report = workflows::run_example_queries(&config, &player)?;
            println!("{}", report);
            Ok(())
        }
        Commands::Analyze { team_id } => {
            if let Some(team_id) = team_id {
                config.team_id = team_id;
            }
            run_analyze(&config)
        }
        Commands::Run { season, no_cache } => {
            if let Some(season) = season {
                config.season = season;
            }
            run_collect(&config, no_cache)?;
            run_analyze(&config)
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let result = Config::load().map_err(anyhow::Error::from).and_then(|mut config| {
        if let Some(dir) = cli.data_dir {
            config.data_dir = dir;
        }
        dispatch(cli.command, config)
    });

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
