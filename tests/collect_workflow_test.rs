#[cfg(test)]
mod tests {
    use gsw_analytics::apis::StatsApi;
    use gsw_analytics::config::Config;
    use gsw_analytics::error::{AnalyticsError, Result};
    use gsw_analytics::storage::{read_records, write_records};
    use gsw_analytics::types::{BoxscoreRecord, GameRecord};
    use gsw_analytics::workflows::collect;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    const GSW: i64 = 1610612744;

    /// Serves canned games and boxscores; `flaky` games fail that many times first.
    struct FakeStatsApi {
        games: Vec<GameRecord>,
        boxscores: HashMap<String, Vec<BoxscoreRecord>>,
        flaky: RefCell<HashMap<String, u32>>,
        broken: Option<String>,
        boxscore_calls: Cell<usize>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeStatsApi {
        fn new(games: Vec<GameRecord>) -> Self {
            let boxscores = games
                .iter()
                .map(|g| (g.game_id.clone(), vec![player_row(&g.game_id, 201939, "Stephen Curry", "G")]))
                .collect();
            Self {
                games,
                boxscores,
                flaky: RefCell::new(HashMap::new()),
                broken: None,
                boxscore_calls: Cell::new(0),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl StatsApi for FakeStatsApi {
        fn league_game_finder(&self, team_id: i64) -> Result<Vec<GameRecord>> {
            assert_eq!(team_id, GSW);
            Ok(self.games.clone())
        }

        fn boxscore_traditional(&self, game_id: &str) -> Result<Vec<BoxscoreRecord>> {
            self.boxscore_calls.set(self.boxscore_calls.get() + 1);
            self.requested.borrow_mut().push(game_id.to_string());
            if self.broken.as_deref() == Some(game_id) {
                return Err(AnalyticsError::Api { message: "503 Service Unavailable".into() });
            }
            if let Some(left) = self.flaky.borrow_mut().get_mut(game_id) {
                if *left > 0 {
                    *left -= 1;
                    return Err(AnalyticsError::Api { message: "timed out".into() });
                }
            }
            Ok(self.boxscores.get(game_id).cloned().unwrap_or_default())
        }
    }

    fn game(season_id: &str, game_id: &str, date: &str) -> GameRecord {
        GameRecord {
            season_id: Some(season_id.into()),
            team_id: Some(GSW),
            team_abbreviation: "GSW".into(),
            game_id: game_id.into(),
            game_date: date.into(),
            matchup: "GSW vs. LAL".into(),
            wl: Some("W".into()),
            pts: Some(115.0),
            plus_minus: Some(7.0),
            ..Default::default()
        }
    }

    fn player_row(game_id: &str, player_id: i64, name: &str, pos: &str) -> BoxscoreRecord {
        BoxscoreRecord {
            // The endpoint echoes ids without padding; collect restores them
            game_id: game_id.trim_start_matches('0').into(),
            team_id: Some(GSW),
            team_abbreviation: "GSW".into(),
            player_id: Some(player_id),
            player_name: name.into(),
            start_position: Some(pos.into()),
            min: Some("34:30".into()),
            pts: Some(30.0),
            ..Default::default()
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.data_dir = dir.path().to_path_buf();
        config.http.base_delay_ms = 0;
        config.http.retries = 3;
        config.http.cache_enabled = false;
        config
    }

    fn season_games() -> Vec<GameRecord> {
        vec![
            game("22024", "0022400077", "2024-10-25"),
            game("22024", "0022400061", "2024-10-23"),
            game("22023", "0022301180", "2024-04-14"),
            game("42024", "0042400101", "2025-04-20"),
        ]
    }

    #[test]
    fn test_collect_writes_games_and_boxscores() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let api = FakeStatsApi::new(season_games());

        let summary = collect(&api, &config).unwrap();

        assert_eq!(summary.games_saved, 3);
        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.already_on_disk, 0);
        assert_eq!(summary.boxscore_rows, 3);

        let games: Vec<GameRecord> = read_records(config.games_csv()).unwrap();
        let ids: Vec<&str> = games.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["0022400061", "0022400077", "0042400101"]);
        assert!(games.iter().all(|g| g.season_display.as_deref() == Some("2024-25")));

        let rows: Vec<BoxscoreRecord> = read_records(config.boxscores_csv()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].game_id, "0022400061");
        assert_eq!(rows[0].minutes(), 34.5);
    }

    #[test]
    fn test_collect_resumes_from_existing_boxscores() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);

        // One game already on disk, stored without its leading zeros
        let existing = vec![BoxscoreRecord {
            game_id: "22400061".into(),
            team_id: Some(GSW),
            player_id: Some(201939),
            player_name: "Stephen Curry".into(),
            ..Default::default()
        }];
        write_records(config.boxscores_csv(), &existing).unwrap();

        let api = FakeStatsApi::new(season_games());
        let summary = collect(&api, &config).unwrap();

        assert_eq!(summary.already_on_disk, 1);
        assert_eq!(summary.fetched, 2);
        assert_eq!(*api.requested.borrow(), vec!["0022400077", "0042400101"]);

        let rows: Vec<BoxscoreRecord> = read_records(config.boxscores_csv()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_collect_skips_fetch_when_everything_is_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let api = FakeStatsApi::new(season_games());

        collect(&api, &config).unwrap();
        let calls = api.boxscore_calls.get();
        let summary = collect(&api, &config).unwrap();

        assert_eq!(api.boxscore_calls.get(), calls);
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.boxscore_rows, 3);
    }

    #[test]
    fn test_collect_retries_transient_failures() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let api = FakeStatsApi::new(season_games());
        api.flaky.borrow_mut().insert("0022400077".into(), 2);

        let summary = collect(&api, &config).unwrap();

        assert_eq!(summary.boxscore_rows, 3);
        assert_eq!(api.boxscore_calls.get(), 5);
    }

    #[test]
    fn test_collect_aborts_after_exhausting_retries() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let mut api = FakeStatsApi::new(season_games());
        api.broken = Some("0022400077".into());

        let err = collect(&api, &config).unwrap_err();

        match err {
            AnalyticsError::FetchFailed { game_id, attempts, .. } => {
                assert_eq!(game_id, "0022400077");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected FetchFailed, got {other:?}"),
        }
        // Games and the boxscores fetched before the failure are on disk
        assert!(config.games_csv().exists());
        let rows: Vec<BoxscoreRecord> = read_records(config.boxscores_csv()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].game_id, "0022400061");

        // Once the endpoint recovers, only the missing games are requested
        api.broken = None;
        api.requested.borrow_mut().clear();
        let summary = collect(&api, &config).unwrap();
        assert_eq!(summary.already_on_disk, 1);
        assert_eq!(*api.requested.borrow(), vec!["0022400077", "0042400101"]);
        assert_eq!(summary.boxscore_rows, 3);
    }

    #[test]
    fn test_resume_keeps_players_with_float_formatted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        fs::create_dir_all(&config.data_dir).unwrap();
        fs::write(
            config.boxscores_csv(),
            "GAME_ID,TEAM_ID,PLAYER_ID,PLAYER_NAME,START_POSITION\n\
             0022400061,1610612744.0,1626172.0,Kevon Looney,C\n\
             0022400061,1610612744.0,201939.0,Stephen Curry,G\n",
        )
        .unwrap();

        let api = FakeStatsApi::new(season_games());
        let summary = collect(&api, &config).unwrap();

        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.boxscore_rows, 4);
        let rows: Vec<BoxscoreRecord> = read_records(config.boxscores_csv()).unwrap();
        assert_eq!(rows[0].player_id, Some(1626172));
        assert_eq!(rows[1].player_id, Some(201939));
        assert!(rows.iter().all(|r| r.team_id == Some(GSW)));
    }

    #[test]
    fn test_collect_rejects_unknown_team() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.team_abbr = "XYZ".into();
        let api = FakeStatsApi::new(Vec::new());

        let err = collect(&api, &config).unwrap_err();
        assert_eq!(err.to_string(), "Team XYZ not found");
    }
}
