use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One team-game row as served by the league game finder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GameRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub season_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub team_abbreviation: String,
    #[serde(default)]
    pub team_name: String,
    pub game_id: String,
    #[serde(default)]
    pub game_date: String,
    #[serde(default)]
    pub matchup: String,
    pub wl: Option<String>,
    pub min: Option<f64>,
    pub pts: Option<f64>,
    pub fgm: Option<f64>,
    pub fga: Option<f64>,
    pub fg_pct: Option<f64>,
    pub fg3m: Option<f64>,
    pub fg3a: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ftm: Option<f64>,
    pub fta: Option<f64>,
    pub ft_pct: Option<f64>,
    pub oreb: Option<f64>,
    pub dreb: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub tov: Option<f64>,
    pub pf: Option<f64>,
    pub plus_minus: Option<f64>,
    /// Not served by the game finder; honored when a hand-built file carries it.
    #[serde(default)]
    pub season_type: Option<String>,
    #[serde(default)]
    pub season_display: Option<String>,
}

impl GameRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "SEASON_ID", "TEAM_ID", "TEAM_ABBREVIATION", "TEAM_NAME", "GAME_ID", "GAME_DATE",
        "MATCHUP", "WL", "MIN", "PTS", "FGM", "FGA", "FG_PCT", "FG3M", "FG3A", "FG3_PCT", "FTM",
        "FTA", "FT_PCT", "OREB", "DREB", "REB", "AST", "STL", "BLK", "TOV", "PF", "PLUS_MINUS",
        "SEASON_TYPE", "SEASON_DISPLAY",
    ];

    pub fn is_win(&self) -> bool {
        self.wl.as_deref() == Some("W")
    }

    pub fn is_home(&self) -> bool {
        self.matchup.contains(" vs. ")
    }

    pub fn is_away(&self) -> bool {
        self.matchup.contains(" @ ")
    }
}

/// One player-game row from the traditional boxscore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BoxscoreRecord {
    pub game_id: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub team_abbreviation: String,
    #[serde(default)]
    pub team_city: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub player_id: Option<i64>,
    #[serde(default)]
    pub player_name: String,
    pub nickname: Option<String>,
    /// Empty or absent for bench players
    pub start_position: Option<String>,
    pub comment: Option<String>,
    /// `mm:ss`, see [`crate::minutes::mmss_to_minutes`]
    #[serde(default, deserialize_with = "lenient_string")]
    pub min: Option<String>,
    pub fgm: Option<f64>,
    pub fga: Option<f64>,
    pub fg_pct: Option<f64>,
    pub fg3m: Option<f64>,
    pub fg3a: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ftm: Option<f64>,
    pub fta: Option<f64>,
    pub ft_pct: Option<f64>,
    pub oreb: Option<f64>,
    pub dreb: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub to: Option<f64>,
    pub pf: Option<f64>,
    pub pts: Option<f64>,
    pub plus_minus: Option<f64>,
}

impl BoxscoreRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "GAME_ID", "TEAM_ID", "TEAM_ABBREVIATION", "TEAM_CITY", "PLAYER_ID", "PLAYER_NAME",
        "NICKNAME", "START_POSITION", "COMMENT", "MIN", "FGM", "FGA", "FG_PCT", "FG3M", "FG3A",
        "FG3_PCT", "FTM", "FTA", "FT_PCT", "OREB", "DREB", "REB", "AST", "STL", "BLK", "TO", "PF",
        "PTS", "PLUS_MINUS",
    ];

    /// Start position with nulls treated as empty.
    pub fn start_position(&self) -> &str {
        self.start_position.as_deref().unwrap_or("")
    }

    pub fn is_starter(&self) -> bool {
        !self.start_position().trim().is_empty()
    }

    pub fn minutes(&self) -> f64 {
        self.min.as_deref().map(crate::minutes::mmss_to_minutes).unwrap_or(0.0)
    }
}

/// Accepts strings, numbers or null and renders them as an optional string.
fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts integers, whole floats (`1610612744.0`) and numeric strings;
/// anything else becomes `None`.
fn lenient_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    fn from_f64(f: f64) -> Option<i64> {
        (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    }

    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(from_f64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(from_f64))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boxscore_from_api_row_with_nulls() {
        let row = json!({
            "GAME_ID": "0022400061",
            "TEAM_ID": 1610612744,
            "TEAM_ABBREVIATION": "GSW",
            "PLAYER_ID": 1626172,
            "PLAYER_NAME": "Kevon Looney",
            "START_POSITION": "C",
            "COMMENT": "",
            "MIN": "22.000000:15",
            "FG3M": 0.0,
            "PTS": null
        });
        let rec: BoxscoreRecord = serde_json::from_value(row).unwrap();
        assert_eq!(rec.game_id, "0022400061");
        assert_eq!(rec.team_id, Some(1610612744));
        assert_eq!(rec.start_position(), "C");
        assert!(rec.is_starter());
        assert_eq!(rec.pts, None);
        assert!((rec.minutes() - 22.25).abs() < 1e-9);
    }

    #[test]
    fn test_team_id_is_coerced_when_unparseable() {
        let data = "GAME_ID,TEAM_ID,PLAYER_NAME\n22400061,abc,Stephen Curry\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let rec: BoxscoreRecord = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(rec.team_id, None);
        assert_eq!(rec.game_id, "22400061");
        assert!(!rec.is_starter());
    }

    #[test]
    fn test_float_formatted_ids_are_kept() {
        let data = "GAME_ID,TEAM_ID,PLAYER_ID,PLAYER_NAME,START_POSITION\n\
                    0022400061,1610612744.0,1626172.0,Kevon Looney,C\n\
                    0022400061,1610612744.0,201939.0,Stephen Curry,G\n\
                    0022400061,1610612744.5,,Buddy Hield,\n";
        let rows: Vec<BoxscoreRecord> = csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows[0].team_id, Some(1610612744));
        assert_eq!(rows[0].player_id, Some(1626172));
        assert_eq!(rows[1].player_id, Some(201939));
        assert_eq!(rows[2].team_id, None);
        assert_eq!(rows[2].player_id, None);

        let game: GameRecord = serde_json::from_value(json!({"GAME_ID": "1", "TEAM_ID": "1610612744.0"})).unwrap();
        assert_eq!(game.team_id, Some(1610612744));
    }

    #[test]
    fn test_matchup_home_and_away() {
        let home = GameRecord { matchup: "GSW vs. LAL".into(), ..Default::default() };
        let away = GameRecord { matchup: "GSW @ LAL".into(), ..Default::default() };
        assert!(home.is_home() && !home.is_away());
        assert!(away.is_away() && !away.is_home());
    }

    #[test]
    fn test_csv_header_matches_columns() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(GameRecord { game_id: "1".into(), ..Default::default() }).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, GameRecord::COLUMNS.join(","));

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(BoxscoreRecord { game_id: "1".into(), ..Default::default() }).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().next().unwrap(), BoxscoreRecord::COLUMNS.join(","));
    }
}
