use crate::error::{AnalyticsError, Result};

/// A franchise as listed by the league's static team table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub abbreviation: &'static str,
    pub full_name: &'static str,
    pub nickname: &'static str,
    pub city: &'static str,
}

const fn team(
    id: i64,
    abbreviation: &'static str,
    full_name: &'static str,
    nickname: &'static str,
    city: &'static str,
) -> Team {
    Team { id, abbreviation, full_name, nickname, city }
}

pub static TEAMS: &[Team] = &[
    team(1610612737, "ATL", "Atlanta Hawks", "Hawks", "Atlanta"),
    team(1610612738, "BOS", "Boston Celtics", "Celtics", "Boston"),
    team(1610612739, "CLE", "Cleveland Cavaliers", "Cavaliers", "Cleveland"),
    team(1610612740, "NOP", "New Orleans Pelicans", "Pelicans", "New Orleans"),
    team(1610612741, "CHI", "Chicago Bulls", "Bulls", "Chicago"),
    team(1610612742, "DAL", "Dallas Mavericks", "Mavericks", "Dallas"),
    team(1610612743, "DEN", "Denver Nuggets", "Nuggets", "Denver"),
    team(1610612744, "GSW", "Golden State Warriors", "Warriors", "Golden State"),
    team(1610612745, "HOU", "Houston Rockets", "Rockets", "Houston"),
    team(1610612746, "LAC", "Los Angeles Clippers", "Clippers", "Los Angeles"),
    team(1610612747, "LAL", "Los Angeles Lakers", "Lakers", "Los Angeles"),
    team(1610612748, "MIA", "Miami Heat", "Heat", "Miami"),
    team(1610612749, "MIL", "Milwaukee Bucks", "Bucks", "Milwaukee"),
    team(1610612750, "MIN", "Minnesota Timberwolves", "Timberwolves", "Minnesota"),
    team(1610612751, "BKN", "Brooklyn Nets", "Nets", "Brooklyn"),
    team(1610612752, "NYK", "New York Knicks", "Knicks", "New York"),
    team(1610612753, "ORL", "Orlando Magic", "Magic", "Orlando"),
    team(1610612754, "IND", "Indiana Pacers", "Pacers", "Indiana"),
    team(1610612755, "PHI", "Philadelphia 76ers", "76ers", "Philadelphia"),
    team(1610612756, "PHX", "Phoenix Suns", "Suns", "Phoenix"),
    team(1610612757, "POR", "Portland Trail Blazers", "Trail Blazers", "Portland"),
    team(1610612758, "SAC", "Sacramento Kings", "Kings", "Sacramento"),
    team(1610612759, "SAS", "San Antonio Spurs", "Spurs", "San Antonio"),
    team(1610612760, "OKC", "Oklahoma City Thunder", "Thunder", "Oklahoma City"),
    team(1610612761, "TOR", "Toronto Raptors", "Raptors", "Toronto"),
    team(1610612762, "UTA", "Utah Jazz", "Jazz", "Utah"),
    team(1610612763, "MEM", "Memphis Grizzlies", "Grizzlies", "Memphis"),
    team(1610612764, "WAS", "Washington Wizards", "Wizards", "Washington"),
    team(1610612765, "DET", "Detroit Pistons", "Pistons", "Detroit"),
    team(1610612766, "CHA", "Charlotte Hornets", "Hornets", "Charlotte"),
];

pub fn find_team_by_abbreviation(abbr: &str) -> Option<&'static Team> {
    let abbr = abbr.trim();
    TEAMS.iter().find(|t| t.abbreviation.eq_ignore_ascii_case(abbr))
}

pub fn find_team_by_id(id: i64) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.id == id)
}

pub fn get_team_id(abbr: &str) -> Result<i64> {
    find_team_by_abbreviation(abbr)
        .map(|t| t.id)
        .ok_or_else(|| AnalyticsError::TeamNotFound(abbr.to_string()))
}
