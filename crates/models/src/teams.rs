use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::HoopsError;

/// League franchise, identified by its three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TeamCode {
    Atl,
    Bos,
    Bkn,
    Cha,
    Chi,
    Cle,
    Dal,
    Den,
    Det,
    Gsw,
    Hou,
    Ind,
    Lac,
    Lal,
    Mem,
    Mia,
    Mil,
    Min,
    Nop,
    Nyk,
    Okc,
    Orl,
    Phi,
    Phx,
    Por,
    Sac,
    Sas,
    Tor,
    Uta,
    Was,
}

impl TeamCode {
    pub const ALL: [TeamCode; 30] = [
        TeamCode::Atl, TeamCode::Bos, TeamCode::Bkn, TeamCode::Cha, TeamCode::Chi,
        TeamCode::Cle, TeamCode::Dal, TeamCode::Den, TeamCode::Det, TeamCode::Gsw,
        TeamCode::Hou, TeamCode::Ind, TeamCode::Lac, TeamCode::Lal, TeamCode::Mem,
        TeamCode::Mia, TeamCode::Mil, TeamCode::Min, TeamCode::Nop, TeamCode::Nyk,
        TeamCode::Okc, TeamCode::Orl, TeamCode::Phi, TeamCode::Phx, TeamCode::Por,
        TeamCode::Sac, TeamCode::Sas, TeamCode::Tor, TeamCode::Uta, TeamCode::Was,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamCode::Atl => "ATL",
            TeamCode::Bos => "BOS",
            TeamCode::Bkn => "BKN",
            TeamCode::Cha => "CHA",
            TeamCode::Chi => "CHI",
            TeamCode::Cle => "CLE",
            TeamCode::Dal => "DAL",
            TeamCode::Den => "DEN",
            TeamCode::Det => "DET",
            TeamCode::Gsw => "GSW",
            TeamCode::Hou => "HOU",
            TeamCode::Ind => "IND",
            TeamCode::Lac => "LAC",
            TeamCode::Lal => "LAL",
            TeamCode::Mem => "MEM",
            TeamCode::Mia => "MIA",
            TeamCode::Mil => "MIL",
            TeamCode::Min => "MIN",
            TeamCode::Nop => "NOP",
            TeamCode::Nyk => "NYK",
            TeamCode::Okc => "OKC",
            TeamCode::Orl => "ORL",
            TeamCode::Phi => "PHI",
            TeamCode::Phx => "PHX",
            TeamCode::Por => "POR",
            TeamCode::Sac => "SAC",
            TeamCode::Sas => "SAS",
            TeamCode::Tor => "TOR",
            TeamCode::Uta => "UTA",
            TeamCode::Was => "WAS",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            TeamCode::Atl => "Atlanta Hawks",
            TeamCode::Bos => "Boston Celtics",
            TeamCode::Bkn => "Brooklyn Nets",
            TeamCode::Cha => "Charlotte Hornets",
            TeamCode::Chi => "Chicago Bulls",
            TeamCode::Cle => "Cleveland Cavaliers",
            TeamCode::Dal => "Dallas Mavericks",
            TeamCode::Den => "Denver Nuggets",
            TeamCode::Det => "Detroit Pistons",
            TeamCode::Gsw => "Golden State Warriors",
            TeamCode::Hou => "Houston Rockets",
            TeamCode::Ind => "Indiana Pacers",
            TeamCode::Lac => "Los Angeles Clippers",
            TeamCode::Lal => "Los Angeles Lakers",
            TeamCode::Mem => "Memphis Grizzlies",
            TeamCode::Mia => "Miami Heat",
            TeamCode::Mil => "Milwaukee Bucks",
            TeamCode::Min => "Minnesota Timberwolves",
            TeamCode::Nop => "New Orleans Pelicans",
            TeamCode::Nyk => "New York Knicks",
            TeamCode::Okc => "Oklahoma City Thunder",
            TeamCode::Orl => "Orlando Magic",
            TeamCode::Phi => "Philadelphia 76ers",
            TeamCode::Phx => "Phoenix Suns",
            TeamCode::Por => "Portland Trail Blazers",
            TeamCode::Sac => "Sacramento Kings",
            TeamCode::Sas => "San Antonio Spurs",
            TeamCode::Tor => "Toronto Raptors",
            TeamCode::Uta => "Utah Jazz",
            TeamCode::Was => "Washington Wizards",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the league.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|team| team.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamCode {
    type Err = HoopsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| HoopsError::UnknownTeam(s.to_string()))
    }
}

impl TryFrom<String> for TeamCode {
    type Error = HoopsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeamCode> for String {
    fn from(team: TeamCode) -> Self {
        team.as_str().to_string()
    }
}
