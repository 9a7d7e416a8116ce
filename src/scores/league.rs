use std::fmt;
use std::str::FromStr;

/// A supported competition. Each one maps to a fixed scoreboard endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    Mlb,
    Nfl,
}

impl League {
    /// Every supported league, in report order.
    pub const ALL: [League; 2] = [League::Mlb, League::Nfl];

    /// Lowercase identifier used in commands.
    pub fn id(self) -> &'static str {
        match self {
            League::Mlb => "mlb",
            League::Nfl => "nfl",
        }
    }

    /// Uppercase label used in report text.
    pub fn label(self) -> &'static str {
        match self {
            League::Mlb => "MLB",
            League::Nfl => "NFL",
        }
    }

    /// Path of the league's scoreboard, relative to the provider base URL.
    pub fn scoreboard_path(self) -> &'static str {
        match self {
            League::Mlb => "baseball/mlb/scoreboard",
            League::Nfl => "football/nfl/scoreboard",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for League {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        League::ALL
            .into_iter()
            .find(|l| l.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported league: {}", s))
    }
}

/// Resolve command arguments into the leagues to report on.
///
/// No tokens means every league. Unknown tokens are dropped; if nothing
/// matches, fall back to every league rather than reply with nothing.
/// Matched leagues keep the order the caller gave them in.
pub fn select_leagues<S: AsRef<str>>(tokens: &[S]) -> Vec<League> {
    let picked: Vec<League> = tokens
        .iter()
        .filter_map(|t| t.as_ref().parse::<League>().ok())
        .collect();
    if picked.is_empty() {
        League::ALL.to_vec()
    } else {
        picked
    }
}
