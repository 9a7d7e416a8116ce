//! Tie-break heuristic for picking a winner.
//!
//! Rules are tried in order and the first that separates the teams decides:
//!   1. higher win percentage            -> "better record"
//!   2. higher current score             -> "leading now"
//!   3. otherwise the home team          -> "home edge"
//!
//! There is no model behind this; it only looks at the two `TeamStat`s.
use std::fmt;

use super::summary::{NormalizedGame, TeamStat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickReason {
    BetterRecord,
    LeadingNow,
    HomeEdge,
}

impl PickReason {
    pub fn as_str(self) -> &'static str {
        match self {
            PickReason::BetterRecord => "better record",
            PickReason::LeadingNow => "leading now",
            PickReason::HomeEdge => "home edge",
        }
    }
}

impl fmt::Display for PickReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub picked_team_name: String,
    pub reason: PickReason,
}

impl Prediction {
    fn new(team: &TeamStat, reason: PickReason) -> Self {
        Prediction {
            picked_team_name: team.name.clone(),
            reason,
        }
    }
}

pub fn predict(game: &NormalizedGame) -> Prediction {
    let (home, away) = (&game.home, &game.away);

    if home.win_pct > away.win_pct {
        Prediction::new(home, PickReason::BetterRecord)
    } else if away.win_pct > home.win_pct {
        Prediction::new(away, PickReason::BetterRecord)
    } else if home.current_score != away.current_score {
        let leader = if home.current_score > away.current_score {
            home
        } else {
            away
        };
        Prediction::new(leader, PickReason::LeadingNow)
    } else {
        Prediction::new(home, PickReason::HomeEdge)
    }
}
