use serde::Serialize;
use thiserror::Error;

use super::espn::{RawCompetitor, RawGame};

/// A raw game record that is missing something the report cannot do without.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGameError {
    #[error("game has no competition entry")]
    MissingCompetition,
    #[error("game has no {side} competitor")]
    MissingCompetitor { side: &'static str },
    #[error("{side} competitor is missing team {field}")]
    MissingTeamField {
        side: &'static str,
        field: &'static str,
    },
    #[error("game has no status description")]
    MissingStatus,
    #[error("{side} score {value:?} is not an integer")]
    InvalidScore { side: &'static str, value: String },
}

/// Normalized per-team line for one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStat {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub wins: u32,
    pub losses: u32,
    /// wins / (wins + losses), or 0.0 with no decisions yet
    pub win_pct: f64,
    /// Signed: the feed's score is passed through as-is, negatives included.
    pub current_score: i32,
    pub is_home: bool,
}

/// One game reduced to the fields the predictor and report need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedGame {
    pub home: TeamStat,
    pub away: TeamStat,
    pub status: String,
    pub start_time: String,
}

/// Pull (wins, losses) out of a record summary such as "85-67" or "10-7-0".
///
/// Takes the first two digit runs found anywhere in the string. A third
/// number (NFL ties) is ignored, and anything with fewer than two numbers
/// reads as 0-0. This is deliberately permissive. A digit run too long for
/// `u32` saturates to `u32::MAX` instead of failing.
pub fn parse_record(summary: &str) -> (u32, u32) {
    let mut nums = summary
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u32>().unwrap_or(u32::MAX));
    match (nums.next(), nums.next()) {
        (Some(wins), Some(losses)) => (wins, losses),
        _ => (0, 0),
    }
}

pub fn win_pct(wins: u32, losses: u32) -> f64 {
    let decisions = u64::from(wins) + u64::from(losses);
    if decisions == 0 {
        0.0
    } else {
        f64::from(wins) / decisions as f64
    }
}

fn parse_score(side: &'static str, raw: Option<&str>) -> Result<i32, MalformedGameError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(s) => s.parse().map_err(|_| MalformedGameError::InvalidScore {
            side,
            value: s.to_string(),
        }),
    }
}

fn team_stat(side: &'static str, c: &RawCompetitor) -> Result<TeamStat, MalformedGameError> {
    let team = c
        .team
        .as_ref()
        .ok_or(MalformedGameError::MissingTeamField { side, field: "team" })?;
    let id = team
        .id
        .clone()
        .ok_or(MalformedGameError::MissingTeamField { side, field: "id" })?;
    let name = team
        .display_name
        .clone()
        .ok_or(MalformedGameError::MissingTeamField {
            side,
            field: "displayName",
        })?;

    let record = c
        .records
        .first()
        .and_then(|r| r.summary.as_deref())
        .unwrap_or("");
    let (wins, losses) = parse_record(record);

    Ok(TeamStat {
        id,
        name,
        abbreviation: team.abbreviation.clone().unwrap_or_default(),
        wins,
        losses,
        win_pct: win_pct(wins, losses),
        current_score: parse_score(side, c.score.as_deref())?,
        is_home: side == "home",
    })
}

/// Normalize one raw scoreboard event.
pub fn summarize(raw: &RawGame) -> Result<NormalizedGame, MalformedGameError> {
    let competitors = &raw
        .competitions
        .first()
        .ok_or(MalformedGameError::MissingCompetition)?
        .competitors;

    let find = |side: &'static str| {
        competitors
            .iter()
            .find(|c| c.home_away == side)
            .ok_or(MalformedGameError::MissingCompetitor { side })
    };
    let home = team_stat("home", find("home")?)?;
    let away = team_stat("away", find("away")?)?;

    let status = raw
        .status
        .as_ref()
        .and_then(|s| s.kind.as_ref())
        .and_then(|k| k.description.clone())
        .ok_or(MalformedGameError::MissingStatus)?;

    Ok(NormalizedGame {
        home,
        away,
        status,
        start_time: raw.date.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn raw(v: serde_json::Value) -> RawGame {
        serde_json::from_value(v).expect("raw game")
    }

    fn sample() -> RawGame {
        raw(json!({
            "date": "2024-09-12T23:05Z",
            "status": {"type": {"description": "Scheduled"}},
            "competitions": [{
                "competitors": [
                    {"homeAway": "away", "score": "",
                     "team": {"id": "2", "displayName": "Boston Red Sox", "abbreviation": "BOS"},
                     "records": [{"summary": "10-7-0"}, {"summary": "5-2"}]},
                    {"homeAway": "home",
                     "team": {"id": "10", "displayName": "New York Yankees"},
                     "records": [{"summary": "85-67"}]}
                ]
            }]
        }))
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(parse_record("85-67"), (85, 67));
        assert_eq!(parse_record("10-7-0"), (10, 7));
        assert_eq!(parse_record("W 3, L 12, T 1"), (3, 12));
    }

    #[test]
    fn test_parse_record_too_few_numbers() {
        assert_eq!(parse_record(""), (0, 0));
        assert_eq!(parse_record("12"), (0, 0));
        assert_eq!(parse_record("n/a"), (0, 0));
    }

    #[test]
    fn test_win_pct() {
        assert_eq!(win_pct(0, 0), 0.0);
        assert_relative_eq!(win_pct(85, 67), 85.0 / 152.0);
        assert_relative_eq!(win_pct(3, 0), 1.0);
    }

    #[test]
    fn test_summarize() {
        let g = summarize(&sample()).expect("summarize");
        assert_eq!(g.home.name, "New York Yankees");
        assert!(g.home.is_home);
        assert!(!g.away.is_home);
        assert_eq!((g.home.wins, g.home.losses), (85, 67));
        // first record only; the tie count is dropped
        assert_eq!((g.away.wins, g.away.losses), (10, 7));
        assert_relative_eq!(g.away.win_pct, 10.0 / 17.0);
        assert_eq!(g.away.abbreviation, "BOS");
        assert_eq!(g.home.abbreviation, "");
        assert_eq!(g.home.current_score, 0);
        assert_eq!(g.away.current_score, 0);
        assert_eq!(g.status, "Scheduled");
        assert_eq!(g.start_time, "2024-09-12T23:05Z");
    }

    #[test]
    fn test_no_records_is_zero_pct() {
        let g = summarize(&raw(json!({
            "status": {"type": {"description": "Final"}},
            "competitions": [{"competitors": [
                {"homeAway": "home", "score": "7", "team": {"id": "1", "displayName": "A"}},
                {"homeAway": "away", "score": "3", "team": {"id": "2", "displayName": "B"}}
            ]}]
        })))
        .expect("summarize");
        assert_eq!(g.home.win_pct, 0.0);
        assert_eq!(g.home.current_score, 7);
        assert_eq!(g.start_time, "");
    }

    #[test]
    fn test_missing_away_competitor() {
        let err = summarize(&raw(json!({
            "status": {"type": {"description": "Final"}},
            "competitions": [{"competitors": [
                {"homeAway": "home", "team": {"id": "1", "displayName": "A"}}
            ]}]
        })))
        .unwrap_err();
        assert_eq!(err, MalformedGameError::MissingCompetitor { side: "away" });
    }

    #[test]
    fn test_missing_competition() {
        let err = summarize(&RawGame::default()).unwrap_err();
        assert_eq!(err, MalformedGameError::MissingCompetition);
    }

    #[test]
    fn test_oversized_record_saturates() {
        assert_eq!(parse_record("99999999999-3"), (u32::MAX, 3));
    }

    #[test]
    fn test_negative_score_passes_through() {
        let g = summarize(&raw(json!({
            "status": {"type": {"description": "Final"}},
            "competitions": [{"competitors": [
                {"homeAway": "home", "score": "-1", "team": {"id": "1", "displayName": "A"}},
                {"homeAway": "away", "score": " 4 ", "team": {"id": "2", "displayName": "B"}}
            ]}]
        })))
        .expect("summarize");
        assert_eq!(g.home.current_score, -1);
        assert_eq!(g.away.current_score, 4);
    }

    #[test]
    fn test_garbage_score_rejected() {
        let err = summarize(&raw(json!({
            "status": {"type": {"description": "Final"}},
            "competitions": [{"competitors": [
                {"homeAway": "home", "score": "x", "team": {"id": "1", "displayName": "A"}},
                {"homeAway": "away", "team": {"id": "2", "displayName": "B"}}
            ]}]
        })))
        .unwrap_err();
        assert!(matches!(err, MalformedGameError::InvalidScore { side: "home", .. }));
    }
}
