use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::league::League;
use super::predict::{predict, Prediction};
use super::provider::ScoreFetcher;
use super::summary::{summarize, MalformedGameError, NormalizedGame};

/// Builds the human-readable "today's games & picks" text.
///
/// Stateless apart from the fetcher it holds, so one instance is shared by
/// every request.
#[derive(Clone)]
pub struct ReportBuilder {
    fetcher: Arc<dyn ScoreFetcher>,
}

/// One bullet line: away team first, and the score in the same away-home order
/// whoever the pick is.
pub fn format_game_line(game: &NormalizedGame, prediction: &Prediction) -> String {
    format!(
        "• {} @ {} — pick: **{}** ({})  [{}; score {}-{}]",
        game.away.name,
        game.home.name,
        prediction.picked_team_name,
        prediction.reason,
        game.status,
        game.away.current_score,
        game.home.current_score,
    )
}

impl ReportBuilder {
    pub fn new(fetcher: Arc<dyn ScoreFetcher>) -> Self {
        ReportBuilder { fetcher }
    }

    /// Report for a single league.
    ///
    /// A failed fetch becomes a one-line message instead of an error. A
    /// malformed game is *not* skipped: it aborts this league's report and is
    /// returned to the caller.
    pub async fn build_report(&self, league: League) -> Result<String, MalformedGameError> {
        let games = match self.fetcher.fetch(league).await {
            Ok(games) => games,
            Err(e) => {
                warn!("{} fetch from {} failed: {}", league, self.fetcher.name(), e);
                return Ok(format!("Could not fetch {} games: {}", league, e));
            }
        };
        info!("Fetched {} {} game(s) from {}", games.len(), league, self.fetcher.name());

        if games.is_empty() {
            return Ok(format!("No {} games found for today.", league));
        }

        let mut lines = Vec::with_capacity(games.len() + 1);
        lines.push(format!("📅 {} games & picks", league));
        for raw in &games {
            let game = summarize(raw).map_err(|e| {
                error!(
                    "Malformed {} game {}: {}",
                    league,
                    raw.id.as_deref().unwrap_or("?"),
                    e
                );
                e
            })?;
            let prediction = predict(&game);
            lines.push(format_game_line(&game, &prediction));
        }
        Ok(lines.join("\n"))
    }

    /// Reports for several leagues, fetched concurrently and joined by a blank
    /// line in the order given.
    pub async fn build_reports(&self, leagues: &[League]) -> Result<String, MalformedGameError> {
        let parts = join_all(leagues.iter().map(|&l| self.build_report(l))).await;
        let parts = parts.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("\n\n"))
    }
}
