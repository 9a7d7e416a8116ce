use async_trait::async_trait;
use thiserror::Error;

use super::espn::RawGame;
use super::league::League;

/// Why a scoreboard fetch produced no games.
///
/// The `Display` text ends up verbatim in the user-facing report.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("scoreboard returned HTTP {0}")]
    Status(u16),
    #[error("invalid scoreboard response: {0}")]
    Decode(String),
}

/// Trait that every scoreboard source must implement.
#[async_trait]
pub trait ScoreFetcher: Send + Sync {
    /// Return today's games for `league`, in source order. One attempt, no cache.
    async fn fetch(&self, league: League) -> Result<Vec<RawGame>, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
