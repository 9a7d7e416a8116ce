use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::command::CommandHandler;
use crate::scores::{select_leagues, ReportBuilder};

pub const GREETING: &str = "Hey! I predict winners for MLB & NFL.\n\
                            Use /today to get both, or /today mlb or /today nfl.";

/// Command surface of the bot: `/start` (alias `/help`) and `/today [league...]`.
pub struct PicksBot {
    reports: ReportBuilder,
}

impl PicksBot {
    pub fn new(reports: ReportBuilder) -> Self {
        PicksBot { reports }
    }
}

#[async_trait]
impl CommandHandler for PicksBot {
    async fn handle(&self, command: &str, args: &[String]) -> Result<Option<String>> {
        match command {
            "start" | "help" => Ok(Some(GREETING.to_string())),
            "today" => {
                let leagues = select_leagues(args);
                info!("/today for {:?}", leagues);
                let text = self.reports.build_reports(&leagues).await?;
                Ok(Some(text))
            }
            _ => Ok(None),
        }
    }
}
