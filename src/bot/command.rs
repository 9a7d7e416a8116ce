use anyhow::Result;
use async_trait::async_trait;

/// Anything that can answer a chat command with text.
///
/// `Ok(None)` means the command is not one this handler knows; the gateway
/// stays silent in that case.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, command: &str, args: &[String]) -> Result<Option<String>>;
}

/// A chat command split out of message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lowercased name without the leading slash or `@botname` suffix.
    pub name: String,
    pub args: Vec<String>,
}

/// Parse "/today@MyBot mlb nfl" into a [`Command`]. Non-command text yields `None`.
///
/// A command addressed to another bot (`@suffix` not matching `bot_username`,
/// case-insensitive) also yields `None`. With no known username any suffix is
/// accepted.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let mut parts = text.split_whitespace();
    let head = parts.next()?.strip_prefix('/')?;
    let (name, target) = match head.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (head, None),
    };
    if name.is_empty() {
        return None;
    }
    if let (Some(target), Some(me)) = (target, bot_username) {
        if !target.eq_ignore_ascii_case(me.trim_start_matches('@')) {
            return None;
        }
    }
    Some(Command {
        name: name.to_lowercase(),
        args: parts.map(str::to_string).collect(),
    })
}
