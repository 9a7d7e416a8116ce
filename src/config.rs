use clap::Parser;
use url::Url;

/// Placeholder secret that used to ship as a default; never accept it.
const INSECURE_SECRET: &str = "secret123";

/// Telegram bot that posts today's games and a winner pick per game
#[derive(Parser, Debug, Clone)]
#[command(name = "picks-bot", version, about)]
pub struct Config {
    /// Telegram bot token issued by @BotFather
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Shared secret embedded in the webhook path
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// Externally reachable base URL used to register the webhook
    #[arg(long, env = "PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Base URL assigned by Render; takes precedence over PUBLIC_URL
    #[arg(long, env = "RENDER_EXTERNAL_URL")]
    pub render_external_url: Option<String>,

    /// Gateway listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// Scoreboard API base URL (league path is appended)
    #[arg(
        long,
        env = "SCOREBOARD_BASE_URL",
        default_value = "https://site.api.espn.com/apis/v2/sports"
    )]
    pub scoreboard_base_url: String,

    /// Timeout for a single scoreboard request, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "20")]
    pub fetch_timeout_secs: u64,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = "https://api.telegram.org")]
    pub telegram_api_url: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bot_token().is_none() {
            anyhow::bail!("TELEGRAM_BOT_TOKEN is not set");
        }
        match self.webhook_secret.as_deref().map(str::trim) {
            None | Some("") => anyhow::bail!("WEBHOOK_SECRET is not set"),
            Some(INSECURE_SECRET) => {
                anyhow::bail!("WEBHOOK_SECRET is still the placeholder value; set a real secret")
            }
            Some(_) => {}
        }
        if let Some(base) = self.public_base_url() {
            let parsed = Url::parse(base)
                .map_err(|e| anyhow::anyhow!("public URL {:?} is invalid: {}", base, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("public URL must be http or https, got {}", parsed.scheme());
            }
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn bot_token(&self) -> Option<&str> {
        self.telegram_bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn secret(&self) -> &str {
        self.webhook_secret.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Render's URL wins over PUBLIC_URL when both are present.
    pub fn public_base_url(&self) -> Option<&str> {
        self.render_external_url
            .as_deref()
            .or(self.public_url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Full webhook address to register with Telegram, if a public URL is known.
    pub fn webhook_url(&self) -> Option<String> {
        self.public_base_url().map(|base| {
            format!("{}/webhook/{}", base.trim_end_matches('/'), self.secret())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["picks-bot"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).expect("args should parse")
    }

    #[test]
    fn test_valid_config() {
        let c = config(&["--telegram-bot-token", "123:abc", "--webhook-secret", "s3cr3t"]);
        assert!(c.validate().is_ok());
        assert_eq!(c.fetch_timeout_secs, 20);
        assert_eq!(c.webhook_url(), None);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let c = config(&["--webhook-secret", "s3cr3t", "--telegram-bot-token", "  "]);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        let c = config(&["--telegram-bot-token", "123:abc", "--webhook-secret", "secret123"]);
        assert!(c.validate().is_err());
        let c = config(&["--telegram-bot-token", "123:abc", "--webhook-secret", ""]);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_webhook_url_prefers_render() {
        let c = config(&[
            "--telegram-bot-token",
            "123:abc",
            "--webhook-secret",
            "s3cr3t",
            "--public-url",
            "https://example.org",
            "--render-external-url",
            "https://svc.onrender.com/",
        ]);
        assert!(c.validate().is_ok());
        assert_eq!(
            c.webhook_url().as_deref(),
            Some("https://svc.onrender.com/webhook/s3cr3t")
        );
    }

    #[test]
    fn test_bad_public_url_rejected() {
        let c = config(&[
            "--telegram-bot-token",
            "123:abc",
            "--webhook-secret",
            "s3cr3t",
            "--public-url",
            "ftp://example.org",
        ]);
        assert!(c.validate().is_err());
    }
}
