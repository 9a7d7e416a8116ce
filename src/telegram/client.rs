use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::types::{ApiResponse, SendMessageRequest, SetWebhookRequest, User};

/// Bot API refuses messages longer than this, counted in UTF-16 code units.
pub const MAX_MESSAGE_UNITS: usize = 4096;

/// Outbound side of the messaging platform, as the gateway sees it.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send plain text to a chat, splitting it if it exceeds the platform limit.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Thin Telegram Bot API client. Constructed once at startup and shared.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TelegramClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{}", self.api_url, self.token, method);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Telegram {} request failed", method))?;

        let status = resp.status();
        let parsed: ApiResponse<T> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Telegram {} response", method))?;
        if !status.is_success() || !parsed.ok {
            anyhow::bail!(
                "Telegram {} error ({}): {}",
                method,
                status,
                parsed.description.unwrap_or_default()
            );
        }
        parsed
            .result
            .with_context(|| format!("Telegram {} response has no result", method))
    }

    /// The bot's own account; its username tells which `/cmd@name` commands are ours.
    pub async fn get_me(&self) -> Result<User> {
        let me: User = self.call("getMe", &serde_json::json!({})).await?;
        info!("Authenticated as @{} (id {})", me.username.as_deref().unwrap_or("?"), me.id);
        Ok(me)
    }

    /// Point Telegram at our webhook endpoint.
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        let _: IgnoredAny = self.call("setWebhook", &SetWebhookRequest { url }).await?;
        info!("Webhook registered with Telegram");
        Ok(())
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        debug!("sendMessage chat={} ({} chars)", chat_id, text.chars().count());
        let _: IgnoredAny = self
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id,
                    text,
                    disable_web_page_preview: true,
                },
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_UNITS) {
            self.send_message(chat_id, &chunk).await?;
        }
        Ok(())
    }
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Split `text` into pieces of at most `limit` UTF-16 code units (the unit
/// Telegram measures in), breaking on line boundaries where possible. A
/// single over-long line is hard-split between characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let mut line = line;
        // hard-split lines that can never fit
        while utf16_len(line) > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut used = 0;
            let cut = line
                .char_indices()
                .find(|&(_, c)| {
                    used += c.len_utf16();
                    used > limit
                })
                .map(|(i, _)| i)
                .unwrap_or(line.len());
            // a limit below one character's width still has to make progress
            let cut = if cut == 0 {
                line.chars().next().map(char::len_utf8).unwrap_or(line.len())
            } else {
                cut
            };
            chunks.push(line[..cut].to_string());
            line = &line[cut..];
        }

        let line_len = utf16_len(line);
        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + needed > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current_len += line_len;
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_split_short_message_untouched() {
        assert_eq!(split_message("a\nb", 10), vec!["a\nb".to_string()]);
        assert!(split_message("", 10).is_empty());
    }

    #[test]
    fn test_split_on_line_boundaries() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn test_split_long_line() {
        let chunks = split_message("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_counts_utf16_units() {
        // each 📅 is two UTF-16 units but four bytes
        let chunks = split_message("📅📅\n📅📅", 9);
        assert_eq!(chunks, vec!["📅📅\n📅📅".to_string()]);

        let chunks = split_message("📅📅\n📅📅", 5);
        assert_eq!(chunks, vec!["📅📅".to_string(), "📅📅".to_string()]);
    }

    #[test]
    fn test_split_emoji_line_stays_under_limit() {
        let line = "📅".repeat(3000);
        let chunks = split_message(&line, MAX_MESSAGE_UNITS);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| utf16_len(c) <= MAX_MESSAGE_UNITS));
        assert_eq!(chunks.concat(), line);
    }

    #[tokio::test]
    async fn test_send_message_posts_to_bot_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({
                "chat_id": 42,
                "text": "hello",
                "disable_web_page_preview": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::new(&server.uri(), "123:abc").unwrap();
        client.send_text(42, "hello").await.expect("send");
    }

    #[tokio::test]
    async fn test_api_error_surfaces_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/setWebhook"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "description": "Bad Request: bad webhook"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(&server.uri(), "123:abc").unwrap();
        let err = client.set_webhook("http://nope").await.unwrap_err();
        assert!(err.to_string().contains("bad webhook"));
    }

    #[tokio::test]
    async fn test_get_me_returns_username() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"id": 123, "is_bot": true, "first_name": "Picks", "username": "PicksBot"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::new(&server.uri(), "123:abc").unwrap();
        let me = client.get_me().await.expect("getMe");
        assert_eq!(me.id, 123);
        assert_eq!(me.username.as_deref(), Some("PicksBot"));
    }
}
