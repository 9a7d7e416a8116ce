use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod bot;
mod config;
mod gateway;
mod scores;
mod telegram;

use bot::PicksBot;
use config::Config;
use gateway::GatewayState;
use scores::{EspnScoreboard, ReportBuilder};
use telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    let token = config
        .bot_token()
        .context("TELEGRAM_BOT_TOKEN is not set")?;

    // Build the scoreboard source and the report pipeline on top of it
    let fetcher = EspnScoreboard::new(
        &config.scoreboard_base_url,
        Duration::from_secs(config.fetch_timeout_secs),
    )?;
    let reports = ReportBuilder::new(Arc::new(fetcher));
    info!(
        "Scoreboard source: {} (timeout {}s)",
        config.scoreboard_base_url, config.fetch_timeout_secs
    );

    // One Telegram client for the whole process, handed to the gateway
    let telegram = Arc::new(TelegramClient::new(&config.telegram_api_url, token)?);
    let me = telegram
        .get_me()
        .await
        .context("Failed to look up the bot account (is TELEGRAM_BOT_TOKEN valid?)")?;

    match config.webhook_url() {
        Some(url) => telegram
            .set_webhook(&url)
            .await
            .context("Failed to register webhook")?,
        None => warn!("No PUBLIC_URL/RENDER_EXTERNAL_URL set; webhook not registered"),
    }

    let app = gateway::router(GatewayState {
        secret: config.secret().to_string(),
        bot_username: me.username,
        commands: Arc::new(PicksBot::new(reports)),
        messenger: telegram,
    });

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {:?}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Webhook gateway listening on http://{}", addr);

    // Run gateway server (blocks until shutdown)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down cleanly");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
