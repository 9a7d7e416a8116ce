use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::bot::{parse_command, CommandHandler};
use crate::telegram::{Messenger, Update};

/// Everything a webhook call needs, built once at startup.
#[derive(Clone)]
pub struct GatewayState {
    pub secret: String,
    /// Our own username; commands addressed to another `@bot` are ignored.
    pub bot_username: Option<String>,
    pub commands: Arc<dyn CommandHandler>,
    pub messenger: Arc<dyn Messenger>,
}

/// Build the Axum router for the webhook gateway.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook/:secret", post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Compare without short-circuiting on the first differing byte.
fn secrets_match(supplied: &str, expected: &str) -> bool {
    let (a, b) = (supplied.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// POST /webhook/:secret
///
/// Handler failures are logged and still acknowledged so Telegram does not
/// keep redelivering the same update.
async fn webhook_handler(
    State(state): State<Arc<GatewayState>>,
    Path(secret): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if !secrets_match(&secret, &state.secret) {
        warn!("Rejected webhook call with wrong secret");
        return Err((StatusCode::FORBIDDEN, Json(json!({ "detail": "forbidden" }))));
    }
    let update: Update = serde_json::from_slice(&body).map_err(|e| {
        warn!("Unparseable webhook payload: {}", e);
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": "invalid update" })))
    })?;

    if let Err(e) = dispatch(&state, &update).await {
        error!("Update {:?} failed: {:#}", update.update_id, e);
    }
    Ok(Json(json!({ "ok": true })))
}

async fn dispatch(state: &GatewayState, update: &Update) -> anyhow::Result<()> {
    let Some(message) = update.message() else {
        return Ok(());
    };
    let bot_username = state.bot_username.as_deref();
    let Some(command) = message
        .text
        .as_deref()
        .and_then(|text| parse_command(text, bot_username))
    else {
        return Ok(());
    };

    info!("Command /{} {:?} from chat {}", command.name, command.args, message.chat.id);
    if let Some(reply) = state.commands.handle(&command.name, &command.args).await? {
        state.messenger.send_text(message.chat.id, &reply).await?;
    }
    Ok(())
}
