//! HTTP surface: manager webhook, hosted-bot webhooks and health checks.
//!
//! In webhook mode a single axum server receives everything:
//! - `POST /webhook/main`     - manager bot updates (teloxide listener)
//! - `POST /webhook/:token`   - hosted bot updates, routed by token
//! - `GET  /health`           - liveness probe
//!
//! In polling mode only the health route is served.

use std::net::SocketAddr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use teloxide::prelude::*;
use teloxide::types::Update;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::{info, warn};
use url::Url;

use super::dispatcher::{AppState, ThrottledBot};
use crate::config::Config;
use crate::registry::HostError;
use crate::utils::mask_token;

/// Start the manager bot in webhook mode.
///
/// Registers the manager webhook with Telegram, mounts the hosted-bot
/// and health routes on the same server, and dispatches updates until
/// shutdown. `deleteWebhook` is called automatically on shutdown.
pub async fn run_webhook(
    config: &Config,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    bot: ThrottledBot,
    state: AppState,
) {
    let webhook_url = config
        .manager_webhook_url()
        .expect("WEBHOOK_BASE_URL must be set when using webhook mode");
    let url = Url::parse(&webhook_url).expect("Invalid WEBHOOK_BASE_URL format");

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let options = Options::new(address, url.clone());

    info!("Setting manager webhook URL: {}", url);
    info!("Listening on: {}", address);

    // The teloxide helper registers the webhook and hands back the update
    // listener plus a bare router for the manager route; hosted-bot and
    // health routes are merged onto the same server.
    let (listener, stop_flag, manager_router) =
        webhooks::axum_to_router(bot.inner().clone(), options)
            .await
            .expect("Failed to setup manager webhook");

    let app = Router::new()
        .route("/health", get(health))
        .route("/webhook/:token", post(hosted_webhook))
        .with_state(state)
        .merge(manager_router);

    tokio::spawn(async move {
        let tcp = tokio::net::TcpListener::bind(address)
            .await
            .expect("Failed to bind webhook address");
        if let Err(e) = axum::serve(tcp, app)
            .with_graceful_shutdown(stop_flag)
            .await
        {
            warn!("Webhook server error: {}", e);
        }
    });

    info!("Webhook setup complete, waiting for updates...");

    let error_handler = LoggingErrorHandler::with_custom_text("Error from update listener");
    dispatcher
        .dispatch_with_listener(listener, error_handler)
        .await;
}

/// Serve `/health` alone (polling mode).
pub fn spawn_health_server(port: u16, state: AppState) {
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health))
        .with_state(state);

    tokio::spawn(async move {
        let tcp = match tokio::net::TcpListener::bind(address).await {
            Ok(tcp) => tcp,
            Err(e) => {
                warn!("Failed to bind health server on {}: {}", address, e);
                return;
            }
        };
        info!("Health server listening on {}", address);
        if let Err(e) = axum::serve(tcp, app).await {
            warn!("Health server error: {}", e);
        }
    });
}

/// Liveness probe.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "hosted_bots": state.hosted.len(),
    }))
}

/// Webhook endpoint for hosted bots, routed by token.
async fn hosted_webhook(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(update): Json<Update>,
) -> StatusCode {
    match state
        .hosted
        .process_update(&token, update, state.hosted_ctx())
        .await
    {
        Ok(()) => StatusCode::OK,
        Err(HostError::NotFound) => StatusCode::NOT_FOUND,
        Err(e) => {
            warn!("Hosted update failed for {}: {}", mask_token(&token), e);
            // 200 anyway: Telegram retries non-2xx responses and a broken
            // handler must not trigger a redelivery storm.
            StatusCode::OK
        }
    }
}
