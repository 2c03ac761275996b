//! Twilio WhatsApp webhook adapter
//!
//! Routes:
//! - `POST /webhook` form-encoded inbound message, TwiML reply
//! - `GET /logs` recent command log entries for the dashboard
//! - `GET /health`
//!
//! Every response, including axum's own 404/405 rejections, carries open CORS
//! headers; `OPTIONS` answers preflight with 204.

pub mod media;
pub mod twiml;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::application::messaging::CommandDispatcher;
use crate::domain::entities::{Attachment, CommandLogEntry, InboundMessage, LogStats};

pub use media::TwilioMediaFetcher;

pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Default number of entries returned by `GET /logs`
pub const DEFAULT_RECENT_LIMIT: usize = 10;
const MAX_RECENT_LIMIT: usize = 100;

/// Twilio delivers at most this many media items per message
const MAX_MEDIA_ITEMS: usize = 10;

/// Shared state for webhook handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CommandDispatcher>,
    pub recent_limit: usize,
}

impl AppState {
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            dispatcher,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// JSON `{error}` body. Webhook-level failures use status 500.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn twiml_response(reply: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/xml")],
        twiml::message_response(reply),
    )
        .into_response()
}

/// Build an inbound message from webhook form fields. Missing fields are empty.
pub fn inbound_from_form(fields: &HashMap<String, String>) -> InboundMessage {
    let field = |name: &str| fields.get(name).cloned().unwrap_or_default();
    let mut message = InboundMessage::new(field("Body"), field("From"), field("MessageSid"));

    let media_count = fields
        .get("NumMedia")
        .and_then(|n| n.trim().parse::<usize>().ok())
        .unwrap_or(0)
        .min(MAX_MEDIA_ITEMS);

    for index in 0..media_count {
        let Some(url) = fields.get(&format!("MediaUrl{}", index)) else {
            continue;
        };
        let mut attachment = Attachment::new(url.as_str());
        if let Some(content_type) = fields.get(&format!("MediaContentType{}", index)) {
            attachment = attachment.with_content_type(content_type.as_str());
        }
        message = message.with_attachment(attachment);
    }

    message
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler).options(preflight_handler))
        .route("/logs", get(logs_handler).options(preflight_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .with_state(state)
}

/// Serve the router until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Webhook listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}

async fn webhook_handler(
    State(state): State<AppState>,
    payload: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let Form(fields) = match payload {
        Ok(form) => form,
        Err(e) => {
            tracing::error!("Webhook error: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.body_text());
        }
    };

    let message = inbound_from_form(&fields);
    tracing::info!(
        "Received message {} from {} ({} attachments)",
        message.message_id,
        message.sender,
        message.attachments.len()
    );

    let reply = state.dispatcher.process(&message).await;
    twiml_response(&reply)
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub entries: Vec<CommandLogEntry>,
    pub stats: LogStats,
}

async fn logs_handler(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!("Rejected logs query: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.body_text());
        }
    };

    let limit = query.limit.unwrap_or(state.recent_limit).clamp(1, MAX_RECENT_LIMIT);

    match state.dispatcher.log().recent(limit).await {
        Ok(entries) => {
            let stats = LogStats::from_entries(&entries);
            Json(LogsResponse { entries, stats }).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to query command logs: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
