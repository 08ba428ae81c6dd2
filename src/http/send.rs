//! `/send` handlers.
//!
//! # Responsibilities
//! - Render the payload (formatter for the slug, or the default rendering)
//! - Resolve the slug to a topic channel
//! - Fall back to the default channel with a visible warning for unknown slugs
//! - Report delivery failures as 500 and to the health sink
//!
//! # Design Decisions
//! - A notification is delivered somewhere rather than dropped
//! - No retries; the caller sees the failure and decides
//! - Path slugs arrive percent-decoded and are re-derived before lookup

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
};
use thiserror::Error;

use crate::chat::ChatError;
use crate::formatters::PluginError;
use crate::http::message::{error_notice, render_body, unknown_topic_notice};
use crate::http::server::AppState;
use crate::observability::metrics::{self, DeliveryTarget};
use crate::routing::topic_key;

/// Errors that turn a request into a 500.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("formatter for '{slug}' failed: {source}")]
    Format {
        slug: String,
        #[source]
        source: PluginError,
    },

    #[error("failed to deliver to {}: {source}", .target.as_str())]
    Send {
        target: DeliveryTarget,
        #[source]
        source: ChatError,
    },
}

/// `POST /send`: deliver to the default channel.
pub async fn send_default(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    let result = dispatch(&state, None, &headers, body).await;
    finish(&state, None, result)
}

/// `POST /send/{slug}`: deliver to the topic channel for `slug`.
pub async fn send_to_topic(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    let result = dispatch(&state, Some(&slug), &headers, body).await;
    finish(&state, Some(&slug), result)
}

async fn dispatch(
    state: &AppState,
    slug: Option<&str>,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<(), DeliveryError> {
    let default_channel = state.store.snapshot().chat_id;

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let cause = rejection.body_text();
            // Best effort: let the group know something was lost.
            if let Err(e) = deliver(state, DeliveryTarget::Default, default_channel, &error_notice(&cause), None).await {
                tracing::error!(error = %e, "Failed to deliver error notice");
            }
            return Err(DeliveryError::Body(cause));
        }
    };

    let raw = String::from_utf8_lossy(&body);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let Some(slug) = slug else {
        let text = render_body(content_type, &raw);
        return deliver(state, DeliveryTarget::Default, default_channel, &text, None).await;
    };

    let key = topic_key(slug);
    let text = match state.formatters.resolve(&key) {
        Some(formatter) => formatter
            .format(&raw)
            .await
            .map_err(|source| DeliveryError::Format {
                slug: key.clone(),
                source,
            })?,
        None => render_body(content_type, &raw),
    };

    match state.store.topics().lookup(&key) {
        Some(thread_id) if thread_id != 0 => {
            deliver(state, DeliveryTarget::Topic, default_channel, &text, Some(thread_id)).await
        }
        _ => {
            tracing::warn!(slug = %slug, "Unknown topic, falling back to default channel");
            let notice = unknown_topic_notice(slug, &text);
            deliver(state, DeliveryTarget::Fallback, default_channel, &notice, None).await
        }
    }
}

async fn deliver(
    state: &AppState,
    target: DeliveryTarget,
    chat_id: i64,
    text: &str,
    thread_id: Option<i64>,
) -> Result<(), DeliveryError> {
    let result = state.chat.send_message(chat_id, text, thread_id).await;
    metrics::record_delivery(target, result.is_ok());
    result.map_err(|source| DeliveryError::Send { target, source })
}

fn finish(state: &AppState, slug: Option<&str>, result: Result<(), DeliveryError>) -> StatusCode {
    match result {
        Ok(()) => {
            tracing::debug!(slug = slug.unwrap_or("-"), "Notification delivered");
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(slug = slug.unwrap_or("-"), error = %e, "Notification failed");
            if let Some(health) = state.health.clone() {
                let message = e.to_string();
                tokio::spawn(async move { health.signal_failure(&message).await });
            }
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
