//! Message text composition.

use crate::chat::markdown::{code_block, code_span, escape};

/// Render a raw payload for the chat.
///
/// JSON bodies go verbatim into a code block; anything else is escaped.
pub fn render_body(content_type: Option<&str>, raw: &str) -> String {
    if content_type.is_some_and(|ct| ct.contains("json")) {
        code_block(raw)
    } else {
        escape(raw)
    }
}

/// Notice sent to the default channel when a slug matches no topic.
pub fn unknown_topic_notice(slug: &str, body: &str) -> String {
    format!(
        "⚠️ *Warning*\ntopic {} does not exist\n\n{}",
        code_span(slug),
        body
    )
}

/// Notice sent to the default channel when a request could not be processed.
pub fn error_notice(cause: &str) -> String {
    format!("*An error occurred*\n\n{}", escape(cause))
}
