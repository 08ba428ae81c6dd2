//! MarkdownV2 helpers.

/// Characters with a meaning in MarkdownV2 outside code entities.
const RESERVED: &str = "\\_*[]()~`>#+-=|{}.!";

/// Escape `text` so it renders literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        if RESERVED.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap raw text in a fenced code block.
pub fn code_block(text: &str) -> String {
    format!("```\n{}\n```", text)
}

/// Wrap text in an inline code span. Inside code only `` ` `` and `\` are special.
pub fn code_span(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('`');
    for c in text.chars() {
        if c == '`' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('`');
    out
}
