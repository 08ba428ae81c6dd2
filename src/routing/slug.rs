//! Slug derivation.
//!
//! A slug is the lower-cased, percent-encoded form of a topic name. Every
//! lookup key, whether it comes from a topic name, an explicit slug in the
//! configuration document, a formatter module or a request path, goes
//! through [`topic_key`], so all of them land in the same key space.

/// Derive a slug from a display name.
pub fn slugify(name: &str) -> String {
    urlencoding::encode(name.trim()).to_lowercase()
}

/// Canonical lookup key for a name or slug, encoded or not.
///
/// `Team Ops`, `team%20ops` and `TEAM%20OPS` all map to `team%20ops`. Text
/// that is not valid percent-encoding is taken literally.
pub fn topic_key(slug: &str) -> String {
    let trimmed = slug.trim();
    match urlencoding::decode(trimmed) {
        Ok(decoded) => slugify(&decoded),
        Err(_) => slugify(trimmed),
    }
}
