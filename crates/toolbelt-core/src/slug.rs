//! URL-safe slug generation

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("string should not be empty")]
    EmptyInput,

    #[error("given string produces empty slug")]
    EmptyResult,
}

/// Normalize arbitrary text into a URL-safe slug.
///
/// Lowercases the input, replaces every maximal run of characters outside
/// `[a-z0-9]` with a single `-`, and trims leading/trailing dashes.
pub fn slugify(s: &str) -> Result<String, SlugError> {
    if s.is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let lowered = s.to_lowercase();
    let replaced = NON_SLUG_RUN.replace_all(&lowered, "-");
    let slug = replaced.trim_matches('-');

    if slug.is_empty() {
        return Err(SlugError::EmptyResult);
    }

    Ok(slug.to_string())
}
