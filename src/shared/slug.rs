//! Slug generation for catalog collections (categories, tools, tags).
//!
//! A slug is derived from a display name and must be unique inside its
//! collection. Generation is a pure function of the name and the set of slugs
//! already taken; reserving the result is left to the caller's write path.

use std::collections::HashSet;

use thiserror::Error;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::shared::constants::SLUG_BASE_MAX_LENGTH;
use crate::shared::validation::SLUG_REGEX;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("'{0}' does not contain any letter or digit usable in a slug")]
    InvalidInput(String),
}

/// Latin letters that do not decompose under NFD
fn transliterate(c: char) -> Option<&'static str> {
    match c {
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ø' => Some("o"),
        'đ' | 'ð' => Some("d"),
        'ł' => Some("l"),
        'þ' => Some("th"),
        'ı' => Some("i"),
        _ => None,
    }
}

/// Normalize a display name into its base slug (no collision suffix).
///
/// Lower-cases, strips diacritics, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen and trims hyphens at both ends. The result
/// is capped at [`SLUG_BASE_MAX_LENGTH`] bytes.
pub fn base_slug(name: &str) -> Result<String, SlugError> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    let mut push = |c: char, slug: &mut String| {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    };

    for c in name.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match transliterate(c) {
            Some(replacement) => replacement.chars().for_each(|r| push(r, &mut slug)),
            None => push(c, &mut slug),
        }
    }

    // Leave room for a `-N` suffix within the column width
    if slug.len() > SLUG_BASE_MAX_LENGTH {
        slug.truncate(SLUG_BASE_MAX_LENGTH);
        slug.truncate(slug.trim_end_matches('-').len());
    }

    if slug.is_empty() {
        return Err(SlugError::InvalidInput(name.to_string()));
    }

    Ok(slug)
}

/// Derive a slug for `name` that is not contained in `existing`.
///
/// The base slug is returned as-is when free; otherwise `-2`, `-3`, ... are
/// appended and the first candidate absent from `existing` wins.
pub fn generate(name: &str, existing: &HashSet<String>) -> Result<String, SlugError> {
    let base = base_slug(name)?;

    if !existing.contains(&base) {
        return Ok(base);
    }

    let mut suffix: u64 = 2;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !existing.contains(&candidate) {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

/// Whether `slug` is lowercase kebab-case, as required for explicit overrides
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}
