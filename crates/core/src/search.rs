//! Contact search helpers and pagination clamps.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API/repository layer and any future CLI or worker tooling.
//!
//! Contact search is a case-insensitive substring match over a denormalized
//! `search_text` column (name, email, company, job title concatenated). The
//! helpers here build that column value and the `ILIKE` pattern for it.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows per list page.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows per list page.
pub const MAX_LIST_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// Search text
// ---------------------------------------------------------------------------

/// Build the denormalized `search_text` value from the searchable fields of
/// a contact. Lowercased, whitespace-normalized, empty parts dropped.
///
/// # Examples
///
/// ```
/// use hiperflow_core::search::build_search_text;
/// let text = build_search_text(&[Some("Ana  Ruiz"), None, Some("ACME Corp")]);
/// assert_eq!(text, "ana ruiz acme corp");
/// ```
pub fn build_search_text(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .flat_map(|p| p.split_whitespace())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a raw user query into an `ILIKE` substring pattern.
///
/// LIKE metacharacters in the query are escaped so they match literally.
/// Empty or whitespace-only input returns `None` (callers skip the filter).
///
/// # Examples
///
/// ```
/// use hiperflow_core::search::build_like_pattern;
/// assert_eq!(build_like_pattern("ana"), Some("%ana%".to_string()));
/// assert_eq!(build_like_pattern("100%"), Some("%100\\%%".to_string()));
/// assert_eq!(build_like_pattern("   "), None);
/// ```
pub fn build_like_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(trimmed.len() + 2);
    escaped.push('%');
    for c in trimmed.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

// ---------------------------------------------------------------------------
// Pagination clamps
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- build_search_text ---------------------------------------------------

    #[test]
    fn search_text_lowercases_and_joins() {
        let text = build_search_text(&[Some("Ana Ruiz"), Some("ana@acme.io"), Some("ACME")]);
        assert_eq!(text, "ana ruiz ana@acme.io acme");
    }

    #[test]
    fn search_text_skips_missing_parts() {
        let text = build_search_text(&[Some("Ana"), None, None, Some("CTO")]);
        assert_eq!(text, "ana cto");
    }

    #[test]
    fn search_text_normalizes_inner_whitespace() {
        let text = build_search_text(&[Some("  Ana\t Ruiz  ")]);
        assert_eq!(text, "ana ruiz");
    }

    #[test]
    fn search_text_of_nothing_is_empty() {
        assert_eq!(build_search_text(&[None, Some("   ")]), "");
    }

    // -- build_like_pattern --------------------------------------------------

    #[test]
    fn like_pattern_wraps_query() {
        assert_eq!(build_like_pattern("ruiz"), Some("%ruiz%".to_string()));
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(build_like_pattern("a_b"), Some("%a\\_b%".to_string()));
        assert_eq!(build_like_pattern("50%"), Some("%50\\%%".to_string()));
        assert_eq!(build_like_pattern("c\\d"), Some("%c\\\\d%".to_string()));
    }

    #[test]
    fn like_pattern_empty_returns_none() {
        assert_eq!(build_like_pattern(""), None);
        assert_eq!(build_like_pattern("  \t "), None);
    }

    // -- clamp_limit ---------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 50);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(500), DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 200);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 50, 200), 1);
        assert_eq!(clamp_limit(Some(0), 50, 200), 1);
    }

    // -- clamp_offset --------------------------------------------------------

    #[test]
    fn clamp_offset_defaults_to_zero() {
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
    }
}
