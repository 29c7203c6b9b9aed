//! Search constants and query helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and any future CLI tooling.

// ---------------------------------------------------------------------------
// Result caps
// ---------------------------------------------------------------------------

/// Maximum rows returned per entity type by a free-text or tag search.
pub const RESULTS_PER_TYPE: i64 = 10;

/// Default number of rows for paginated list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows for paginated list endpoints.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Minimum query length before a search is executed.
pub const MIN_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Entity type constants
// ---------------------------------------------------------------------------

/// Entity types covered by unified search, in export/display order.
pub const SEARCHABLE_ENTITY_TYPES: &[&str] = &[
    "character",
    "location",
    "item",
    "note",
    "timeline_event",
    "quest",
    "map",
];

/// Check whether an entity type participates in search.
pub fn is_searchable_entity_type(entity_type: &str) -> bool {
    SEARCHABLE_ENTITY_TYPES.contains(&entity_type)
}

// ---------------------------------------------------------------------------
// LIKE pattern helpers
// ---------------------------------------------------------------------------

/// Escape a user-supplied term for use inside a `LIKE`/`ILIKE` pattern.
///
/// `%`, `_`, and the escape character `\` are escaped so user input always
/// matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the `%term%` substring pattern for an escaped term.
///
/// Returns `None` for queries too short to be useful.
pub fn contains_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return None;
    }
    Some(format!("%{}%", escape_like(trimmed)))
}

// ---------------------------------------------------------------------------
// Pagination helpers
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
