//! Field-level validation shared by every entity type.
//!
//! Validation is pure: helpers accumulate violations into a
//! [`Violations`] map and never touch I/O. The repository DTOs carry
//! `validator` derives for required/length rules; the helpers here cover
//! what derives cannot express (enum membership, tag shape, cross-field
//! rules) and convert `validator` output into the same map so handlers
//! deal with a single shape.

use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Ceiling for names and titles.
pub const MAX_NAME_LEN: usize = 200;

/// Ceiling for descriptions and note content.
pub const MAX_TEXT_LEN: usize = 10_000;

/// Ceiling for a single tag.
pub const MAX_TAG_LEN: usize = 50;

/// Maximum number of tags per entity.
pub const MAX_TAGS: usize = 32;

// ---------------------------------------------------------------------------
// Violations map
// ---------------------------------------------------------------------------

/// Accumulated validation failures, keyed by field name.
///
/// Serializes as `{ "field": ["message", ...] }` — the structured body the
/// API returns with a 422.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Violations(pub BTreeMap<String, Vec<String>>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `validator` derive output into this map.
    pub fn absorb(&mut self, errors: validator::ValidationErrors) {
        for (field, kind_errors) in errors.field_errors() {
            for err in kind_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed rule: {}", err.code));
                self.push(field.as_ref(), message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Required string field: must contain at least one non-whitespace char.
pub fn require_non_blank(out: &mut Violations, field: &str, value: &str) {
    if value.trim().is_empty() {
        out.push(field, "must not be blank");
    }
}

/// Optional bounded text field.
pub fn check_max_len(out: &mut Violations, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        out.push(field, format!("must be at most {max} characters"));
    }
}

/// Enum membership against a list of allowed lowercase spellings.
pub fn check_one_of(out: &mut Violations, field: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        out.push(field, format!("must be one of: {}", allowed.join(", ")));
    }
}

/// Tag list shape: bounded count, each tag non-blank and bounded.
pub fn check_tags(out: &mut Violations, field: &str, tags: &[String]) {
    if tags.len() > MAX_TAGS {
        out.push(field, format!("at most {MAX_TAGS} tags allowed"));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            out.push(field, "tags must not be blank");
            break;
        }
    }
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LEN) {
        out.push(field, format!("each tag must be at most {MAX_TAG_LEN} characters"));
    }
}

/// Inclusive numeric range check.
pub fn check_range(out: &mut Violations, field: &str, value: i64, min: i64, max: i64) {
    if value < min || value > max {
        out.push(field, format!("must be between {min} and {max}"));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_field_is_reported() {
        let mut v = Violations::new();
        require_non_blank(&mut v, "name", "   ");
        assert!(!v.is_empty());
        assert_eq!(v.0["name"], vec!["must not be blank"]);
    }

    #[test]
    fn non_blank_field_passes() {
        let mut v = Violations::new();
        require_non_blank(&mut v, "name", "Strahd");
        assert!(v.is_empty());
    }

    #[test]
    fn overlong_field_is_reported() {
        let mut v = Violations::new();
        check_max_len(&mut v, "name", &"x".repeat(MAX_NAME_LEN + 1), MAX_NAME_LEN);
        assert_eq!(v.0["name"].len(), 1);
    }

    #[test]
    fn enum_membership() {
        let mut v = Violations::new();
        check_one_of(&mut v, "kind", "villain", &["pc", "npc", "villain", "ally"]);
        assert!(v.is_empty());

        check_one_of(&mut v, "kind", "monster", &["pc", "npc", "villain", "ally"]);
        assert!(!v.is_empty());
    }

    #[test]
    fn tag_limits() {
        let mut v = Violations::new();
        let too_many: Vec<String> = (0..MAX_TAGS + 1).map(|i| format!("t{i}")).collect();
        check_tags(&mut v, "tags", &too_many);
        assert!(!v.is_empty());

        let mut v = Violations::new();
        check_tags(&mut v, "tags", &["undead".into(), "  ".into()]);
        assert_eq!(v.0["tags"], vec!["tags must not be blank"]);

        let mut v = Violations::new();
        check_tags(&mut v, "tags", &["x".repeat(MAX_TAG_LEN + 1)]);
        assert!(!v.is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut v = Violations::new();
        check_range(&mut v, "session_number", 0, 0, 10_000);
        check_range(&mut v, "session_number", 10_000, 0, 10_000);
        assert!(v.is_empty());

        check_range(&mut v, "session_number", -1, 0, 10_000);
        assert!(!v.is_empty());
    }

    #[test]
    fn multiple_violations_accumulate_per_field() {
        let mut v = Violations::new();
        require_non_blank(&mut v, "title", "");
        v.push("title", "second problem");
        assert_eq!(v.0["title"].len(), 2);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut v = Violations::new();
        v.push("name", "must not be blank");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({ "name": ["must not be blank"] }));
    }
}
