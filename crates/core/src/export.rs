//! Campaign export/import envelope types and CSV helpers.
//!
//! The JSON export is a portable snapshot: a `meta` block, the campaign
//! record, and one array per included entity type. CSV exports are built
//! manually (quote fields containing delimiters, double embedded quotes)
//! so the output stays dependency-free and predictable.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Version stamp written into every export envelope.
pub const EXPORT_VERSION: &str = "1";

/// Source string written into every export envelope.
pub const EXPORT_SOURCE: &str = "questlog";

/// Metadata block of a JSON export envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMeta {
    /// Envelope format version (see [`EXPORT_VERSION`]).
    pub version: String,
    /// UTC timestamp of the export.
    pub exported_at: Timestamp,
    /// Producing system (see [`EXPORT_SOURCE`]).
    pub source: String,
}

/// Top-level keys that must be present for an envelope to be importable.
pub const REQUIRED_KEYS: &[&str] = &["meta", "campaign"];

/// Per-entity-type collection keys an envelope may carry.
pub const COLLECTION_KEYS: &[&str] = &[
    "characters",
    "locations",
    "items",
    "notes",
    "relationships",
    "timeline_events",
    "quests",
    "maps",
    "dice_rolls",
];

// ---------------------------------------------------------------------------
// Import validation
// ---------------------------------------------------------------------------

/// Result of checking an uploaded envelope before import.
///
/// Only key presence and collection shape are checked; the content of the
/// records is not validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportValidationReport {
    /// Whether the envelope can be imported.
    pub is_valid: bool,
    /// Collection keys present in the envelope.
    pub collections: Vec<String>,
    /// Blocking problems (missing required keys, malformed collections).
    pub errors: Vec<String>,
    /// Non-blocking observations (unknown keys).
    pub warnings: Vec<String>,
}

/// Validate the shape of an import envelope.
///
/// Checks that every [`REQUIRED_KEYS`] entry is present, that any
/// collection key holds an array, and reports unrecognised top-level keys
/// as warnings.
pub fn validate_import_envelope(envelope: &serde_json::Value) -> ImportValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut collections = Vec::new();

    let Some(map) = envelope.as_object() else {
        return ImportValidationReport {
            is_valid: false,
            collections,
            errors: vec!["envelope must be a JSON object".to_string()],
            warnings,
        };
    };

    for &key in REQUIRED_KEYS {
        if !map.contains_key(key) {
            errors.push(format!("missing required key: {key}"));
        }
    }

    for (key, value) in map {
        if COLLECTION_KEYS.contains(&key.as_str()) {
            if value.is_array() {
                collections.push(key.clone());
            } else {
                errors.push(format!("key {key} must be an array"));
            }
        } else if !REQUIRED_KEYS.contains(&key.as_str()) {
            warnings.push(format!("unknown key: {key}"));
        }
    }

    ImportValidationReport {
        is_valid: errors.is_empty(),
        collections,
        errors,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// CSV helpers
// ---------------------------------------------------------------------------

/// Quote a single CSV field if needed.
///
/// Fields containing a comma, double quote, or newline are wrapped in
/// double quotes with embedded quotes doubled.
pub fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join escaped fields into one CSV record (no trailing newline).
pub fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build a full CSV document: header row plus one row per record.
pub fn csv_document(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&csv_row(
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    ));
    out.push('\n');
    for row in rows {
        out.push_str(&csv_row(row));
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- csv -----------------------------------------------------------------

    #[test]
    fn plain_field_is_untouched() {
        assert_eq!(csv_escape("Strahd"), "Strahd");
    }

    #[test]
    fn field_with_comma_is_quoted() {
        assert_eq!(csv_escape("sword, rusty"), "\"sword, rusty\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(csv_escape("the \"Fang\""), "\"the \"\"Fang\"\"\"");
    }

    #[test]
    fn field_with_newline_is_quoted() {
        assert_eq!(csv_escape("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn row_joins_with_commas() {
        let row = csv_row(&["a".to_string(), "b,c".to_string()]);
        assert_eq!(row, "a,\"b,c\"");
    }

    #[test]
    fn document_has_header_and_rows() {
        let doc = csv_document(
            &["id", "name"],
            &[vec!["1".to_string(), "Ireena".to_string()]],
        );
        assert_eq!(doc, "id,name\n1,Ireena\n");
    }

    // -- import validation ---------------------------------------------------

    #[test]
    fn valid_envelope_passes() {
        let envelope = serde_json::json!({
            "meta": { "version": "1" },
            "campaign": { "name": "Curse of Strahd" },
            "characters": [],
            "notes": [{ "title": "Session 0" }],
        });
        let report = validate_import_envelope(&envelope);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.collections.contains(&"characters".to_string()));
        assert!(report.collections.contains(&"notes".to_string()));
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let envelope = serde_json::json!({ "campaign": {} });
        let report = validate_import_envelope(&envelope);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["missing required key: meta"]);
    }

    #[test]
    fn non_array_collection_is_an_error() {
        let envelope = serde_json::json!({
            "meta": {},
            "campaign": {},
            "characters": "not-an-array",
        });
        let report = validate_import_envelope(&envelope);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["key characters must be an array"]);
    }

    #[test]
    fn unknown_key_is_a_warning_only() {
        let envelope = serde_json::json!({
            "meta": {},
            "campaign": {},
            "sessions": [],
        });
        let report = validate_import_envelope(&envelope);
        assert!(report.is_valid);
        assert_eq!(report.warnings, vec!["unknown key: sessions"]);
    }

    #[test]
    fn non_object_envelope_is_rejected() {
        let report = validate_import_envelope(&serde_json::json!([1, 2, 3]));
        assert!(!report.is_valid);
    }
}
