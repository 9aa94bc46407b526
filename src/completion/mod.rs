//! Editor completion records for known fields.
//!
//! Converts flattened field summaries into completion data an editor can
//! insert directly:
//! - `insert_text` is quote-safe: anything that is not a single valid bare
//!   identifier is quoted, with `\` and `"` escaped
//! - `reference_text` is a `$`-prefixed path only when every segment is a
//!   valid identifier; otherwise an explicit `$getField` expression chain is
//!   emitted, since a bare `$`-path cannot address such fields unambiguously

use serde::Serialize;

use crate::bson_type::BsonType;
use crate::fields::FieldEntry;
use crate::schema::FieldPath;
use crate::utils::string::{is_valid_identifier, quote_escaped};

/// Completion record for one known field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldCompletionData {
    /// Unescaped path, for display.
    pub field_name: String,

    /// Display name of the dominant type.
    pub display_type: String,

    /// Dominant type tag.
    pub bson_type: BsonType,

    /// Whether the field is absent from some documents.
    pub is_sparse: bool,

    /// Literal form safe to insert as a document key.
    pub insert_text: String,

    /// Reference to the field in a query/aggregation expression.
    pub reference_text: String,
}

/// Convert flattened field entries into completion records.
pub fn to_completions(entries: &[FieldEntry]) -> Vec<FieldCompletionData> {
    entries
        .iter()
        .map(|entry| FieldCompletionData {
            field_name: entry.path.display(),
            display_type: entry.bson_type.name().to_string(),
            bson_type: entry.bson_type,
            is_sparse: entry.is_sparse,
            insert_text: insert_text(&entry.path),
            reference_text: reference_text(&entry.path),
        })
        .collect()
}

/// Key form for literal insertion into a document.
///
/// Bare only for a single valid identifier segment; everything else
/// (nested paths, dashes, brackets, quotes, leading digits) is quoted
/// with `\` and `"` escaped.
fn insert_text(path: &FieldPath) -> String {
    match path.segments() {
        [only] if is_valid_identifier(only) => only.clone(),
        _ => quote_escaped(&path.display()),
    }
}

/// Query-expression reference to the field.
fn reference_text(path: &FieldPath) -> String {
    if !path.is_empty() && path.segments().iter().all(|s| is_valid_identifier(s)) {
        return format!("${}", path.display());
    }

    // Segments that are not valid identifiers (a literal dot, quotes, a
    // leading digit) cannot ride a bare `$`-path; chain explicit field
    // accesses from the root instead.
    let mut expr = "\"$$ROOT\"".to_string();
    for segment in path.segments() {
        expr = format!(
            "{{ \"$getField\": {{ \"field\": {}, \"input\": {} }} }}",
            quote_escaped(segment),
            expr
        );
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::flatten;
    use crate::schema::accumulate;
    use bson::doc;

    fn completions_for(docs: &[bson::Document]) -> Vec<FieldCompletionData> {
        to_completions(&flatten(&accumulate(docs)))
    }

    fn find<'a>(list: &'a [FieldCompletionData], name: &str) -> &'a FieldCompletionData {
        list.iter().find(|c| c.field_name == name).unwrap()
    }

    #[test]
    fn test_plain_identifier_stays_bare() {
        let list = completions_for(&[doc! { "name": "ada" }]);
        let c = find(&list, "name");

        assert_eq!(c.insert_text, "name");
        assert_eq!(c.reference_text, "$name");
        assert_eq!(c.display_type, "String");
        assert!(!c.is_sparse);
    }

    #[test]
    fn test_nested_path_quoted_but_referencable() {
        let list = completions_for(&[doc! { "address": { "city": "london" } }]);
        let c = find(&list, "address.city");

        assert_eq!(c.insert_text, "\"address.city\"");
        assert_eq!(c.reference_text, "$address.city");
    }

    #[test]
    fn test_dash_needs_quoting_and_get_field() {
        let list = completions_for(&[doc! { "order-items": 3 }]);
        let c = find(&list, "order-items");

        assert_eq!(c.insert_text, "\"order-items\"");
        assert_eq!(
            c.reference_text,
            "{ \"$getField\": { \"field\": \"order-items\", \"input\": \"$$ROOT\" } }"
        );
    }

    #[test]
    fn test_embedded_quote_is_escaped() {
        let list = completions_for(&[doc! { "say\"hi\"": 1 }]);
        let c = find(&list, "say\"hi\"");

        assert_eq!(c.insert_text, "\"say\\\"hi\\\"\"");
        assert!(c.reference_text.contains("\"say\\\"hi\\\"\""));
    }

    #[test]
    fn test_leading_digit_needs_quoting() {
        let list = completions_for(&[doc! { "123abc": 1 }]);
        let c = find(&list, "123abc");

        assert_eq!(c.insert_text, "\"123abc\"");
        assert!(c.reference_text.starts_with("{ \"$getField\""));
    }

    #[test]
    fn test_unsafe_segment_inside_nested_path_chains_get_field() {
        let list = completions_for(&[doc! { "meta": { "a.b": 1 } }]);
        let c = find(&list, "meta.a.b");

        assert_eq!(
            c.reference_text,
            "{ \"$getField\": { \"field\": \"a.b\", \"input\": \
             { \"$getField\": { \"field\": \"meta\", \"input\": \"$$ROOT\" } } } }"
        );
    }

    #[test]
    fn test_sparse_flag_passes_through() {
        let list = completions_for(&[doc! { "a": 1 }, doc! { "b": 2 }]);
        assert!(find(&list, "a").is_sparse);
        assert!(find(&list, "b").is_sparse);
    }
}
