//! Known-fields flattener.
//!
//! Walks the aggregate tree in stable pre-order (parent before children,
//! properties in first-seen order) and produces one flat, path-addressed
//! summary per field. Array element shapes are not flattened into separate
//! paths; an array field yields a single entry.

use serde::Serialize;

use crate::bson_type::BsonType;
use crate::schema::{BranchStats, FieldPath, SchemaNode};

/// Flat summary of one field in the aggregate tree.
#[derive(Debug, Clone, Serialize)]
pub struct FieldEntry {
    /// Path segments addressing the field.
    pub path: FieldPath,

    /// Highest-occurrence type at this path (first-seen order breaks ties).
    pub bson_type: BsonType,

    /// Whether the field was absent from at least one document of its
    /// closest ancestor context.
    pub is_sparse: bool,

    /// Documents where the field was present, across any type.
    pub occurrence: u64,

    /// Parent-context documents considered.
    pub documents_inspected: u64,

    /// Documents where the field held the dominant type.
    pub type_occurrence: u64,
}

/// Flatten the aggregate tree into a list of field summaries.
///
/// # Arguments
/// * `root` - Aggregate tree produced by the accumulator
///
/// # Returns
/// * `Vec<FieldEntry>` - Entries in stable pre-order
pub fn flatten(root: &SchemaNode) -> Vec<FieldEntry> {
    let mut entries = Vec::new();
    flatten_properties(root, &FieldPath::root(), &mut entries);
    entries
}

fn flatten_properties(node: &SchemaNode, path: &FieldPath, entries: &mut Vec<FieldEntry>) {
    for branch in &node.branches {
        if let BranchStats::Object { properties, .. } = &branch.stats {
            for (name, child) in properties {
                let child_path = path.child(name);
                if let Some(dominant) = child.dominant_branch() {
                    entries.push(FieldEntry {
                        path: child_path.clone(),
                        bson_type: dominant.bson_type,
                        is_sparse: child.is_sparse(),
                        occurrence: child.occurrence,
                        documents_inspected: child.documents_inspected,
                        type_occurrence: dominant.type_occurrence,
                    });
                }
                // Recurse into any observed object shape; the entry for the
                // object field itself was already emitted above.
                flatten_properties(child, &child_path, entries);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::accumulate;
    use bson::doc;

    #[test]
    fn test_flatten_preorder() {
        let tree = accumulate(&[doc! {
            "name": "ada",
            "address": { "city": "london", "zip": "n1" },
            "age": 36,
        }]);
        let entries = flatten(&tree);
        let paths: Vec<String> = entries.iter().map(|e| e.path.display()).collect();

        assert_eq!(
            paths,
            vec!["name", "address", "address.city", "address.zip", "age"]
        );
    }

    #[test]
    fn test_dominant_type_highest_occurrence() {
        let tree = accumulate(&[
            doc! { "v": 1 },
            doc! { "v": "one" },
            doc! { "v": 2 },
        ]);
        let entries = flatten(&tree);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bson_type, BsonType::Int32);
        assert_eq!(entries[0].type_occurrence, 2);
        assert_eq!(entries[0].occurrence, 3);
    }

    #[test]
    fn test_dominant_tie_keeps_first_seen() {
        let tree = accumulate(&[doc! { "v": "one" }, doc! { "v": 1 }]);
        let entries = flatten(&tree);

        assert_eq!(entries[0].bson_type, BsonType::String);
    }

    #[test]
    fn test_sparse_field() {
        let tree = accumulate(&[doc! { "a": 1, "b": 2 }, doc! { "a": 3 }]);
        let entries = flatten(&tree);

        let a = entries.iter().find(|e| e.path.display() == "a").unwrap();
        let b = entries.iter().find(|e| e.path.display() == "b").unwrap();
        assert!(!a.is_sparse);
        assert!(b.is_sparse);
        assert_eq!(b.documents_inspected, 2);
    }

    #[test]
    fn test_nested_sparsity_uses_parent_context() {
        // "meta" is an object in only one of three documents; its child is
        // measured against that single inspected parent, not the sample.
        let tree = accumulate(&[
            doc! { "meta": { "k": 1 } },
            doc! { "other": 1 },
            doc! { "other": 2 },
        ]);
        let entries = flatten(&tree);

        let k = entries
            .iter()
            .find(|e| e.path.display() == "meta.k")
            .unwrap();
        assert_eq!(k.documents_inspected, 1);
        assert!(!k.is_sparse);
    }

    #[test]
    fn test_array_emits_single_entry() {
        let tree = accumulate(&[doc! { "tags": [{ "label": "x" }] }]);
        let entries = flatten(&tree);
        let paths: Vec<String> = entries.iter().map(|e| e.path.display()).collect();

        // Element shapes stay inside the array branch
        assert_eq!(paths, vec!["tags"]);
    }
}
