//! Human-readable per-field descriptions.
//!
//! Produces summaries like `"Int32 · 95% · range: 18–95"` from the
//! accumulated statistics. Polymorphic fields list their display types in
//! descending occurrence order (`"Int32 | String · 95% · ..."`) and carry
//! the suffix of the dominant branch only.

use chrono::TimeZone;

use crate::bson_type::format_double;
use crate::schema::{BranchStats, FieldPath, SchemaNode, TypeBranch};

/// Fill in `description` on every field node of the tree.
pub fn describe(root: &mut SchemaNode) {
    for branch in &mut root.branches {
        if let BranchStats::Object { properties, .. } = &mut branch.stats {
            for (_, child) in properties.iter_mut() {
                child.description = field_description(child);
                describe(child);
            }
        }
    }
}

/// Compute the path→description mapping without mutating the tree,
/// in stable pre-order.
pub fn descriptions(root: &SchemaNode) -> Vec<(FieldPath, String)> {
    let mut out = Vec::new();
    collect(root, &FieldPath::root(), &mut out);
    out
}

fn collect(node: &SchemaNode, path: &FieldPath, out: &mut Vec<(FieldPath, String)>) {
    for branch in &node.branches {
        if let BranchStats::Object { properties, .. } = &branch.stats {
            for (name, child) in properties {
                let child_path = path.child(name);
                if let Some(text) = field_description(child) {
                    out.push((child_path.clone(), text));
                }
                collect(child, &child_path, out);
            }
        }
    }
}

/// Description for a single field node, if it has observed branches.
pub fn field_description(node: &SchemaNode) -> Option<String> {
    if node.branches.is_empty() || node.documents_inspected == 0 {
        return None;
    }

    let sorted = node.branches_by_occurrence();
    let types = sorted
        .iter()
        .map(|b| b.bson_type.name())
        .collect::<Vec<_>>()
        .join(" | ");

    let percentage =
        (100.0 * node.occurrence as f64 / node.documents_inspected as f64).round() as u64;

    let mut text = format!("{types} · {percentage}%");
    if let Some(suffix) = branch_suffix(sorted[0]) {
        text.push_str(" · ");
        text.push_str(&suffix);
    }
    Some(text)
}

/// Type-specific suffix for the dominant branch.
fn branch_suffix(branch: &TypeBranch) -> Option<String> {
    match &branch.stats {
        BranchStats::Numeric { min, max } if min <= max => Some(format!(
            "range: {}–{}",
            format_double(*min),
            format_double(*max)
        )),
        BranchStats::Text {
            min_length,
            max_length,
        } if min_length <= max_length => Some(format!("length: {min_length}–{max_length}")),
        BranchStats::Date {
            min_millis,
            max_millis,
        } if min_millis <= max_millis => {
            Some(format!("range: {}–{}", iso_day(*min_millis), iso_day(*max_millis)))
        }
        BranchStats::Boolean {
            true_count,
            false_count,
        } => Some(format!("true: {true_count}, false: {false_count}")),
        _ => None,
    }
}

/// Date-only ISO-8601 rendering of an epoch-millisecond timestamp.
fn iso_day(millis: i64) -> String {
    match chrono::Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d").to_string(),
        _ => millis.to_string(),
    }
}
