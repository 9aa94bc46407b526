//! Schema accumulation over a document sample.
//!
//! Walks each document recursively and merges its shape into a running
//! aggregate tree. Accumulation is commutative and associative: the result
//! never depends on document order or on how the sample was batched, which
//! lets callers split a sample across workers and [`merge`] the partial
//! trees afterwards.
//!
//! Accumulation never fails: values with no recognized classification count
//! under the `Unknown` tag and the walk keeps going.

use bson::{Bson, Document};
use tracing::debug;

use crate::bson_type::BsonType;

use super::{BranchStats, SchemaNode, TypeBranch};

/// Incremental schema accumulator.
///
/// The root node is modeled as a field that is present in every sampled
/// document as an Object, so the same branch machinery covers the top level
/// and every nested level.
#[derive(Debug, Default)]
pub struct SchemaAccumulator {
    root: SchemaNode,
    documents: u64,
}

impl SchemaAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one document's shape into the running aggregate.
    pub fn add_document(&mut self, doc: &Document) {
        self.documents += 1;
        self.root.documents_inspected += 1;
        observe_document(&mut self.root, doc);
    }

    /// Number of documents accumulated so far.
    pub fn documents(&self) -> u64 {
        self.documents
    }

    /// Finish accumulation and hand out the aggregate tree.
    pub fn finish(self) -> SchemaNode {
        debug!(
            documents = self.documents,
            branches = self.root.branches.len(),
            "schema accumulation finished"
        );
        self.root
    }
}

/// Accumulate a whole sample in one pass.
///
/// # Arguments
/// * `sample` - Finite, pre-collected sequence of documents
///
/// # Returns
/// * `SchemaNode` - Root of the aggregate tree
pub fn accumulate(sample: &[Document]) -> SchemaNode {
    let mut acc = SchemaAccumulator::new();
    for doc in sample {
        acc.add_document(doc);
    }
    acc.finish()
}

/// Observe a document under a node's Object branch.
fn observe_document(node: &mut SchemaNode, doc: &Document) {
    node.occurrence += 1;
    let idx = find_or_create_branch(node, BsonType::Object);
    let branch = &mut node.branches[idx];
    branch.type_occurrence += 1;
    let branch_occurrence = branch.type_occurrence;

    if let BranchStats::Object {
        min_properties,
        max_properties,
        properties,
    } = &mut branch.stats
    {
        let n = doc.len() as u64;
        *min_properties = (*min_properties).min(n);
        *max_properties = (*max_properties).max(n);

        for (key, value) in doc {
            let child = property_node(properties, key);
            observe_value(child, value);
        }

        // Every child's inspected count tracks the Object branch, including
        // children absent from this document and children first seen later.
        for (_, child) in properties.iter_mut() {
            child.documents_inspected = branch_occurrence;
        }
    }
}

/// Observe one field value: classify, bump the matching branch, update its
/// statistics, and recurse into composites.
fn observe_value(node: &mut SchemaNode, value: &Bson) {
    let tag = BsonType::of(value);
    if tag == BsonType::Object {
        if let Bson::Document(doc) = value {
            observe_document(node, doc);
            return;
        }
    }

    node.occurrence += 1;
    let idx = find_or_create_branch(node, tag);
    let branch = &mut node.branches[idx];
    branch.type_occurrence += 1;

    match (&mut branch.stats, value) {
        (BranchStats::Numeric { min, max }, _) => {
            if let Some(v) = numeric_value(value) {
                *min = min.min(v);
                *max = max.max(v);
            }
        }
        (
            BranchStats::Text {
                min_length,
                max_length,
            },
            _,
        ) => {
            if let Some(len) = text_length(value) {
                *min_length = (*min_length).min(len);
                *max_length = (*max_length).max(len);
            }
        }
        (
            BranchStats::Date {
                min_millis,
                max_millis,
            },
            Bson::DateTime(dt),
        ) => {
            let millis = dt.timestamp_millis();
            *min_millis = (*min_millis).min(millis);
            *max_millis = (*max_millis).max(millis);
        }
        (
            BranchStats::Boolean {
                true_count,
                false_count,
            },
            Bson::Boolean(b),
        ) => {
            if *b {
                *true_count += 1;
            } else {
                *false_count += 1;
            }
        }
        (
            BranchStats::Array {
                min_items,
                max_items,
                items,
            },
            Bson::Array(arr),
        ) => {
            let n = arr.len() as u64;
            *min_items = (*min_items).min(n);
            *max_items = (*max_items).max(n);

            // Elements share one merged shape instead of per-index paths,
            // trading element-level precision for bounded memory.
            for element in arr {
                items.documents_inspected += 1;
                observe_value(items, element);
            }
        }
        _ => {}
    }
}

/// Numeric value for min/max tracking. Decimal128 goes through its string
/// form; a non-finite parse leaves the range untouched.
fn numeric_value(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(d) if d.is_finite() => Some(*d),
        Bson::Decimal128(d) => d.to_string().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Character count for string-like values.
fn text_length(value: &Bson) -> Option<u64> {
    match value {
        Bson::String(s) | Bson::Symbol(s) | Bson::JavaScriptCode(s) => {
            Some(s.chars().count() as u64)
        }
        _ => None,
    }
}

/// Child node for a property name, created on first sight.
fn property_node<'a>(
    properties: &'a mut Vec<(String, SchemaNode)>,
    key: &str,
) -> &'a mut SchemaNode {
    let idx = match properties.iter().position(|(name, _)| name == key) {
        Some(idx) => idx,
        None => {
            properties.push((key.to_string(), SchemaNode::default()));
            properties.len() - 1
        }
    };
    &mut properties[idx].1
}

fn find_or_create_branch(node: &mut SchemaNode, tag: BsonType) -> usize {
    match node.branches.iter().position(|b| b.bson_type == tag) {
        Some(idx) => idx,
        None => {
            node.branches.push(TypeBranch::new(tag));
            node.branches.len() - 1
        }
    }
}

/// Merge two aggregate trees built from disjoint partitions of a sample.
///
/// Associative and commutative up to branch order (first-seen order follows
/// the left tree, then new branches from the right), so partial trees from
/// parallel workers reduce to the same statistics as a single pass.
pub fn merge(mut left: SchemaNode, right: SchemaNode) -> SchemaNode {
    merge_into(&mut left, right);
    // Descriptions were computed against pre-merge counts on both sides;
    // none of them survive
    clear_descriptions(&mut left);
    left
}

fn merge_into(left: &mut SchemaNode, right: SchemaNode) {
    left.documents_inspected += right.documents_inspected;
    left.occurrence += right.occurrence;

    for right_branch in right.branches {
        match left
            .branches
            .iter_mut()
            .find(|b| b.bson_type == right_branch.bson_type)
        {
            Some(left_branch) => merge_branch(left_branch, right_branch),
            None => left.branches.push(right_branch),
        }
    }

    // Re-derive child inspected counts from the merged Object branch.
    for branch in &mut left.branches {
        if let BranchStats::Object { properties, .. } = &mut branch.stats {
            for (_, child) in properties.iter_mut() {
                child.documents_inspected = branch.type_occurrence;
            }
        }
    }
}

fn clear_descriptions(node: &mut SchemaNode) {
    node.description = None;
    for branch in &mut node.branches {
        match &mut branch.stats {
            BranchStats::Object { properties, .. } => {
                for (_, child) in properties.iter_mut() {
                    clear_descriptions(child);
                }
            }
            BranchStats::Array { items, .. } => clear_descriptions(items),
            _ => {}
        }
    }
}

fn merge_branch(left: &mut TypeBranch, right: TypeBranch) {
    left.type_occurrence += right.type_occurrence;

    match (&mut left.stats, right.stats) {
        (
            BranchStats::Numeric { min, max },
            BranchStats::Numeric {
                min: rmin,
                max: rmax,
            },
        ) => {
            *min = min.min(rmin);
            *max = max.max(rmax);
        }
        (
            BranchStats::Text {
                min_length,
                max_length,
            },
            BranchStats::Text {
                min_length: rmin,
                max_length: rmax,
            },
        ) => {
            *min_length = (*min_length).min(rmin);
            *max_length = (*max_length).max(rmax);
        }
        (
            BranchStats::Date {
                min_millis,
                max_millis,
            },
            BranchStats::Date {
                min_millis: rmin,
                max_millis: rmax,
            },
        ) => {
            *min_millis = (*min_millis).min(rmin);
            *max_millis = (*max_millis).max(rmax);
        }
        (
            BranchStats::Boolean {
                true_count,
                false_count,
            },
            BranchStats::Boolean {
                true_count: rt,
                false_count: rf,
            },
        ) => {
            *true_count += rt;
            *false_count += rf;
        }
        (
            BranchStats::Array {
                min_items,
                max_items,
                items,
            },
            BranchStats::Array {
                min_items: rmin,
                max_items: rmax,
                items: ritems,
            },
        ) => {
            *min_items = (*min_items).min(rmin);
            *max_items = (*max_items).max(rmax);
            merge_into(items, *ritems);
        }
        (
            BranchStats::Object {
                min_properties,
                max_properties,
                properties,
            },
            BranchStats::Object {
                min_properties: rmin,
                max_properties: rmax,
                properties: rprops,
            },
        ) => {
            *min_properties = (*min_properties).min(rmin);
            *max_properties = (*max_properties).max(rmax);
            for (name, right_child) in rprops {
                match properties.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, left_child)) => merge_into(left_child, right_child),
                    None => properties.push((name, right_child)),
                }
            }
        }
        _ => {}
    }
}
