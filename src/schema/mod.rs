//! Aggregate schema model.
//!
//! This module holds the statistics-bearing schema tree built from a
//! document sample:
//! - `SchemaNode`: the observed shape at one field path
//! - `TypeBranch`: per-type statistics (a field observed under several BSON
//!   types gets one branch per type)
//! - `BranchStats`: a tagged union, so "numeric branches have min/max" and
//!   "boolean branches have true/false counts" are enforced by the compiler
//!
//! The tree is built once per sample by the [`accumulator`], is immutable
//! afterwards, and is consumed independently by the flattener, the
//! description generator and the type-declaration emitter.

pub mod accumulator;
pub mod json;
pub mod path;


use serde::{Deserialize, Serialize};

use crate::bson_type::BsonType;
use crate::error::{InvariantError, Result};

/// Aggregate observed shape at one field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Parent-context documents considered for this node. For the root this
    /// is the sample size; for a nested field it equals the occurrence of
    /// the parent's Object branch.
    pub documents_inspected: u64,

    /// Documents (within `documents_inspected`) where the field was present
    /// under any type.
    pub occurrence: u64,

    /// One entry per distinct observed BSON type, in first-seen order.
    pub branches: Vec<TypeBranch>,

    /// Human-readable summary, filled in by the description generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Statistics for one BSON type observed at a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBranch {
    pub bson_type: BsonType,

    /// Documents where the field held exactly this type.
    pub type_occurrence: u64,

    pub stats: BranchStats,
}

/// Type-specific running statistics.
///
/// Min/max fields start at their empty sentinels (`min > max`) and tighten
/// with every observation, which keeps merging a plain min/max reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BranchStats {
    /// Int32 / Double / Long / Decimal128 value range.
    Numeric { min: f64, max: f64 },

    /// String-like length range, in characters.
    Text { min_length: u64, max_length: u64 },

    /// Date range in epoch milliseconds.
    Date { min_millis: i64, max_millis: i64 },

    /// Boolean value counts.
    Boolean { true_count: u64, false_count: u64 },

    /// Array length range plus the merged shape of all elements.
    Array {
        min_items: u64,
        max_items: u64,
        items: Box<SchemaNode>,
    },

    /// Object property-count range plus child nodes in first-seen order.
    Object {
        min_properties: u64,
        max_properties: u64,
        properties: Vec<(String, SchemaNode)>,
    },

    /// Types with no extra statistics.
    None,
}

impl TypeBranch {
    /// New branch for a tag, with empty statistics of the matching shape.
    pub fn new(bson_type: BsonType) -> Self {
        let stats = match bson_type {
            t if t.is_numeric() => BranchStats::Numeric {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            t if t.is_text() => BranchStats::Text {
                min_length: u64::MAX,
                max_length: 0,
            },
            BsonType::Date => BranchStats::Date {
                min_millis: i64::MAX,
                max_millis: i64::MIN,
            },
            BsonType::Boolean => BranchStats::Boolean {
                true_count: 0,
                false_count: 0,
            },
            BsonType::Array => BranchStats::Array {
                min_items: u64::MAX,
                max_items: 0,
                items: Box::default(),
            },
            BsonType::Object | BsonType::Map => BranchStats::Object {
                min_properties: u64::MAX,
                max_properties: 0,
                properties: Vec::new(),
            },
            _ => BranchStats::None,
        };
        Self {
            bson_type,
            type_occurrence: 0,
            stats,
        }
    }

    /// Child properties, if this is an object branch.
    pub fn properties(&self) -> Option<&[(String, SchemaNode)]> {
        match &self.stats {
            BranchStats::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Merged element shape, if this is an array branch.
    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.stats {
            BranchStats::Array { items, .. } => Some(items),
            _ => None,
        }
    }
}

impl SchemaNode {
    /// Branch with the highest `type_occurrence`; ties keep first-seen order.
    pub fn dominant_branch(&self) -> Option<&TypeBranch> {
        let mut best: Option<&TypeBranch> = None;
        for branch in &self.branches {
            match best {
                Some(b) if branch.type_occurrence <= b.type_occurrence => {}
                _ => best = Some(branch),
            }
        }
        best
    }

    /// Branches sorted by descending `type_occurrence` (stable, so ties keep
    /// first-seen order).
    pub fn branches_by_occurrence(&self) -> Vec<&TypeBranch> {
        let mut sorted: Vec<&TypeBranch> = self.branches.iter().collect();
        sorted.sort_by(|a, b| b.type_occurrence.cmp(&a.type_occurrence));
        sorted
    }

    /// Whether the field was absent from at least one inspected document.
    pub fn is_sparse(&self) -> bool {
        self.occurrence < self.documents_inspected
    }

    /// Look up a branch by tag.
    pub fn branch(&self, bson_type: BsonType) -> Option<&TypeBranch> {
        self.branches.iter().find(|b| b.bson_type == bson_type)
    }

    /// Verify the tree invariants every downstream consumer relies on.
    ///
    /// A violation is a defect in whoever built the tree; generators call
    /// this instead of attempting silent recovery.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(&FieldPath::root())?;
        Ok(())
    }

    fn validate_at(&self, path: &FieldPath) -> std::result::Result<(), InvariantError> {
        let branch_sum: u64 = self.branches.iter().map(|b| b.type_occurrence).sum();
        if branch_sum != self.occurrence {
            return Err(InvariantError::OccurrenceSumMismatch {
                path: path.display(),
                branch_sum,
                occurrence: self.occurrence,
            });
        }
        if self.occurrence > self.documents_inspected {
            return Err(InvariantError::OccurrenceExceedsInspected {
                path: path.display(),
                occurrence: self.occurrence,
                documents_inspected: self.documents_inspected,
            });
        }

        for branch in &self.branches {
            match &branch.stats {
                BranchStats::Boolean {
                    true_count,
                    false_count,
                } => {
                    if true_count + false_count != branch.type_occurrence {
                        return Err(InvariantError::BooleanCountMismatch {
                            path: path.display(),
                            true_count: *true_count,
                            false_count: *false_count,
                            type_occurrence: branch.type_occurrence,
                        });
                    }
                }
                BranchStats::Object { properties, .. } => {
                    for (name, child) in properties {
                        if child.documents_inspected != branch.type_occurrence {
                            return Err(InvariantError::ChildInspectedMismatch {
                                path: path.child(name).display(),
                                expected: branch.type_occurrence,
                                actual: child.documents_inspected,
                            });
                        }
                        child.validate_at(&path.child(name))?;
                    }
                }
                BranchStats::Array { items, .. } => {
                    items.validate_at(path)?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

pub use accumulator::{SchemaAccumulator, accumulate, merge};
pub use path::FieldPath;
