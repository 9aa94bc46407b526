//! Statistical BSON Schema Inference Library
//!
//! This library infers an aggregate, statistics-bearing schema from a finite
//! sample of BSON documents, and drives several downstream generators from
//! that single tree.
//!
//! # Modules
//!
//! - `bson_type`: BSON type classification and value display
//! - `schema`: aggregate tree model, accumulator, merge, JSON rendering
//! - `fields`: flat, path-addressed field summaries
//! - `describe`: human-readable per-field descriptions
//! - `completion`: editor completion records
//! - `typedecl`: TypeScript-style type declarations
//! - `cli`: command-line front end
//! - `error`: error types and handling
//! - `utils`: shared helpers
//!
//! # Example
//!
//! ```
//! use bson::doc;
//! use schema_scan::schema::accumulate;
//! use schema_scan::typedecl::emit;
//!
//! let tree = accumulate(&[
//!     doc! { "name": "ada", "age": 36 },
//!     doc! { "name": "bob" },
//! ]);
//!
//! let decl = emit(&tree, "users");
//! assert!(decl.contains("age?: number;"));
//! ```

pub mod bson_type;
pub mod cli;
pub mod completion;
pub mod describe;
pub mod error;
pub mod fields;
pub mod schema;
pub mod typedecl;
pub mod utils;

// Re-export commonly used types
pub use bson_type::BsonType;
pub use completion::{FieldCompletionData, to_completions};
pub use describe::{describe, descriptions};
pub use error::{Result, ScanError};
pub use fields::{FieldEntry, flatten};
pub use schema::{FieldPath, SchemaAccumulator, SchemaNode, TypeBranch, accumulate, merge};
pub use typedecl::emit;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
