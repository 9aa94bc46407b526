//! Nominal type-declaration emitter.
//!
//! Renders the aggregate tree as a TypeScript-style `interface` block:
//! - the collection name becomes `<PascalCase>Document`, with
//!   `CollectionDocument` as the fallback when nothing alphanumeric survives
//! - sparse fields get a trailing `?`
//! - polymorphic fields render as a union in descending occurrence order
//! - object branches render as inline nested blocks, arrays as `<elem>[]`

use crate::bson_type::BsonType;
use crate::schema::{BranchStats, SchemaNode, TypeBranch};
use crate::utils::string::{is_valid_identifier, quote_escaped};

const INDENT: usize = 2;

/// Emit a nominal record-type declaration for the aggregate tree.
///
/// # Arguments
/// * `root` - Aggregate tree produced by the accumulator
/// * `collection_name` - Source collection name, any shape
///
/// # Returns
/// * `String` - Complete `interface ... { ... }` block
pub fn emit(root: &SchemaNode, collection_name: &str) -> String {
    let mut out = format!("interface {} {{\n", interface_name(collection_name));
    for branch in &root.branches {
        if let BranchStats::Object { properties, .. } = &branch.stats {
            render_fields(properties, 1, &mut out);
        }
    }
    out.push('}');
    out
}

/// `<PascalCase>Document` name for a collection.
///
/// Non-alphanumeric runs separate words; a leading digit is escaped with
/// `_`; a name with no alphanumeric content falls back to
/// `CollectionDocument`.
pub fn interface_name(collection_name: &str) -> String {
    let mut name = String::new();
    for word in collection_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    if name.is_empty() {
        return "CollectionDocument".to_string();
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name.push_str("Document");
    name
}

fn render_fields(properties: &[(String, SchemaNode)], depth: usize, out: &mut String) {
    let indent = " ".repeat(depth * INDENT);
    for (name, child) in properties {
        let field = if is_valid_identifier(name) {
            name.clone()
        } else {
            quote_escaped(name)
        };
        let marker = if child.is_sparse() { "?" } else { "" };
        let ty = node_type(child, depth);
        out.push_str(&format!("{indent}{field}{marker}: {ty};\n"));
    }
}

/// Type rendering for a node: the single branch's rendering, or a union in
/// descending occurrence order.
fn node_type(node: &SchemaNode, depth: usize) -> String {
    let sorted = node.branches_by_occurrence();
    if sorted.is_empty() {
        return "unknown".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    for branch in sorted {
        let rendered = branch_type(branch, depth);
        // Int32 and Double both render as `number`; keep unions minimal
        if !parts.contains(&rendered) {
            parts.push(rendered);
        }
    }
    parts.join(" | ")
}

fn branch_type(branch: &TypeBranch, depth: usize) -> String {
    // Map branches carry Object-shaped stats but render as a map type,
    // not an inline record block
    if branch.bson_type == BsonType::Map {
        return scalar_type(BsonType::Map).to_string();
    }
    match &branch.stats {
        BranchStats::Object { properties, .. } => {
            if properties.is_empty() {
                return "{}".to_string();
            }
            let mut block = String::from("{\n");
            render_fields(properties, depth + 1, &mut block);
            block.push_str(&" ".repeat(depth * INDENT));
            block.push('}');
            block
        }
        BranchStats::Array { items, .. } => {
            let element = node_type(items, depth);
            if items.branches.len() > 1 {
                format!("({element})[]")
            } else {
                format!("{element}[]")
            }
        }
        _ => scalar_type(branch.bson_type).to_string(),
    }
}

/// TypeScript-flavored rendering for scalar tags.
fn scalar_type(tag: BsonType) -> &'static str {
    match tag {
        BsonType::String | BsonType::Symbol => "string",
        BsonType::Int32 | BsonType::Double | BsonType::Long => "number",
        BsonType::Decimal128 => "Decimal128",
        BsonType::Boolean => "boolean",
        BsonType::Date => "Date",
        BsonType::ObjectId => "ObjectId",
        BsonType::Null => "null",
        BsonType::RegExp => "RegExp",
        BsonType::Binary => "Binary",
        BsonType::Timestamp => "Timestamp",
        BsonType::MinKey => "MinKey",
        BsonType::MaxKey => "MaxKey",
        BsonType::Code | BsonType::CodeWithScope => "Code",
        BsonType::Map => "Map<string, unknown>",
        BsonType::DBRef => "DBRef",
        BsonType::Undefined => "undefined",
        BsonType::Array => "unknown[]",
        BsonType::Object => "{}",
        BsonType::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::accumulate;
    use bson::doc;

    #[test]
    fn test_interface_name_pascal_case() {
        assert_eq!(interface_name("users"), "UsersDocument");
        assert_eq!(interface_name("order_items"), "OrderItemsDocument");
        assert_eq!(interface_name("order-items"), "OrderItemsDocument");
        assert_eq!(interface_name("123abc"), "_123abcDocument");
        assert_eq!(interface_name("---"), "CollectionDocument");
        assert_eq!(interface_name(""), "CollectionDocument");
    }

    #[test]
    fn test_required_and_optional_fields() {
        let tree = accumulate(&[
            doc! { "name": "ada", "nickname": "al" },
            doc! { "name": "bob" },
        ]);
        let decl = emit(&tree, "users");

        assert!(decl.starts_with("interface UsersDocument {"));
        assert!(decl.contains("\n  name: string;\n"));
        assert!(decl.contains("\n  nickname?: string;\n"));
        assert!(decl.ends_with('}'));
    }

    #[test]
    fn test_quoted_field_names() {
        let tree = accumulate(&[doc! { "order-items": "x", "say\"hi\"": "y" }]);
        let decl = emit(&tree, "orders");

        assert!(decl.contains("\"order-items\": string;"));
        assert!(decl.contains("\"say\\\"hi\\\"\": string;"));
    }

    #[test]
    fn test_polymorphic_union_in_occurrence_order() {
        let tree = accumulate(&[
            doc! { "v": "one" },
            doc! { "v": "two" },
            doc! { "v": 3 },
        ]);
        let decl = emit(&tree, "t");

        assert!(decl.contains("v: string | number;"));
    }

    #[test]
    fn test_nested_object_inline_block() {
        let tree = accumulate(&[doc! { "address": { "city": "london" } }]);
        let decl = emit(&tree, "users");

        assert!(decl.contains("address: {\n    city: string;\n  };"));
    }

    #[test]
    fn test_array_element_type() {
        let tree = accumulate(&[doc! { "tags": ["a", "b"] }]);
        let decl = emit(&tree, "posts");

        assert!(decl.contains("tags: string[];"));
    }

    #[test]
    fn test_mixed_array_parenthesized() {
        let tree = accumulate(&[doc! { "mixed": ["a", 1] }]);
        let decl = emit(&tree, "posts");

        assert!(decl.contains("mixed: (string | number)[];"));
    }

    #[test]
    fn test_map_branch_renders_as_map_type() {
        // Maps cannot come off the wire, so build the branch by hand the
        // way a non-wire source would
        let mut map_branch = TypeBranch::new(BsonType::Map);
        map_branch.type_occurrence = 1;
        let attrs = SchemaNode {
            documents_inspected: 1,
            occurrence: 1,
            branches: vec![map_branch],
            description: None,
        };

        let mut root_branch = TypeBranch::new(BsonType::Object);
        root_branch.type_occurrence = 1;
        if let BranchStats::Object { properties, .. } = &mut root_branch.stats {
            properties.push(("attrs".to_string(), attrs));
        }
        let root = SchemaNode {
            documents_inspected: 1,
            occurrence: 1,
            branches: vec![root_branch],
            description: None,
        };

        let decl = emit(&root, "things");
        assert!(decl.contains("attrs: Map<string, unknown>;"), "{decl}");
    }

    #[test]
    fn test_empty_sample() {
        let tree = accumulate(&[]);
        assert_eq!(emit(&tree, "users"), "interface UsersDocument {\n}");
    }
}
