//! JSON-Schema-flavored rendering of the aggregate tree.
//!
//! The output follows `$jsonSchema` conventions (`bsonType` aliases,
//! `properties`, `items`, `required`) and carries the accumulated statistics
//! as `x-scan-*` extension attributes so they cannot collide with standard
//! JSON-Schema keywords.

use serde_json::{Map, Value, json};

use crate::bson_type::BsonType;

use super::{BranchStats, SchemaNode, TypeBranch};

/// `$jsonSchema` type alias for a tag.
pub fn bson_type_alias(tag: BsonType) -> &'static str {
    match tag {
        BsonType::String => "string",
        BsonType::Int32 => "int",
        BsonType::Double => "double",
        BsonType::Decimal128 => "decimal",
        BsonType::Long => "long",
        BsonType::Boolean => "bool",
        BsonType::Date => "date",
        BsonType::ObjectId => "objectId",
        BsonType::Null => "null",
        BsonType::RegExp => "regex",
        BsonType::Binary => "binData",
        BsonType::Symbol => "symbol",
        BsonType::Timestamp => "timestamp",
        BsonType::MinKey => "minKey",
        BsonType::MaxKey => "maxKey",
        BsonType::Code => "javascript",
        BsonType::CodeWithScope => "javascriptWithScope",
        BsonType::Array => "array",
        // A DBRef is an ordinary document on the wire; dbPointer is the
        // distinct deprecated wire type
        BsonType::Object | BsonType::Map | BsonType::DBRef => "object",
        BsonType::Undefined => "undefined",
        BsonType::Unknown => "unknown",
    }
}

/// Render the aggregate tree as a JSON-Schema-like value.
pub fn to_json_schema(node: &SchemaNode) -> Value {
    let mut out = Map::new();

    let aliases: Vec<Value> = node
        .branches_by_occurrence()
        .iter()
        .map(|b| Value::String(bson_type_alias(b.bson_type).to_string()))
        .collect();
    if !aliases.is_empty() {
        out.insert("bsonType".to_string(), Value::Array(aliases));
    }
    if let Some(desc) = &node.description {
        out.insert("description".to_string(), Value::String(desc.clone()));
    }

    out.insert(
        "x-scan-documents-inspected".to_string(),
        json!(node.documents_inspected),
    );
    out.insert("x-scan-occurrence".to_string(), json!(node.occurrence));

    let types: Vec<Value> = node.branches.iter().map(branch_value).collect();
    if !types.is_empty() {
        out.insert("x-scan-types".to_string(), Value::Array(types));
    }

    for branch in &node.branches {
        match &branch.stats {
            BranchStats::Object { properties, .. } => {
                let mut props = Map::new();
                let mut required = Vec::new();
                for (name, child) in properties {
                    if !child.is_sparse() && child.documents_inspected > 0 {
                        required.push(Value::String(name.clone()));
                    }
                    props.insert(name.clone(), to_json_schema(child));
                }
                out.insert("properties".to_string(), Value::Object(props));
                if !required.is_empty() {
                    out.insert("required".to_string(), Value::Array(required));
                }
            }
            BranchStats::Array { items, .. } => {
                out.insert("items".to_string(), to_json_schema(items));
            }
            _ => {}
        }
    }

    Value::Object(out)
}

/// Per-branch statistics as extension attributes.
fn branch_value(branch: &TypeBranch) -> Value {
    let mut out = Map::new();
    out.insert(
        "bsonType".to_string(),
        Value::String(bson_type_alias(branch.bson_type).to_string()),
    );
    out.insert(
        "x-scan-type-occurrence".to_string(),
        json!(branch.type_occurrence),
    );

    match &branch.stats {
        BranchStats::Numeric { min, max } if min <= max => {
            out.insert("x-scan-min".to_string(), json!(min));
            out.insert("x-scan-max".to_string(), json!(max));
        }
        BranchStats::Text {
            min_length,
            max_length,
        } if min_length <= max_length => {
            out.insert("x-scan-min-length".to_string(), json!(min_length));
            out.insert("x-scan-max-length".to_string(), json!(max_length));
        }
        BranchStats::Date {
            min_millis,
            max_millis,
        } if min_millis <= max_millis => {
            out.insert("x-scan-min-date".to_string(), json!(min_millis));
            out.insert("x-scan-max-date".to_string(), json!(max_millis));
        }
        BranchStats::Boolean {
            true_count,
            false_count,
        } => {
            out.insert("x-scan-true-count".to_string(), json!(true_count));
            out.insert("x-scan-false-count".to_string(), json!(false_count));
        }
        BranchStats::Array {
            min_items,
            max_items,
            ..
        } if min_items <= max_items => {
            out.insert("x-scan-min-items".to_string(), json!(min_items));
            out.insert("x-scan-max-items".to_string(), json!(max_items));
        }
        BranchStats::Object {
            min_properties,
            max_properties,
            ..
        } if min_properties <= max_properties => {
            out.insert("x-scan-min-properties".to_string(), json!(min_properties));
            out.insert("x-scan-max-properties".to_string(), json!(max_properties));
        }
        _ => {}
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::accumulate;
    use bson::doc;

    #[test]
    fn test_root_renders_object_with_properties() {
        let tree = accumulate(&[doc! { "name": "ada", "age": 36 }]);
        let schema = to_json_schema(&tree);

        assert_eq!(schema["bsonType"][0], "object");
        assert!(schema["properties"]["name"].is_object());
        assert_eq!(schema["properties"]["age"]["bsonType"][0], "int");
    }

    #[test]
    fn test_extension_attributes_are_namespaced() {
        let tree = accumulate(&[doc! { "age": 36 }, doc! { "age": 41 }]);
        let schema = to_json_schema(&tree);
        let age = &schema["properties"]["age"];

        assert_eq!(age["x-scan-documents-inspected"], 2);
        assert_eq!(age["x-scan-occurrence"], 2);
        assert_eq!(age["x-scan-types"][0]["x-scan-min"], 36.0);
        assert_eq!(age["x-scan-types"][0]["x-scan-max"], 41.0);
    }

    #[test]
    fn test_required_lists_non_sparse_fields_only() {
        let tree = accumulate(&[doc! { "a": 1, "b": 2 }, doc! { "a": 3 }]);
        let schema = to_json_schema(&tree);

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required, &[serde_json::json!("a")]);
    }

    #[test]
    fn test_dbref_aliases_to_object() {
        use bson::oid::ObjectId;

        assert_eq!(bson_type_alias(BsonType::DBRef), "object");

        let tree = accumulate(&[doc! {
            "owner": { "$ref": "users", "$id": ObjectId::new() },
        }]);
        let schema = to_json_schema(&tree);
        assert_eq!(schema["properties"]["owner"]["bsonType"][0], "object");
    }

    #[test]
    fn test_array_renders_items() {
        let tree = accumulate(&[doc! { "tags": ["a", "b"] }]);
        let schema = to_json_schema(&tree);
        let tags = &schema["properties"]["tags"];

        assert_eq!(tags["bsonType"][0], "array");
        assert_eq!(tags["items"]["bsonType"][0], "string");
    }
}
