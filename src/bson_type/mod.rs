//! BSON type classification and display.
//!
//! This module maps runtime BSON values onto a closed set of type tags and
//! renders individual values as display strings:
//! - `BsonType::of` is total: every value gets exactly one tag, with
//!   `Unknown` as the fallback for unrecognized shapes
//! - numeric subkinds (Int32, Double, Long, Decimal128) are kept distinct
//!   because they are distinct wire types
//! - `value_to_display_string` renders a value the way the tag dictates

use bson::Bson;
use serde::{Deserialize, Serialize};

/// Closed set of BSON type tags observed by the schema accumulator.
///
/// `Map` never comes out of [`BsonType::of`] (the wire format cannot
/// distinguish a map from a document) but stays in the set so trees built
/// from other sources still classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BsonType {
    String,
    Int32,
    Double,
    Decimal128,
    Long,
    Boolean,
    Date,
    ObjectId,
    Null,
    RegExp,
    Binary,
    Symbol,
    Timestamp,
    MinKey,
    MaxKey,
    Code,
    CodeWithScope,
    Array,
    Object,
    Map,
    DBRef,
    Undefined,
    Unknown,
}

impl BsonType {
    /// Classify a BSON value into exactly one type tag. Never fails.
    pub fn of(value: &Bson) -> BsonType {
        match value {
            Bson::String(_) => BsonType::String,
            Bson::Int32(_) => BsonType::Int32,
            Bson::Double(_) => BsonType::Double,
            Bson::Decimal128(_) => BsonType::Decimal128,
            Bson::Int64(_) => BsonType::Long,
            Bson::Boolean(_) => BsonType::Boolean,
            Bson::DateTime(_) => BsonType::Date,
            Bson::ObjectId(_) => BsonType::ObjectId,
            Bson::Null => BsonType::Null,
            Bson::RegularExpression(_) => BsonType::RegExp,
            Bson::Binary(_) => BsonType::Binary,
            Bson::Symbol(_) => BsonType::Symbol,
            Bson::Timestamp(_) => BsonType::Timestamp,
            Bson::MinKey => BsonType::MinKey,
            Bson::MaxKey => BsonType::MaxKey,
            Bson::JavaScriptCode(_) => BsonType::Code,
            Bson::JavaScriptCodeWithScope(_) => BsonType::CodeWithScope,
            Bson::Array(_) => BsonType::Array,
            Bson::Document(doc) => {
                // A DBRef is a plain document with a reserved shape
                if doc.contains_key("$ref") && doc.contains_key("$id") {
                    BsonType::DBRef
                } else {
                    BsonType::Object
                }
            }
            Bson::Undefined => BsonType::Undefined,
            _ => BsonType::Unknown,
        }
    }

    /// Canonical display name for the tag.
    pub fn name(&self) -> &'static str {
        match self {
            BsonType::String => "String",
            BsonType::Int32 => "Int32",
            BsonType::Double => "Double",
            BsonType::Decimal128 => "Decimal128",
            BsonType::Long => "Long",
            BsonType::Boolean => "Boolean",
            BsonType::Date => "Date",
            BsonType::ObjectId => "ObjectId",
            BsonType::Null => "Null",
            BsonType::RegExp => "RegExp",
            BsonType::Binary => "Binary",
            BsonType::Symbol => "Symbol",
            BsonType::Timestamp => "Timestamp",
            BsonType::MinKey => "MinKey",
            BsonType::MaxKey => "MaxKey",
            BsonType::Code => "Code",
            BsonType::CodeWithScope => "CodeWithScope",
            BsonType::Array => "Array",
            BsonType::Object => "Object",
            BsonType::Map => "Map",
            BsonType::DBRef => "DBRef",
            BsonType::Undefined => "Undefined",
            BsonType::Unknown => "Unknown",
        }
    }

    /// Whether this tag carries numeric min/max statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            BsonType::Int32 | BsonType::Double | BsonType::Long | BsonType::Decimal128
        )
    }

    /// Whether this tag carries string-length statistics.
    pub fn is_text(&self) -> bool {
        matches!(self, BsonType::String | BsonType::Symbol | BsonType::Code)
    }
}

impl std::fmt::Display for BsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a BSON value as a display string for the given tag.
///
/// # Arguments
/// * `value` - Value to render
/// * `tag` - Type tag previously produced by [`BsonType::of`]
///
/// # Returns
/// * `String` - Type-specific rendering, relaxed JSON as the fallback
pub fn value_to_display_string(value: &Bson, tag: BsonType) -> String {
    match (tag, value) {
        (BsonType::String, Bson::String(s)) => s.clone(),
        (BsonType::Symbol, Bson::Symbol(s)) => s.clone(),
        (BsonType::Code, Bson::JavaScriptCode(code)) => code.clone(),
        (BsonType::CodeWithScope, Bson::JavaScriptCodeWithScope(cws)) => cws.code.clone(),
        (BsonType::Int32, Bson::Int32(n)) => n.to_string(),
        (BsonType::Long, Bson::Int64(n)) => n.to_string(),
        (BsonType::Double, Bson::Double(d)) => format_double(*d),
        (BsonType::Decimal128, Bson::Decimal128(d)) => d.to_string(),
        (BsonType::Boolean, Bson::Boolean(b)) => b.to_string(),
        (BsonType::Date, Bson::DateTime(dt)) => dt
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        (BsonType::ObjectId, Bson::ObjectId(oid)) => oid.to_hex(),
        (BsonType::RegExp, Bson::RegularExpression(re)) => {
            if re.options.is_empty() {
                re.pattern.clone()
            } else {
                format!("{} {}", re.pattern, re.options)
            }
        }
        (BsonType::Binary, Bson::Binary(bin)) => format!("Binary[{}]", bin.bytes.len()),
        (BsonType::Timestamp, Bson::Timestamp(ts)) => {
            format!("Timestamp({}, {})", ts.time, ts.increment)
        }
        (BsonType::Null, _) => "null".to_string(),
        (BsonType::Undefined, _) => "undefined".to_string(),
        (BsonType::MinKey, _) => "MinKey".to_string(),
        (BsonType::MaxKey, _) => "MaxKey".to_string(),
        _ => value.clone().into_relaxed_extjson().to_string(),
    }
}

/// Format a double without a trailing `.0` for whole values.
pub fn format_double(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e10 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use bson::{Binary, doc, spec::BinarySubtype};

    #[test]
    fn test_classify_scalars() {
        assert_eq!(BsonType::of(&Bson::Int32(1)), BsonType::Int32);
        assert_eq!(BsonType::of(&Bson::Int64(1)), BsonType::Long);
        assert_eq!(BsonType::of(&Bson::Double(1.5)), BsonType::Double);
        assert_eq!(BsonType::of(&Bson::Boolean(true)), BsonType::Boolean);
        assert_eq!(
            BsonType::of(&Bson::String("x".to_string())),
            BsonType::String
        );
        assert_eq!(BsonType::of(&Bson::Null), BsonType::Null);
        assert_eq!(BsonType::of(&Bson::MinKey), BsonType::MinKey);
        assert_eq!(BsonType::of(&Bson::MaxKey), BsonType::MaxKey);
        assert_eq!(BsonType::of(&Bson::Undefined), BsonType::Undefined);
    }

    #[test]
    fn test_classify_containers() {
        assert_eq!(BsonType::of(&Bson::Array(vec![])), BsonType::Array);
        assert_eq!(
            BsonType::of(&Bson::Document(doc! { "a": 1 })),
            BsonType::Object
        );
    }

    #[test]
    fn test_classify_dbref_shape() {
        let dbref = doc! { "$ref": "users", "$id": ObjectId::new() };
        assert_eq!(BsonType::of(&Bson::Document(dbref)), BsonType::DBRef);
    }

    #[test]
    fn test_display_objectid_is_hex() {
        let oid = ObjectId::parse_str("65705d84dfc3f3b5094e1f72").unwrap();
        let s = value_to_display_string(&Bson::ObjectId(oid), BsonType::ObjectId);
        assert_eq!(s, "65705d84dfc3f3b5094e1f72");
    }

    #[test]
    fn test_display_date_is_iso() {
        let dt = bson::DateTime::from_millis(1701862788373);
        let s = value_to_display_string(&Bson::DateTime(dt), BsonType::Date);
        assert!(s.starts_with("2023-12-06T"));
    }

    #[test]
    fn test_display_regex() {
        let re = Bson::RegularExpression(bson::Regex {
            pattern: "^a.*$".to_string(),
            options: "i".to_string(),
        });
        assert_eq!(value_to_display_string(&re, BsonType::RegExp), "^a.*$ i");
    }

    #[test]
    fn test_display_binary_shows_length() {
        let bin = Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: vec![1, 2, 3, 4],
        });
        assert_eq!(value_to_display_string(&bin, BsonType::Binary), "Binary[4]");
    }

    #[test]
    fn test_display_document_falls_back_to_json() {
        let doc = Bson::Document(doc! { "a": 1 });
        let s = value_to_display_string(&doc, BsonType::Object);
        assert!(s.contains("\"a\""));
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(42.0), "42");
        assert_eq!(format_double(42.5), "42.5");
    }
}
