use aws_sdk_dynamodb::types;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an attribute.
///
/// ```rust
/// use dynamodb_mapper::definition::attribute::AttributeType;
///
/// let attribute_type: AttributeType = serde_json::from_str("\"number\"").unwrap();
/// assert_eq!(attribute_type, AttributeType::Number);
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Binary data (`B`).
    Binary,
    /// Set of binary values (`BS`).
    BinarySet,
    /// Boolean (`BOOL`).
    Boolean,
    /// List of arbitrary values (`L`).
    List,
    /// Map of arbitrary values (`M`).
    Map,
    /// Number (`N`).
    Number,
    /// Set of numbers (`NS`).
    NumberSet,
    /// String (`S`).
    String,
    /// Set of strings (`SS`).
    StringSet,
}

impl AttributeType {
    /// Whether the type can back a hash or sort key.
    pub fn is_scalar_key(self) -> bool {
        matches!(self, Self::Binary | Self::Number | Self::String)
    }

    /// Whether the value conforms to this type.
    pub fn matches(self, value: &types::AttributeValue) -> bool {
        matches!(
            (self, value),
            (Self::Binary, types::AttributeValue::B(_))
                | (Self::BinarySet, types::AttributeValue::Bs(_))
                | (Self::Boolean, types::AttributeValue::Bool(_))
                | (Self::List, types::AttributeValue::L(_))
                | (Self::Map, types::AttributeValue::M(_))
                | (Self::Number, types::AttributeValue::N(_))
                | (Self::NumberSet, types::AttributeValue::Ns(_))
                | (Self::String, types::AttributeValue::S(_))
                | (Self::StringSet, types::AttributeValue::Ss(_))
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Binary => "binary",
            Self::BinarySet => "binary set",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Map => "map",
            Self::Number => "number",
            Self::NumberSet => "number set",
            Self::String => "string",
            Self::StringSet => "string set",
        };
        f.write_str(name)
    }
}

/// Short description of the kind of an attribute value, for error messages.
pub(crate) fn describe(value: &types::AttributeValue) -> &'static str {
    match value {
        types::AttributeValue::B(_) => "binary",
        types::AttributeValue::Bs(_) => "binary set",
        types::AttributeValue::Bool(_) => "boolean",
        types::AttributeValue::L(_) => "list",
        types::AttributeValue::M(_) => "map",
        types::AttributeValue::N(_) => "number",
        types::AttributeValue::Ns(_) => "number set",
        types::AttributeValue::Null(_) => "null",
        types::AttributeValue::S(_) => "string",
        types::AttributeValue::Ss(_) => "string set",
        _ => "unknown",
    }
}
