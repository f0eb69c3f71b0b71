//! Declarative table definitions.
//!
//! A [`TableDefinition`] describes the mapper's view of an already provisioned table:
//! its primary key, the non-key attributes of its records and its global secondary
//! indexes. Definitions are plain data and can be deserialized from configuration.

/// Attribute types.
pub mod attribute;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Single-entry mapping from an attribute name to its type.
pub type KeyDefinition = IndexMap<String, attribute::AttributeType>;

/// Mapping from attribute names to their types.
pub type SchemaDefinition = IndexMap<String, attribute::AttributeType>;

/// Definition of a table.
///
/// ```rust
/// use dynamodb_mapper::definition;
/// use dynamodb_mapper::definition::attribute::AttributeType;
/// use indexmap::IndexMap;
///
/// let users = definition::TableDefinition {
///     table_name: "users".to_string(),
///     hash_key: IndexMap::from([("name".to_string(), AttributeType::String)]),
///     sort_key: Some(IndexMap::from([("age".to_string(), AttributeType::Number)])),
///     schema: IndexMap::from([
///         ("email".to_string(), AttributeType::String),
///         ("thing".to_string(), AttributeType::String),
///     ]),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// The hash (partition) key, exactly one attribute.
    pub hash_key: KeyDefinition,
    /// The non-key attributes of the records.
    #[serde(default)]
    pub schema: SchemaDefinition,
    /// The global secondary indexes.
    #[serde(default)]
    pub secondary_indexes: Vec<SecondaryIndexDefinition>,
    /// The sort (range) key, exactly one attribute when present.
    #[serde(default)]
    pub sort_key: Option<KeyDefinition>,
    /// The name of the table.
    pub table_name: String,
}

/// Definition of a global secondary index.
///
/// When `schema` is `None` the index projects every attribute of the table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryIndexDefinition {
    /// The hash key of the index, exactly one attribute.
    pub hash_key: KeyDefinition,
    /// The name of the index.
    pub name: String,
    /// The attributes projected into the index.
    #[serde(default)]
    pub schema: Option<SchemaDefinition>,
    /// The sort key of the index, exactly one attribute when present.
    #[serde(default)]
    pub sort_key: Option<KeyDefinition>,
}
