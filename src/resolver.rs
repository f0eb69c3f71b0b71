//! Resolution of table definitions.
//!
//! [`ResolvedTable::resolve`] validates a [`TableDefinition`] once and keeps everything
//! the operations need at call time: the key schema of the table and of every secondary
//! index, the full record shape, and the key-shape lookup used to route a key object
//! to the index it addresses.

use crate::{
    common,
    definition::{KeyDefinition, SchemaDefinition, TableDefinition, attribute},
    error::{DefinitionError, Error, Result},
};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use std::{collections, fmt};

/// Maximum number of secondary indexes a definition may declare.
pub const MAX_SECONDARY_INDEXES: usize = 5;

/// A key attribute and its declared type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyAttribute {
    /// The declared type.
    pub attribute_type: attribute::AttributeType,
    /// The attribute name.
    pub name: String,
}

/// Hash key and optional sort key of the table or of a secondary index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySchema {
    /// The hash key.
    pub hash_key: KeyAttribute,
    /// The sort key, if declared.
    pub sort_key: Option<KeyAttribute>,
}

impl KeySchema {
    fn from_definition(
        index: &str,
        hash_key: &KeyDefinition,
        sort_key: Option<&KeyDefinition>,
    ) -> Result<Self, DefinitionError> {
        let hash_key = single_attribute("hash key", index, hash_key)?;
        let sort_key = sort_key
            .map(|sort_key| single_attribute("sort key", index, sort_key))
            .transpose()?;
        Ok(Self { hash_key, sort_key })
    }

    /// The key attribute names, hash key first.
    pub fn names(&self) -> Vec<String> {
        let mut names = vec![self.hash_key.name.clone()];
        if let Some(sort_key) = &self.sort_key {
            names.push(sort_key.name.clone());
        }
        names
    }

    /// The key shape fingerprint.
    pub fn shape(&self) -> KeyShape {
        KeyShape::new(self.names())
    }

    fn attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.hash_key).chain(self.sort_key.as_ref())
    }
}

fn single_attribute(
    key: &'static str,
    index: &str,
    definition: &KeyDefinition,
) -> Result<KeyAttribute, DefinitionError> {
    match definition.first() {
        Some((name, attribute_type)) if definition.len() == 1 => {
            if !attribute_type.is_scalar_key() {
                return Err(DefinitionError::NonScalarKey {
                    name: name.clone(),
                    attribute_type: *attribute_type,
                });
            }
            Ok(KeyAttribute {
                attribute_type: *attribute_type,
                name: name.clone(),
            })
        }
        _ => Err(DefinitionError::KeyArity {
            key,
            index: index.to_string(),
            count: definition.len(),
        }),
    }
}

/// Set of attribute names identifying an index.
///
/// Shapes compare regardless of the order the names were supplied in.
///
/// ```rust
/// use dynamodb_mapper::resolver::KeyShape;
///
/// assert_eq!(KeyShape::new(["name", "age"]), KeyShape::new(["age", "name"]));
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct KeyShape(Vec<String>);

impl KeyShape {
    /// Build a shape from attribute names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    /// Build the shape of the attributes present in an item.
    pub fn of(item: &common::Item) -> Self {
        Self::new(item.keys().cloned())
    }

    /// The sorted attribute names.
    pub fn attributes(&self) -> &[String] {
        &self.0
    }
}

/// Reference to the base table or to one of its secondary indexes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndexRef {
    /// The base table.
    Table,
    /// The secondary index at the given position of the definition.
    Secondary(usize),
}

/// A resolved secondary index.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryIndex {
    /// The key schema of the index.
    pub key_schema: KeySchema,
    /// The name of the index.
    pub name: String,
    /// The projected attributes, `None` when everything is projected.
    pub projection: Option<SchemaDefinition>,
}

/// A validated table definition.
#[derive(Clone, Debug)]
pub struct ResolvedTable {
    attributes: IndexMap<String, attribute::AttributeType>,
    definition: TableDefinition,
    key_schema: KeySchema,
    key_shapes: collections::HashMap<KeyShape, IndexRef>,
    secondary_indexes: Vec<SecondaryIndex>,
}

impl ResolvedTable {
    /// Validate a definition and build the key-shape lookup.
    ///
    /// ```rust
    /// use dynamodb_mapper::{definition, resolver};
    /// use dynamodb_mapper::definition::attribute::AttributeType;
    /// use indexmap::IndexMap;
    ///
    /// let table = resolver::ResolvedTable::resolve(definition::TableDefinition {
    ///     table_name: "buildings".to_string(),
    ///     hash_key: IndexMap::from([("buildingId".to_string(), AttributeType::Number)]),
    ///     sort_key: Some(IndexMap::from([("location".to_string(), AttributeType::String)])),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// let shape = resolver::KeyShape::new(["location", "buildingId"]);
    /// assert_eq!(table.resolve_key_shape(&shape).unwrap(), resolver::IndexRef::Table);
    /// ```
    pub fn resolve(definition: TableDefinition) -> Result<Self, DefinitionError> {
        if definition.table_name.is_empty() {
            return Err(DefinitionError::EmptyName("table".to_string()));
        }
        let count = definition.secondary_indexes.len();
        if count > MAX_SECONDARY_INDEXES {
            return Err(DefinitionError::TooManySecondaryIndexes {
                count,
                max: MAX_SECONDARY_INDEXES,
            });
        }
        let table_label = format!("table `{}`", definition.table_name);
        let key_schema = KeySchema::from_definition(
            &table_label,
            &definition.hash_key,
            definition.sort_key.as_ref(),
        )?;
        let mut attributes = IndexMap::new();
        for key_attribute in key_schema.attributes() {
            declare(
                &mut attributes,
                &key_attribute.name,
                key_attribute.attribute_type,
            )?;
        }
        for (name, attribute_type) in &definition.schema {
            declare(&mut attributes, name, *attribute_type)?;
        }
        let mut key_shapes = collections::HashMap::from([(key_schema.shape(), IndexRef::Table)]);
        let mut secondary_indexes: Vec<SecondaryIndex> = Vec::with_capacity(count);
        for (position, index) in definition.secondary_indexes.iter().enumerate() {
            if index.name.is_empty() {
                return Err(DefinitionError::EmptyName(format!(
                    "secondary index #{position} of {table_label}"
                )));
            }
            if secondary_indexes.iter().any(|other| other.name == index.name) {
                return Err(DefinitionError::DuplicateIndexName(index.name.clone()));
            }
            let index_label = format!("index `{}`", index.name);
            let index_key_schema = KeySchema::from_definition(
                &index_label,
                &index.hash_key,
                index.sort_key.as_ref(),
            )?;
            for key_attribute in index_key_schema.attributes() {
                declare(
                    &mut attributes,
                    &key_attribute.name,
                    key_attribute.attribute_type,
                )?;
            }
            for (name, attribute_type) in index.schema.iter().flatten() {
                declare(&mut attributes, name, *attribute_type)?;
            }
            let shape = index_key_schema.shape();
            if let Some(existing) = key_shapes.get(&shape) {
                let first = match existing {
                    IndexRef::Table => table_label.clone(),
                    IndexRef::Secondary(other) => {
                        format!("index `{}`", secondary_indexes[*other].name)
                    }
                };
                return Err(DefinitionError::DuplicateKeyShape {
                    attributes: shape.attributes().to_vec(),
                    first,
                    second: index_label,
                });
            }
            key_shapes.insert(shape, IndexRef::Secondary(position));
            secondary_indexes.push(SecondaryIndex {
                key_schema: index_key_schema,
                name: index.name.clone(),
                projection: index.schema.clone(),
            });
        }
        let resolved_table = Self {
            attributes,
            definition,
            key_schema,
            key_shapes,
            secondary_indexes,
        };
        Ok(resolved_table)
    }

    /// The declarative definition this table was resolved from.
    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    /// The name of the table.
    pub fn table_name(&self) -> &str {
        &self.definition.table_name
    }

    /// Every attribute a record may carry, with its type.
    pub fn attributes(&self) -> &IndexMap<String, attribute::AttributeType> {
        &self.attributes
    }

    /// The resolved secondary indexes.
    pub fn secondary_indexes(&self) -> &[SecondaryIndex] {
        &self.secondary_indexes
    }

    /// The key schema of the table or of a secondary index.
    pub fn key_schema(&self, index: IndexRef) -> &KeySchema {
        match index {
            IndexRef::Table => &self.key_schema,
            IndexRef::Secondary(position) => &self.secondary_indexes[position].key_schema,
        }
    }

    /// The name of a secondary index, `None` for the base table.
    pub fn index_name(&self, index: IndexRef) -> Option<&str> {
        match index {
            IndexRef::Table => None,
            IndexRef::Secondary(position) => Some(&self.secondary_indexes[position].name),
        }
    }

    /// Human readable name of the table or index, used in errors.
    pub fn describe(&self, index: IndexRef) -> String {
        match self.index_name(index) {
            Some(name) => format!("index `{name}` of table `{}`", self.table_name()),
            None => format!("table `{}`", self.table_name()),
        }
    }

    /// Look up a secondary index by name.
    pub fn index(&self, name: &str) -> Result<IndexRef> {
        self.secondary_indexes
            .iter()
            .position(|index| index.name == name)
            .map(IndexRef::Secondary)
            .ok_or_else(|| Error::UnknownIndex(name.to_string()))
    }

    /// Find the index addressed by a key shape.
    pub fn resolve_key_shape(&self, shape: &KeyShape) -> Result<IndexRef> {
        self.key_shapes
            .get(shape)
            .copied()
            .ok_or_else(|| Error::UnknownKeyShape {
                table: self.table_name().to_string(),
                attributes: shape.attributes().to_vec(),
            })
    }

    /// Check a value against the declared type of an attribute.
    pub fn validate_attribute(&self, name: &str, value: &types::AttributeValue) -> Result<()> {
        let attribute_type = self
            .attributes
            .get(name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))?;
        check_type(name, *attribute_type, value)
    }

    /// Check a full record: declared attributes only, with matching types, carrying the table key.
    pub fn validate_record(&self, item: &common::Item) -> Result<()> {
        for key_attribute in self.key_schema.attributes() {
            if !item.contains_key(&key_attribute.name) {
                return Err(Error::MissingKeyAttribute(key_attribute.name.clone()));
            }
        }
        for (name, value) in item {
            self.validate_attribute(name, value)?;
        }
        Ok(())
    }

    /// Check that an item holds exactly the key attributes of an index.
    pub fn validate_key(&self, index: IndexRef, item: &common::Item) -> Result<()> {
        let key_schema = self.key_schema(index);
        if KeyShape::of(item) != key_schema.shape() {
            return Err(Error::KeyMismatch {
                expected: key_schema.names(),
                found: KeyShape::of(item).attributes().to_vec(),
            });
        }
        for key_attribute in key_schema.attributes() {
            if let Some(value) = item.get(&key_attribute.name) {
                check_type(&key_attribute.name, key_attribute.attribute_type, value)?;
            }
        }
        Ok(())
    }

    /// Split a record into its table key and the remaining attributes.
    ///
    /// The remaining attributes keep the declaration order of the definition.
    pub fn split_key(
        &self,
        mut item: common::Item,
    ) -> Result<(common::Item, IndexMap<String, types::AttributeValue>)> {
        let mut keys = common::Item::with_capacity(2);
        for key_attribute in self.key_schema.attributes() {
            let value = item
                .remove(&key_attribute.name)
                .ok_or_else(|| Error::MissingKeyAttribute(key_attribute.name.clone()))?;
            keys.insert(key_attribute.name.clone(), value);
        }
        let mut attributes = IndexMap::with_capacity(item.len());
        for name in self.attributes.keys() {
            if let Some(value) = item.remove(name) {
                attributes.insert(name.clone(), value);
            }
        }
        if let Some(name) = item.into_keys().next() {
            return Err(Error::UnknownAttribute(name));
        }
        Ok((keys, attributes))
    }
}

impl fmt::Display for ResolvedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

fn declare(
    attributes: &mut IndexMap<String, attribute::AttributeType>,
    name: &str,
    attribute_type: attribute::AttributeType,
) -> Result<(), DefinitionError> {
    match attributes.get(name) {
        Some(first) if *first != attribute_type => Err(DefinitionError::ConflictingAttributeType {
            name: name.to_string(),
            first: *first,
            second: attribute_type,
        }),
        Some(_) => Ok(()),
        None => {
            attributes.insert(name.to_string(), attribute_type);
            Ok(())
        }
    }
}

pub(crate) fn check_type(
    name: &str,
    attribute_type: attribute::AttributeType,
    value: &types::AttributeValue,
) -> Result<()> {
    if attribute_type.matches(value) {
        Ok(())
    } else {
        Err(Error::AttributeType {
            name: name.to_string(),
            expected: attribute_type,
            found: attribute::describe(value),
        })
    }
}
