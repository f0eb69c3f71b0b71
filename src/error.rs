use crate::definition::attribute::AttributeType;

use std::error;

/// Boxed error returned by a store implementation.
pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while resolving a table definition.
///
/// These are returned by [`crate::resolver::ResolvedTable::resolve`] (and therefore by
/// [`crate::table::Table::define`]) before any operation reaches the store.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    /// An attribute is declared twice with different types.
    #[error("attribute `{name}` is declared as both {first} and {second}")]
    ConflictingAttributeType {
        /// The attribute name.
        name: String,
        /// The type seen first.
        first: AttributeType,
        /// The conflicting type.
        second: AttributeType,
    },
    /// Two secondary indexes share the same name.
    #[error("secondary index `{0}` is declared more than once")]
    DuplicateIndexName(String),
    /// Two indexes are addressed by the same set of key attributes.
    #[error("{first} and {second} are both keyed by {attributes:?}")]
    DuplicateKeyShape {
        /// The key attribute names.
        attributes: Vec<String>,
        /// The index declared first.
        first: String,
        /// The index declared second.
        second: String,
    },
    /// A table or index name is empty.
    #[error("{0} has an empty name")]
    EmptyName(String),
    /// A hash key or sort key mapping does not hold exactly one attribute.
    #[error("{key} of {index} must declare exactly one attribute, found {count}")]
    KeyArity {
        /// Which key was malformed (`hash key` or `sort key`).
        key: &'static str,
        /// The index the key belongs to.
        index: String,
        /// The number of attributes declared.
        count: usize,
    },
    /// A key attribute is declared with a non scalar type.
    #[error("key attribute `{name}` must be a string, number or binary, found {attribute_type}")]
    NonScalarKey {
        /// The attribute name.
        name: String,
        /// The declared type.
        attribute_type: AttributeType,
    },
    /// The table declares more secondary indexes than supported.
    #[error("at most {max} secondary indexes are supported, found {count}")]
    TooManySecondaryIndexes {
        /// The number of declared indexes.
        count: usize,
        /// The supported maximum.
        max: usize,
    },
}

/// Errors raised by table operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value of an attribute does not match its declared type.
    #[error("attribute `{name}` expects {expected}, found {found}")]
    AttributeType {
        /// The attribute name.
        name: String,
        /// The declared type.
        expected: AttributeType,
        /// A description of the supplied value.
        found: &'static str,
    },
    /// The table definition is invalid.
    #[error("invalid table definition: {0}")]
    Definition(#[from] DefinitionError),
    /// An operator cannot be applied to the sort key type.
    #[error("`{operator}` cannot be applied to sort key `{name}` of type {attribute_type}")]
    InvalidOperator {
        /// The operator name.
        operator: &'static str,
        /// The sort key name.
        name: String,
        /// The declared sort key type.
        attribute_type: AttributeType,
    },
    /// A sort key condition names an attribute that is not the sort key of the target.
    #[error("`{name}` is not the sort key of {target}")]
    InvalidSortKey {
        /// The supplied attribute name.
        name: String,
        /// The queried table or index.
        target: String,
    },
    /// A key object does not hold exactly the key attributes of the table.
    #[error("expected key attributes {expected:?}, found {found:?}")]
    KeyMismatch {
        /// The declared key attribute names.
        expected: Vec<String>,
        /// The supplied attribute names.
        found: Vec<String>,
    },
    /// A record is missing one of the table key attributes.
    #[error("missing key attribute `{0}`")]
    MissingKeyAttribute(String),
    /// Serialization to or from DynamoDB attribute values failed.
    #[error(transparent)]
    Serialization(#[from] serde_dynamo::Error),
    /// The backing store rejected a request.
    #[error("store request failed: {0}")]
    Store(#[source] BoxError),
    /// A record carries an attribute outside the declared record shape.
    #[error("attribute `{0}` is not declared by the table")]
    UnknownAttribute(String),
    /// No secondary index with the given name is declared.
    #[error("secondary index `{0}` is not declared by the table")]
    UnknownIndex(String),
    /// A key object matches neither the table key nor any secondary index key.
    #[error("no index of table `{table}` is keyed by {attributes:?}")]
    UnknownKeyShape {
        /// The table name.
        table: String,
        /// The supplied attribute names.
        attributes: Vec<String>,
    },
    /// A batch request left items or keys unprocessed.
    #[error("{0} batch requests were left unprocessed")]
    Unprocessed(usize),
}

impl Error {
    /// Wrap a store error, keeping it as the source.
    pub fn store<E>(source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(source))
    }
}
