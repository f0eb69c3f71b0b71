#![deny(missing_docs)]

//! # DynamoDB Mapper
//!
//! A typed data-mapping layer over Amazon DynamoDB tables.
//!
//! ## Overview
//!
//! Describe a table once with a [`definition::TableDefinition`], bind it to a store and
//! work with your own `serde` records:
//! - Create, read, update and delete records, one at a time or in batches of 25
//! - Read by the table key or by the key of any secondary index, routed automatically
//! - Query a partition with a typed builder that only accepts valid sort key conditions
//! - Validate records and keys against the definition before anything is sent
//!
//! ## Quick Example
//!
//! ```no_run
//! use dynamodb_mapper::{definition, store::connection::{Connection, ConnectionOptions}};
//! use dynamodb_mapper::definition::attribute::AttributeType;
//! use indexmap::IndexMap;
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize, Serialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//!     email: Option<String>,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = Connection::connect(ConnectionOptions {
//!     endpoint_url: Some("http://localhost:8000".to_string()),
//!     ..Default::default()
//! })
//! .await;
//! let users = connection.define::<User>(definition::TableDefinition {
//!     table_name: "users".to_string(),
//!     hash_key: IndexMap::from([("name".to_string(), AttributeType::String)]),
//!     sort_key: Some(IndexMap::from([("age".to_string(), AttributeType::Number)])),
//!     schema: IndexMap::from([("email".to_string(), AttributeType::String)]),
//!     secondary_indexes: vec![definition::SecondaryIndexDefinition {
//!         name: "by_email".to_string(),
//!         hash_key: IndexMap::from([("email".to_string(), AttributeType::String)]),
//!         ..Default::default()
//!     }],
//! })?;
//!
//! users.create(&User { name: "foo".to_string(), age: 18, email: Some("foo@bar".to_string()) }).await?;
//! // A point lookup on the table key
//! let by_key = users.read(&json!({"name": "foo", "age": 18})).await?;
//! // A query on the `by_email` index
//! let by_email = users.read(&json!({"email": "foo@bar"})).await?;
//! // "#x = :x and #y between :y and :z"
//! let teenagers = users.query("foo")?.where_key("age")?.between(13, 19)?.exec().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@definition`] - Declarative table definitions
//! - [`mod@resolver`] - Validation of definitions, records and keys
//! - [`mod@table`] - Typed table handles and the query builder
//! - [`mod@store`] - Backing stores: DynamoDB and in process
//! - [`mod@read`] / [`mod@write`] - The requests sent to DynamoDB
//! - [`mod@common`] - Keys, key conditions and expressions

/// Shared types for keys, key conditions and expressions.
pub mod common;

/// Declarative table definitions.
pub mod definition;

/// Error types.
pub mod error;

/// Read requests.
pub mod read;

/// Resolution of table definitions.
pub mod resolver;

/// Backing stores.
pub mod store;

/// Typed table handles.
pub mod table;

/// Write requests.
pub mod write;

pub use error::{Error, Result};
pub use table::Table;
