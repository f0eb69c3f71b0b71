//! Read requests sent to DynamoDB.
//!
//! This module provides the requests issued by table operations that read data:
//! - Getting individual items by primary key
//! - Querying a table or a secondary index with key conditions
//! - Batch retrieving multiple items

/// Batch get item request for retrieving up to 25 items at once.
pub mod batch_get_item;

/// Get item request for retrieving a single item by primary key.
pub mod get_item;

/// Query request for retrieving items with key conditions.
pub mod query;
