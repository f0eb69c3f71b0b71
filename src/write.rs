//! Write requests sent to DynamoDB.
//!
//! This module provides the requests issued by table operations that modify data:
//! - Putting new items or replacing existing ones
//! - Updating attributes of an item
//! - Deleting items by key
//! - Batch writing multiple items

/// Batch write item request for putting up to 25 items at once.
pub mod batch_write_item;

/// Delete item request for removing an item by primary key.
pub mod delete_item;

/// Put item request for creating or replacing an item.
pub mod put_item;

/// Update item request for setting attributes of an item.
pub mod update_item;
