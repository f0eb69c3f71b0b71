//! Backing stores.
//!
//! A [`Store`] performs the point, batch and query requests built by table handles.
//! [`connection::Connection`] sends them to DynamoDB; [`memory::MemoryStore`] evaluates
//! them in process.

/// DynamoDB connection.
pub mod connection;

/// In-process store.
pub mod memory;

use crate::{common, error::Result, read, write};

use std::sync;

/// A store able to serve the requests issued by table handles.
///
/// Store errors are returned as [`crate::error::Error::Store`], carrying the original
/// error as their source.
pub trait Store: Send + Sync {
    /// Fetch a single item by primary key.
    fn get_item(
        &self,
        request: read::get_item::GetItem,
    ) -> impl Future<Output = Result<Option<common::Item>>> + Send;

    /// Query a table or index, returning a single page of items.
    fn query(
        &self,
        request: read::query::Query,
    ) -> impl Future<Output = Result<Vec<common::Item>>> + Send;

    /// Fetch up to 25 items by primary key. Missing items are absent from the result.
    fn batch_get_item(
        &self,
        request: read::batch_get_item::BatchGetItem,
    ) -> impl Future<Output = Result<Vec<common::Item>>> + Send;

    /// Create or replace an item.
    fn put_item(&self, request: write::put_item::PutItem)
    -> impl Future<Output = Result<()>> + Send;

    /// Assign attributes of an item.
    fn update_item(
        &self,
        request: write::update_item::UpdateItem,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete an item by primary key.
    fn delete_item(
        &self,
        request: write::delete_item::DeleteItem,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Put up to 25 items.
    fn batch_write_item(
        &self,
        request: write::batch_write_item::BatchWriteItem,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<S: Store> Store for sync::Arc<S> {
    fn get_item(
        &self,
        request: read::get_item::GetItem,
    ) -> impl Future<Output = Result<Option<common::Item>>> + Send {
        S::get_item(self, request)
    }

    fn query(
        &self,
        request: read::query::Query,
    ) -> impl Future<Output = Result<Vec<common::Item>>> + Send {
        S::query(self, request)
    }

    fn batch_get_item(
        &self,
        request: read::batch_get_item::BatchGetItem,
    ) -> impl Future<Output = Result<Vec<common::Item>>> + Send {
        S::batch_get_item(self, request)
    }

    fn put_item(
        &self,
        request: write::put_item::PutItem,
    ) -> impl Future<Output = Result<()>> + Send {
        S::put_item(self, request)
    }

    fn update_item(
        &self,
        request: write::update_item::UpdateItem,
    ) -> impl Future<Output = Result<()>> + Send {
        S::update_item(self, request)
    }

    fn delete_item(
        &self,
        request: write::delete_item::DeleteItem,
    ) -> impl Future<Output = Result<()>> + Send {
        S::delete_item(self, request)
    }

    fn batch_write_item(
        &self,
        request: write::batch_write_item::BatchWriteItem,
    ) -> impl Future<Output = Result<()>> + Send {
        S::batch_write_item(self, request)
    }
}
