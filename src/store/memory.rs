use crate::{
    common,
    definition::TableDefinition,
    error::{DefinitionError, Error, Result},
    read,
    resolver::{IndexRef, KeySchema, ResolvedTable},
    store, write,
};

use std::{cmp, collections, sync};

/// Errors raised by [`MemoryStore`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MemoryStoreError {
    /// The secondary index was never provisioned with [`MemoryStore::with_definition`].
    #[error("index `{index}` of table `{table}` does not exist")]
    IndexNotFound {
        /// The table name.
        table: String,
        /// The index name.
        index: String,
    },
    /// An item is missing one of the primary key attributes of its table.
    #[error("item is missing key attribute `{0}`")]
    MissingKeyAttribute(String),
    /// The table was never provisioned with [`MemoryStore::with_table`].
    #[error("table `{0}` does not exist")]
    TableNotFound(String),
}

/// A request received by a [`MemoryStore`].
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// A batch get item request.
    BatchGetItem(read::batch_get_item::BatchGetItem),
    /// A batch write item request.
    BatchWriteItem(write::batch_write_item::BatchWriteItem),
    /// A delete item request.
    DeleteItem(write::delete_item::DeleteItem),
    /// A get item request.
    GetItem(read::get_item::GetItem),
    /// A put item request.
    PutItem(write::put_item::PutItem),
    /// A query request.
    Query(read::query::Query),
    /// An update item request.
    UpdateItem(write::update_item::UpdateItem),
}

#[derive(Debug)]
struct MemoryIndex {
    hash_key: String,
    projection: Option<Vec<String>>,
    sort_key: Option<String>,
}

impl MemoryIndex {
    fn key_names(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.hash_key).chain(self.sort_key.as_ref())
    }
}

#[derive(Debug)]
struct MemoryTable {
    hash_key: String,
    indexes: collections::HashMap<String, MemoryIndex>,
    items: Vec<common::Item>,
    sort_key: Option<String>,
}

impl MemoryTable {
    fn key_names(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.hash_key).chain(self.sort_key.as_ref())
    }

    fn position(&self, keys: &common::Item) -> Option<usize> {
        self.items.iter().position(|item| {
            self.key_names().all(|name| match (item.get(name), keys.get(name)) {
                (Some(stored), Some(key)) => {
                    common::condition::compare(stored, key) == Some(cmp::Ordering::Equal)
                }
                _ => false,
            })
        })
    }

    /// Evaluate a query against the table or one of its indexes.
    ///
    /// Index queries only see items carrying every index key attribute, and return the
    /// table keys, the index keys and the projected attributes.
    fn query(&self, request: &read::query::Query) -> Result<Vec<common::Item>> {
        let index = match &request.index_name {
            Some(index_name) => {
                let index = self.indexes.get(index_name).ok_or_else(|| {
                    Error::store(MemoryStoreError::IndexNotFound {
                        table: request.table_name.clone(),
                        index: index_name.clone(),
                    })
                })?;
                Some(index)
            }
            None => None,
        };
        let sort_key = match index {
            Some(index) => index.sort_key.as_ref(),
            None => self.sort_key.as_ref(),
        };
        let mut items: Vec<common::Item> = self
            .items
            .iter()
            .filter(|item| {
                index.is_none_or(|index| index.key_names().all(|name| item.contains_key(name)))
            })
            .filter(|item| request.matches(item))
            .cloned()
            .collect();
        if let Some(sort_key) = sort_key {
            items.sort_by(|left, right| match (left.get(sort_key), right.get(sort_key)) {
                (Some(left), Some(right)) => {
                    common::condition::compare(left, right).unwrap_or(cmp::Ordering::Equal)
                }
                _ => cmp::Ordering::Equal,
            });
        }
        if let Some(index) = index
            && let Some(projection) = &index.projection
        {
            for item in &mut items {
                item.retain(|name, _| {
                    self.key_names().any(|key| key == name)
                        || index.key_names().any(|key| key == name)
                        || projection.contains(name)
                });
            }
        }
        Ok(items)
    }

    fn put(&mut self, item: common::Item) -> Result<()> {
        if let Some(name) = self.key_names().find(|name| !item.contains_key(*name)) {
            return Err(Error::store(MemoryStoreError::MissingKeyAttribute(
                name.clone(),
            )));
        }
        match self.position(&item) {
            Some(position) => self.items[position] = item,
            None => self.items.push(item),
        }
        Ok(())
    }
}

/// In-process store evaluating requests against provisioned tables.
///
/// Every request is recorded and can be inspected with [`MemoryStore::requests`].
/// Tables must be provisioned up front, as they would be in DynamoDB.
///
/// ```rust
/// use dynamodb_mapper::store::memory::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_table("users", "name", Some("age"))
///     .with_table("buildings", "buildingId", Some("location"));
/// assert!(store.requests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    requests: sync::Mutex<Vec<Request>>,
    tables: sync::Mutex<collections::HashMap<String, MemoryTable>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a table with its primary key attribute names.
    pub fn with_table(self, table_name: &str, hash_key: &str, sort_key: Option<&str>) -> Self {
        let table = MemoryTable {
            hash_key: hash_key.to_string(),
            indexes: collections::HashMap::new(),
            items: Vec::new(),
            sort_key: sort_key.map(str::to_string),
        };
        lock(&self.tables).insert(table_name.to_string(), table);
        self
    }

    /// Provision a table and its secondary indexes from a definition.
    ///
    /// Index queries honour the declared projection: an index without a schema
    /// projects every attribute.
    pub fn with_definition(self, definition: &TableDefinition) -> Result<Self, DefinitionError> {
        let resolved = ResolvedTable::resolve(definition.clone())?;
        let key_names = |key_schema: &KeySchema| {
            let sort_key = key_schema.sort_key.as_ref().map(|sort_key| sort_key.name.clone());
            (key_schema.hash_key.name.clone(), sort_key)
        };
        let (hash_key, sort_key) = key_names(resolved.key_schema(IndexRef::Table));
        let indexes = resolved
            .secondary_indexes()
            .iter()
            .map(|index| {
                let (hash_key, sort_key) = key_names(&index.key_schema);
                let projection = index
                    .projection
                    .as_ref()
                    .map(|schema| schema.keys().cloned().collect());
                let memory_index = MemoryIndex {
                    hash_key,
                    projection,
                    sort_key,
                };
                (index.name.clone(), memory_index)
            })
            .collect();
        let table = MemoryTable {
            hash_key,
            indexes,
            items: Vec::new(),
            sort_key,
        };
        lock(&self.tables).insert(resolved.table_name().to_string(), table);
        Ok(self)
    }

    /// The requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }

    /// Forget the recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// The items currently stored in a table.
    pub fn items(&self, table_name: &str) -> Vec<common::Item> {
        lock(&self.tables)
            .get(table_name)
            .map(|table| table.items.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: Request) {
        lock(&self.requests).push(request);
    }

    fn with_memory_table<R>(
        &self,
        table_name: &str,
        f: impl FnOnce(&mut MemoryTable) -> Result<R>,
    ) -> Result<R> {
        let mut tables = lock(&self.tables);
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| Error::store(MemoryStoreError::TableNotFound(table_name.to_string())))?;
        f(table)
    }
}

fn lock<T>(mutex: &sync::Mutex<T>) -> sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(sync::PoisonError::into_inner)
}

impl store::Store for MemoryStore {
    async fn get_item(&self, request: read::get_item::GetItem) -> Result<Option<common::Item>> {
        self.record(Request::GetItem(request.clone()));
        self.with_memory_table(&request.table_name, |table| {
            let item = table
                .position(&request.keys)
                .map(|position| table.items[position].clone());
            Ok(item)
        })
    }

    async fn query(&self, request: read::query::Query) -> Result<Vec<common::Item>> {
        self.record(Request::Query(request.clone()));
        self.with_memory_table(&request.table_name, |table| table.query(&request))
    }

    async fn batch_get_item(
        &self,
        request: read::batch_get_item::BatchGetItem,
    ) -> Result<Vec<common::Item>> {
        self.record(Request::BatchGetItem(request.clone()));
        self.with_memory_table(&request.table_name, |table| {
            let items = request
                .keys
                .iter()
                .filter_map(|keys| table.position(keys))
                .map(|position| table.items[position].clone())
                .collect();
            Ok(items)
        })
    }

    async fn put_item(&self, request: write::put_item::PutItem) -> Result<()> {
        self.record(Request::PutItem(request.clone()));
        self.with_memory_table(&request.table_name, |table| table.put(request.item))
    }

    async fn update_item(&self, request: write::update_item::UpdateItem) -> Result<()> {
        self.record(Request::UpdateItem(request.clone()));
        self.with_memory_table(&request.table_name, |table| {
            let mut item = table
                .position(&request.keys)
                .map(|position| table.items[position].clone())
                .unwrap_or_else(|| request.keys.clone());
            item.extend(request.set);
            table.put(item)
        })
    }

    async fn delete_item(&self, request: write::delete_item::DeleteItem) -> Result<()> {
        self.record(Request::DeleteItem(request.clone()));
        self.with_memory_table(&request.table_name, |table| {
            if let Some(position) = table.position(&request.keys) {
                table.items.remove(position);
            }
            Ok(())
        })
    }

    async fn batch_write_item(
        &self,
        request: write::batch_write_item::BatchWriteItem,
    ) -> Result<()> {
        self.record(Request::BatchWriteItem(request.clone()));
        self.with_memory_table(&request.table_name, |table| {
            for item in request.items {
                table.put(item)?;
            }
            Ok(())
        })
    }
}
