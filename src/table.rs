//! Typed table handles.
//!
//! A [`Table`] closes over a resolved definition and a [`Store`]. Records are the
//! caller's `serde` model `T`; keys are any serializable value holding the key
//! attributes (a struct, a map, `serde_json::json!`).

/// Secondary index handles.
pub mod index;

/// Query builder states.
pub mod query;

use crate::{
    common,
    definition::TableDefinition,
    error::Result,
    read,
    resolver::{IndexRef, KeyShape, ResolvedTable},
    store::{Store, connection::Connection},
    write,
};

use futures_util::future;
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt, marker, sync};

/// Typed access to a table.
///
/// ```rust
/// use dynamodb_mapper::{definition, store::memory::MemoryStore, table::Table};
/// use dynamodb_mapper::definition::attribute::AttributeType;
/// use indexmap::IndexMap;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Deserialize, PartialEq, Serialize)]
/// struct User {
///     name: String,
///     age: u32,
///     email: Option<String>,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new().with_table("users", "name", Some("age"));
/// let users: Table<User, _> = Table::define(store, definition::TableDefinition {
///     table_name: "users".to_string(),
///     hash_key: IndexMap::from([("name".to_string(), AttributeType::String)]),
///     sort_key: Some(IndexMap::from([("age".to_string(), AttributeType::Number)])),
///     schema: IndexMap::from([("email".to_string(), AttributeType::String)]),
///     ..Default::default()
/// })?;
/// users.create(&User { name: "foo".to_string(), age: 18, email: None }).await?;
/// let adults = users.query("foo")?.where_key("age")?.gte(18)?.exec().await?;
/// assert_eq!(adults.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Table<T, S = Connection> {
    record: marker::PhantomData<fn() -> T>,
    resolved: sync::Arc<ResolvedTable>,
    store: S,
}

impl<T, S: Clone> Clone for Table<T, S> {
    fn clone(&self) -> Self {
        Self {
            record: marker::PhantomData,
            resolved: sync::Arc::clone(&self.resolved),
            store: self.store.clone(),
        }
    }
}

impl<T, S: fmt::Debug> fmt::Debug for Table<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("table_name", &self.resolved.table_name())
            .field("store", &self.store)
            .finish()
    }
}

impl<T, S> Table<T, S> {
    /// Resolve a definition and bind it to a store.
    ///
    /// Fails with [`crate::error::Error::Definition`] when the definition is malformed.
    pub fn define(store: S, definition: TableDefinition) -> Result<Self> {
        let resolved = ResolvedTable::resolve(definition)?;
        let table = Self {
            record: marker::PhantomData,
            resolved: sync::Arc::new(resolved),
            store,
        };
        Ok(table)
    }

    /// The declarative definition of the table.
    pub fn definition(&self) -> &TableDefinition {
        self.resolved.definition()
    }

    /// The resolved definition of the table.
    pub fn resolved(&self) -> &ResolvedTable {
        &self.resolved
    }

    /// The store requests are sent to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebind the handle to another store, keeping the resolved definition.
    pub fn with_store<R>(self, store: R) -> Table<T, R> {
        Table {
            record: marker::PhantomData,
            resolved: self.resolved,
            store,
        }
    }
}

fn to_item<V: Serialize>(value: V) -> Result<common::Item> {
    let item = serde_dynamo::to_item(value)?;
    Ok(common::strip_nulls(item))
}

impl<T, S> Table<T, S>
where
    T: Serialize + DeserializeOwned,
    S: Store,
{
    /// Create or replace a record.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.table.create", skip_all, fields(table_name = %self.resolved), err)
    )]
    pub async fn create(&self, record: &T) -> Result<()> {
        let item = to_item(record)?;
        self.resolved.validate_record(&item)?;
        let put_item = write::put_item::PutItem {
            item,
            table_name: self.resolved.table_name().to_string(),
        };
        self.store.put_item(put_item).await
    }

    /// Create or replace many records, in concurrent batches of 25.
    ///
    /// Every record is validated before the first request is sent. The call fails as a
    /// whole if any batch fails; records of other batches may have been written.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.table.create_batch", skip_all, fields(table_name = %self.resolved, records = records.len()), err)
    )]
    pub async fn create_batch(&self, records: &[T]) -> Result<()> {
        let mut items = Vec::with_capacity(records.len());
        for record in records {
            let item = to_item(record)?;
            self.resolved.validate_record(&item)?;
            items.push(item);
        }
        let requests: Vec<_> = items
            .chunks(write::batch_write_item::MAX_BATCH_WRITE_ITEMS)
            .map(|chunk| {
                self.store
                    .batch_write_item(write::batch_write_item::BatchWriteItem {
                        items: chunk.to_vec(),
                        table_name: self.resolved.table_name().to_string(),
                    })
            })
            .collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(batches = requests.len(), "writing batches");
        future::try_join_all(requests).await?;
        Ok(())
    }

    /// Read a record by the key of the table or of a secondary index.
    ///
    /// A key holding exactly the table key attributes is a point lookup. A key holding
    /// exactly the key attributes of a secondary index queries that index and returns
    /// the first match. Any other key fails with
    /// [`crate::error::Error::UnknownKeyShape`]; a key that matches nothing returns
    /// `None`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.table.read", skip_all, fields(table_name = %self.resolved), err)
    )]
    pub async fn read<K: Serialize>(&self, key: &K) -> Result<Option<T>> {
        let mut keys = to_item(key)?;
        let index = self.resolved.resolve_key_shape(&KeyShape::of(&keys))?;
        self.resolved.validate_key(index, &keys)?;
        let item = match index {
            IndexRef::Table => {
                let get_item = read::get_item::GetItem {
                    keys,
                    table_name: self.resolved.table_name().to_string(),
                };
                self.store.get_item(get_item).await?
            }
            IndexRef::Secondary(_) => {
                let key_schema = self.resolved.key_schema(index);
                #[cfg(feature = "tracing")]
                tracing::debug!(index_name = ?self.resolved.index_name(index), "reading through secondary index");
                let mut take = |name: &str| {
                    keys.remove(name)
                        .ok_or_else(|| crate::error::Error::MissingKeyAttribute(name.to_string()))
                };
                let partition_key = common::key::Key {
                    name: key_schema.hash_key.name.clone(),
                    value: take(&key_schema.hash_key.name)?,
                };
                let sort_key_condition = match &key_schema.sort_key {
                    Some(sort_key) => Some(common::condition::KeyCondition {
                        condition: common::condition::Condition::Equals(take(&sort_key.name)?),
                        name: sort_key.name.clone(),
                    }),
                    None => None,
                };
                let query = read::query::Query {
                    index_name: self.resolved.index_name(index).map(str::to_string),
                    partition_key,
                    sort_key_condition,
                    table_name: self.resolved.table_name().to_string(),
                };
                self.store.query(query).await?.into_iter().next()
            }
        };
        let record = item.map(serde_dynamo::from_item).transpose()?;
        Ok(record)
    }

    /// Read many records by table key, in concurrent batches of 25.
    ///
    /// Keys that match nothing are absent from the result, which carries no ordering
    /// guarantee.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.table.batch_read", skip_all, fields(table_name = %self.resolved, keys = keys.len()), err)
    )]
    pub async fn batch_read<K: Serialize>(&self, keys: &[K]) -> Result<Vec<T>> {
        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            let item = to_item(key)?;
            self.resolved.validate_key(IndexRef::Table, &item)?;
            items.push(item);
        }
        let requests: Vec<_> = items
            .chunks(read::batch_get_item::MAX_BATCH_GET_ITEMS)
            .map(|chunk| {
                self.store.batch_get_item(read::batch_get_item::BatchGetItem {
                    keys: chunk.to_vec(),
                    table_name: self.resolved.table_name().to_string(),
                })
            })
            .collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(batches = requests.len(), "reading batches");
        let responses = future::try_join_all(requests).await?;
        let items: Vec<common::Item> = responses.into_iter().flatten().collect();
        let records = serde_dynamo::from_items(items)?;
        Ok(records)
    }

    /// Assign every attribute present on the record, leaving the others untouched.
    ///
    /// The record must carry the full table key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.table.update", skip_all, fields(table_name = %self.resolved), err)
    )]
    pub async fn update(&self, record: &T) -> Result<()> {
        let item = to_item(record)?;
        self.resolved.validate_record(&item)?;
        let (keys, set) = self.resolved.split_key(item)?;
        let update_item = write::update_item::UpdateItem {
            keys,
            set,
            table_name: self.resolved.table_name().to_string(),
        };
        self.store.update_item(update_item).await
    }

    /// Delete a record by table key. Deleting a missing record succeeds.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.table.delete", skip_all, fields(table_name = %self.resolved), err)
    )]
    pub async fn delete<K: Serialize>(&self, key: &K) -> Result<()> {
        let keys = to_item(key)?;
        self.resolved.validate_key(IndexRef::Table, &keys)?;
        let delete_item = write::delete_item::DeleteItem {
            keys,
            table_name: self.resolved.table_name().to_string(),
        };
        self.store.delete_item(delete_item).await
    }

    /// Start a query on the base table for a hash key value.
    pub fn query<V: Serialize>(&self, hash_value: V) -> Result<query::QueryBuilder<'_, T, S>> {
        query::QueryBuilder::new(self, IndexRef::Table, hash_value)
    }

    /// Select a secondary index by name.
    pub fn index(&self, name: &str) -> Result<index::Index<'_, T, S>> {
        let index = self.resolved.index(name)?;
        Ok(index::Index::new(self, index))
    }
}

impl Connection {
    /// Define a table bound to this connection.
    pub fn define<T>(&self, definition: TableDefinition) -> Result<Table<T, Self>> {
        Table::define(self.clone(), definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        definition::{SecondaryIndexDefinition, attribute::AttributeType},
        error::Error,
        store::memory::{MemoryStore, Request},
    };

    use indexmap::IndexMap;
    use rstest::{fixture, rstest};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    struct User {
        name: String,
        age: u32,
        email: Option<String>,
        thing: Option<String>,
    }

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Building {
        building_id: u64,
        location: String,
    }

    fn user(name: &str, age: u32) -> User {
        User {
            name: name.to_string(),
            age,
            email: None,
            thing: None,
        }
    }

    fn users_definition() -> TableDefinition {
        TableDefinition {
            hash_key: IndexMap::from([("name".to_string(), AttributeType::String)]),
            schema: IndexMap::from([
                ("email".to_string(), AttributeType::String),
                ("thing".to_string(), AttributeType::String),
            ]),
            secondary_indexes: vec![
                SecondaryIndexDefinition {
                    hash_key: IndexMap::from([("email".to_string(), AttributeType::String)]),
                    name: "by_email".to_string(),
                    ..Default::default()
                },
                SecondaryIndexDefinition {
                    hash_key: IndexMap::from([("thing".to_string(), AttributeType::String)]),
                    name: "by_thing".to_string(),
                    sort_key: Some(IndexMap::from([("age".to_string(), AttributeType::Number)])),
                    ..Default::default()
                },
            ],
            sort_key: Some(IndexMap::from([("age".to_string(), AttributeType::Number)])),
            table_name: "users".to_string(),
        }
    }

    #[fixture]
    fn users() -> Table<User, MemoryStore> {
        let definition = users_definition();
        let store = MemoryStore::new().with_definition(&definition).unwrap();
        Table::define(store, definition).unwrap()
    }

    #[fixture]
    fn values() -> Table<serde_json::Value, MemoryStore> {
        let definition = users_definition();
        let store = MemoryStore::new().with_definition(&definition).unwrap();
        Table::define(store, definition).unwrap()
    }

    #[fixture]
    fn buildings() -> Table<Building, MemoryStore> {
        let store = MemoryStore::new().with_table("buildings", "buildingId", Some("location"));
        let definition = TableDefinition {
            hash_key: IndexMap::from([("buildingId".to_string(), AttributeType::Number)]),
            sort_key: Some(IndexMap::from([(
                "location".to_string(),
                AttributeType::String,
            )])),
            table_name: "buildings".to_string(),
            ..Default::default()
        };
        Table::define(store, definition).unwrap()
    }

    async fn foob_partition(users: &Table<User, MemoryStore>) {
        let records: Vec<User> = [5, 10, 15, 20, 25]
            .into_iter()
            .map(|age| User {
                thing: Some(format!("foob_{age}")),
                ..user("foob", age)
            })
            .collect();
        users.create_batch(&records).await.unwrap();
        users.create(&user("other", 10)).await.unwrap();
    }

    fn ages(records: &[User]) -> Vec<u32> {
        let mut ages: Vec<u32> = records.iter().map(|record| record.age).collect();
        ages.sort();
        ages
    }

    #[rstest]
    #[tokio::test]
    async fn test_users_scenario(users: Table<User, MemoryStore>) {
        users.create(&user("foo", 18)).await.unwrap();
        let actual = users.read(&json!({"name": "foo", "age": 18})).await.unwrap();
        assert_eq!(actual, Some(user("foo", 18)));

        users
            .update(&User {
                thing: Some("what".to_string()),
                ..user("foo", 18)
            })
            .await
            .unwrap();
        let actual = users.read(&json!({"name": "foo", "age": 18})).await.unwrap();
        assert_eq!(
            actual,
            Some(User {
                thing: Some("what".to_string()),
                ..user("foo", 18)
            })
        );

        users.delete(&json!({"name": "foo", "age": 18})).await.unwrap();
        let actual = users.read(&json!({"name": "foo", "age": 18})).await.unwrap();
        assert_eq!(actual, None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_leaves_unsupplied_attributes_absent(users: Table<User, MemoryStore>) {
        users.create(&user("foo", 18)).await.unwrap();
        let stored = users.store().items("users");
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].contains_key("email"));
        assert!(!stored[0].contains_key("thing"));
    }

    #[tokio::test]
    async fn test_round_trip_ids_past_f64_precision() {
        #[derive(Debug, Deserialize, PartialEq, Serialize)]
        struct Thing {
            id: u64,
            label: Option<String>,
        }

        let definition = TableDefinition {
            hash_key: IndexMap::from([("id".to_string(), AttributeType::Number)]),
            schema: IndexMap::from([("label".to_string(), AttributeType::String)]),
            table_name: "things".to_string(),
            ..Default::default()
        };
        let store = MemoryStore::new().with_definition(&definition).unwrap();
        let things: Table<Thing, MemoryStore> = Table::define(store, definition).unwrap();
        let first = Thing {
            id: 9_007_199_254_740_992,
            label: Some("a".to_string()),
        };
        let second = Thing {
            id: 9_007_199_254_740_993,
            label: Some("b".to_string()),
        };
        things.create(&first).await.unwrap();
        things.create(&second).await.unwrap();
        assert_eq!(things.store().items("things").len(), 2);
        let actual = things.read(&json!({"id": first.id})).await.unwrap();
        assert_eq!(actual, Some(first));
        let actual = things.read(&json!({"id": second.id})).await.unwrap();
        assert_eq!(actual, Some(second));
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_leaves_absent_attributes_untouched(users: Table<User, MemoryStore>) {
        users
            .create(&User {
                email: Some("foo@bar".to_string()),
                ..user("foo", 18)
            })
            .await
            .unwrap();
        users
            .update(&User {
                thing: Some("what".to_string()),
                ..user("foo", 18)
            })
            .await
            .unwrap();
        let actual = users.read(&json!({"name": "foo", "age": 18})).await.unwrap();
        assert_eq!(
            actual,
            Some(User {
                name: "foo".to_string(),
                age: 18,
                email: Some("foo@bar".to_string()),
                thing: Some("what".to_string()),
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_requires_key(values: Table<serde_json::Value, MemoryStore>) {
        let actual = values.update(&json!({"age": 18, "thing": "what"})).await;
        assert!(matches!(actual, Err(Error::MissingKeyAttribute(name)) if name == "name"));
        assert!(values.store().requests().is_empty());
    }

    #[rstest]
    #[case::empty(0, 0)]
    #[case::single(1, 1)]
    #[case::full_batch(25, 1)]
    #[case::one_over(26, 2)]
    #[case::fifty(50, 2)]
    #[case::sixty(60, 3)]
    #[case::eighty(80, 4)]
    #[tokio::test]
    async fn test_create_batch_chunks(
        users: Table<User, MemoryStore>,
        #[case] count: u32,
        #[case] batches: usize,
    ) {
        let records: Vec<User> = (0..count).map(|index| user(&format!("foo{index}"), 18)).collect();
        users.create_batch(&records).await.unwrap();
        let requests = users.store().requests();
        assert_eq!(requests.len(), batches);
        assert!(
            requests
                .iter()
                .all(|request| matches!(request, Request::BatchWriteItem(batch) if batch.items.len() <= 25))
        );
        let keys: Vec<_> = (0..count)
            .map(|index| json!({"name": format!("foo{index}"), "age": 18}))
            .collect();
        let actual = users.batch_read(&keys).await.unwrap();
        assert_eq!(actual.len(), count as usize);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_batch_validates_before_sending(
        values: Table<serde_json::Value, MemoryStore>,
    ) {
        let actual = values
            .create_batch(&[
                json!({"name": "foo", "age": 18}),
                json!({"name": "bar", "age": "eighteen"}),
            ])
            .await;
        assert!(matches!(
            actual,
            Err(Error::AttributeType { name, expected: AttributeType::Number, found: "string" })
                if name == "age"
        ));
        assert!(values.store().requests().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_batch_propagates_store_errors(users: Table<User, MemoryStore>) {
        let users = users.with_store(MemoryStore::new());
        let records: Vec<User> = (0..30).map(|index| user(&format!("foo{index}"), 18)).collect();
        let actual = users.create_batch(&records).await;
        assert!(matches!(actual, Err(Error::Store(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_batch_read_drops_missing_keys(users: Table<User, MemoryStore>) {
        users.create(&user("foo", 18)).await.unwrap();
        let actual = users
            .batch_read(&[
                json!({"name": "foo", "age": 18}),
                json!({"name": "bar", "age": 18}),
            ])
            .await
            .unwrap();
        assert_eq!(actual, vec![user("foo", 18)]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_batch_read_rejects_index_keys(users: Table<User, MemoryStore>) {
        let actual = users.batch_read(&[json!({"email": "foo@bar"})]).await;
        assert!(matches!(actual, Err(Error::KeyMismatch { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn test_query_hash_key_only(users: Table<User, MemoryStore>) {
        foob_partition(&users).await;
        let actual = users.query("foob").unwrap().exec().await.unwrap();
        assert_eq!(ages(&actual), vec![5, 10, 15, 20, 25]);
        assert!(actual.iter().all(|record| record.name == "foob"));
    }

    #[rstest]
    #[case::equals("equals", &[15], vec![15])]
    #[case::less_than("lt", &[6], vec![5])]
    #[case::less_than_or_equal("lte", &[10], vec![5, 10])]
    #[case::greater_than("gt", &[24], vec![25])]
    #[case::greater_than_or_equal("gte", &[15], vec![15, 20, 25])]
    #[case::between("between", &[5, 10], vec![5, 10])]
    #[case::empty_between("between", &[11, 14], vec![])]
    #[tokio::test]
    async fn test_query_sort_key_conditions(
        users: Table<User, MemoryStore>,
        #[case] operator: &str,
        #[case] operands: &[u32],
        #[case] expected: Vec<u32>,
    ) {
        foob_partition(&users).await;
        let sort_key = users.query("foob").unwrap().where_key("age").unwrap();
        let prepared = match (operator, operands) {
            ("equals", [value]) => sort_key.equals(value),
            ("lt", [value]) => sort_key.lt(value),
            ("lte", [value]) => sort_key.lte(value),
            ("gt", [value]) => sort_key.gt(value),
            ("gte", [value]) => sort_key.gte(value),
            ("between", [low, high]) => sort_key.between(low, high),
            _ => unreachable!(),
        };
        let actual = prepared.unwrap().exec().await.unwrap();
        assert_eq!(ages(&actual), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn test_query_begins_with(buildings: Table<Building, MemoryStore>) {
        let records: Vec<Building> = [
            "United States, New York",
            "United States, New Jersey",
            "Australia, Sydney",
        ]
        .into_iter()
        .map(|location| Building {
            building_id: 100,
            location: location.to_string(),
        })
        .collect();
        buildings.create_batch(&records).await.unwrap();
        let actual = buildings
            .query(100)
            .unwrap()
            .where_key("location")
            .unwrap()
            .begins_with("United States")
            .unwrap()
            .exec()
            .await
            .unwrap();
        let mut locations: Vec<String> = actual.into_iter().map(|record| record.location).collect();
        locations.sort();
        assert_eq!(
            locations,
            vec!["United States, New Jersey", "United States, New York"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_read_through_secondary_index(users: Table<User, MemoryStore>) {
        let record = User {
            email: Some("foo@bar".to_string()),
            ..user("foo", 18)
        };
        users.create(&record).await.unwrap();
        users.store().clear_requests();

        let actual = users.read(&json!({"email": "foo@bar"})).await.unwrap();
        assert_eq!(actual, Some(record.clone()));
        let requests = users.store().requests();
        assert!(matches!(
            requests.as_slice(),
            [Request::Query(query)] if query.index_name.as_deref() == Some("by_email")
                && query.sort_key_condition.is_none()
        ));

        users.store().clear_requests();
        let actual = users.read(&json!({"name": "foo", "age": 18})).await.unwrap();
        assert_eq!(actual, Some(record));
        assert!(matches!(
            users.store().requests().as_slice(),
            [Request::GetItem(_)]
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_read_through_composite_secondary_index(users: Table<User, MemoryStore>) {
        foob_partition(&users).await;
        users.store().clear_requests();
        let actual = users
            .read(&json!({"thing": "foob_15", "age": 15}))
            .await
            .unwrap();
        assert_eq!(actual.map(|record| record.age), Some(15));
        let requests = users.store().requests();
        let [Request::Query(query)] = requests.as_slice() else {
            panic!("expected a single query, got {requests:?}");
        };
        assert_eq!(query.index_name.as_deref(), Some("by_thing"));
        assert_eq!(
            query.key_condition().expression,
            "#x = :x and #y = :y"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_read_missing_is_not_an_error(users: Table<User, MemoryStore>) {
        let actual = users.read(&json!({"email": "nobody@bar"})).await.unwrap();
        assert_eq!(actual, None);
    }

    #[rstest]
    #[case::hash_key_only(json!({"name": "foo"}))]
    #[case::index_and_table_keys(json!({"email": "foo@bar", "age": 18}))]
    #[case::non_key_attribute(json!({"thing": "what"}))]
    #[tokio::test]
    async fn test_read_rejects_unknown_key_shape(
        users: Table<User, MemoryStore>,
        #[case] key: serde_json::Value,
    ) {
        let actual = users.read(&key).await;
        assert!(matches!(actual, Err(Error::UnknownKeyShape { .. })));
        assert!(users.store().requests().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_read_rejects_mistyped_key(users: Table<User, MemoryStore>) {
        let actual = users.read(&json!({"name": "foo", "age": "18"})).await;
        assert!(matches!(actual, Err(Error::AttributeType { name, .. }) if name == "age"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_requires_exact_key(users: Table<User, MemoryStore>) {
        let actual = users
            .delete(&json!({"name": "foo", "age": 18, "thing": "what"}))
            .await;
        assert!(matches!(actual, Err(Error::KeyMismatch { .. })));
        users.delete(&json!({"name": "foo", "age": 18})).await.unwrap();
    }

    #[rstest]
    fn test_define_rejects_malformed_definition() {
        let mut definition = users_definition();
        definition.secondary_indexes[1].name = "by_email".to_string();
        let actual = Table::<User, MemoryStore>::define(MemoryStore::new(), definition);
        assert!(matches!(
            actual,
            Err(Error::Definition(crate::error::DefinitionError::DuplicateIndexName(name)))
                if name == "by_email"
        ));
    }
}
