use crate::{
    common::{
        condition::{Condition, KeyCondition},
        key::Key,
    },
    definition::attribute::AttributeType,
    error::{Error, Result},
    read,
    resolver::{self, IndexRef, KeyAttribute},
    store::Store,
    table::Table,
};

use aws_sdk_dynamodb::types;
use serde::{Serialize, de::DeserializeOwned};

/// A query bound to a hash key value.
///
/// Execute it as is to fetch the whole partition, or narrow it down with
/// [`QueryBuilder::where_key`].
pub struct QueryBuilder<'t, T, S> {
    index: IndexRef,
    partition_key: Key<types::AttributeValue>,
    table: &'t Table<T, S>,
}

impl<'t, T, S> QueryBuilder<'t, T, S> {
    pub(crate) fn new<V: Serialize>(
        table: &'t Table<T, S>,
        index: IndexRef,
        hash_value: V,
    ) -> Result<Self> {
        let hash_key = &table.resolved().key_schema(index).hash_key;
        let partition_key = Key {
            name: hash_key.name.clone(),
            value: hash_value,
        }
        .serialize()?;
        resolver::check_type(&hash_key.name, hash_key.attribute_type, &partition_key.value)?;
        Ok(Self {
            index,
            partition_key,
            table,
        })
    }

    /// Apply a condition on the sort key.
    ///
    /// Fails with [`Error::InvalidSortKey`] when `name` is not the sort key of the
    /// queried table or index, including when none is declared.
    pub fn where_key(self, name: &str) -> Result<SortKeyBuilder<'t, T, S>> {
        let table = self.table;
        match &table.resolved().key_schema(self.index).sort_key {
            Some(sort_key) if sort_key.name == name => Ok(SortKeyBuilder {
                query: self,
                sort_key,
            }),
            _ => Err(Error::InvalidSortKey {
                name: name.to_string(),
                target: table.resolved().describe(self.index),
            }),
        }
    }

    /// Finalize the query without a sort key condition.
    pub fn prepare(self) -> PreparedQuery<'t, T, S> {
        self.finish(None)
    }

    fn finish(self, sort_key_condition: Option<KeyCondition>) -> PreparedQuery<'t, T, S> {
        let resolved = self.table.resolved();
        let request = read::query::Query {
            index_name: resolved.index_name(self.index).map(str::to_string),
            partition_key: self.partition_key,
            sort_key_condition,
            table_name: resolved.table_name().to_string(),
        };
        PreparedQuery {
            request,
            table: self.table,
        }
    }
}

impl<T, S> QueryBuilder<'_, T, S>
where
    T: DeserializeOwned,
    S: Store,
{
    /// Execute the query without a sort key condition.
    pub async fn exec(self) -> Result<Vec<T>> {
        self.prepare().exec().await
    }
}

/// A query waiting for its sort key condition.
///
/// Every operand is checked against the declared sort key type.
pub struct SortKeyBuilder<'t, T, S> {
    query: QueryBuilder<'t, T, S>,
    sort_key: &'t KeyAttribute,
}

impl<'t, T, S> SortKeyBuilder<'t, T, S> {
    fn operand<V: Serialize>(&self, value: V) -> Result<types::AttributeValue> {
        let value = serde_dynamo::to_attribute_value(value)?;
        resolver::check_type(&self.sort_key.name, self.sort_key.attribute_type, &value)?;
        Ok(value)
    }

    fn finish(self, condition: Condition) -> PreparedQuery<'t, T, S> {
        let sort_key_condition = KeyCondition {
            condition,
            name: self.sort_key.name.clone(),
        };
        self.query.finish(Some(sort_key_condition))
    }

    /// Sort key equal to `value`.
    pub fn equals<V: Serialize>(self, value: V) -> Result<PreparedQuery<'t, T, S>> {
        let value = self.operand(value)?;
        Ok(self.finish(Condition::Equals(value)))
    }

    /// Sort key strictly lower than `value`.
    pub fn lt<V: Serialize>(self, value: V) -> Result<PreparedQuery<'t, T, S>> {
        let value = self.operand(value)?;
        Ok(self.finish(Condition::LessThan(value)))
    }

    /// Sort key lower than or equal to `value`.
    pub fn lte<V: Serialize>(self, value: V) -> Result<PreparedQuery<'t, T, S>> {
        let value = self.operand(value)?;
        Ok(self.finish(Condition::LessThanOrEqual(value)))
    }

    /// Sort key strictly greater than `value`.
    pub fn gt<V: Serialize>(self, value: V) -> Result<PreparedQuery<'t, T, S>> {
        let value = self.operand(value)?;
        Ok(self.finish(Condition::GreaterThan(value)))
    }

    /// Sort key greater than or equal to `value`.
    pub fn gte<V: Serialize>(self, value: V) -> Result<PreparedQuery<'t, T, S>> {
        let value = self.operand(value)?;
        Ok(self.finish(Condition::GreaterThanOrEqual(value)))
    }

    /// Sort key within `low..=high`.
    pub fn between<V: Serialize>(self, low: V, high: V) -> Result<PreparedQuery<'t, T, S>> {
        let low = self.operand(low)?;
        let high = self.operand(high)?;
        Ok(self.finish(Condition::Between(low, high)))
    }

    /// Sort key starting with `prefix`. Only string sort keys accept it.
    pub fn begins_with(self, prefix: impl Into<String>) -> Result<PreparedQuery<'t, T, S>> {
        if self.sort_key.attribute_type != AttributeType::String {
            return Err(Error::InvalidOperator {
                operator: "begins_with",
                name: self.sort_key.name.clone(),
                attribute_type: self.sort_key.attribute_type,
            });
        }
        Ok(self.finish(Condition::BeginsWith(prefix.into())))
    }
}

/// A finalized query.
pub struct PreparedQuery<'t, T, S> {
    request: read::query::Query,
    table: &'t Table<T, S>,
}

impl<T, S> PreparedQuery<'_, T, S> {
    /// The request that [`PreparedQuery::exec`] sends.
    pub fn request(&self) -> &read::query::Query {
        &self.request
    }

    /// Take the request out, e.g. to send it with another client.
    pub fn into_request(self) -> read::query::Query {
        self.request
    }
}

impl<T, S> PreparedQuery<'_, T, S>
where
    S: Store,
{
    /// Send the query and decode the first page of results as records.
    pub async fn exec(self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.exec_as().await
    }

    /// Send the query and decode the first page of results as `U`.
    ///
    /// Useful with indexes projecting only part of the record.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_mapper.table.query",
            skip_all,
            fields(
                table_name = %self.request.table_name,
                index_name = ?self.request.index_name,
            ),
            err
        )
    )]
    pub async fn exec_as<U: DeserializeOwned>(self) -> Result<Vec<U>> {
        let items = self.table.store().query(self.request).await?;
        let records = serde_dynamo::from_items(items)?;
        Ok(records)
    }
}
