use crate::common;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    expression_attribute_names: collections::HashMap<String, String>,
    expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
    index_name: Option<String>,
    key_condition_expression: String,
    table_name: String,
}

/// Query request against a table or one of its secondary indexes.
///
/// Only the first page returned by DynamoDB is read.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     index_name: None,
///     partition_key: common::key::Key {
///         name: "name".to_string(),
///         value: AttributeValue::S("foob".to_string()),
///     },
///     sort_key_condition: Some(common::condition::KeyCondition {
///         condition: common::condition::Condition::LessThan(AttributeValue::N("6".to_string())),
///         name: "age".to_string(),
///     }),
///     table_name: "users".to_string(),
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// The secondary index to query, `None` for the base table.
    pub index_name: Option<String>,
    /// The hash key value to query for.
    pub partition_key: common::key::Key<types::AttributeValue>,
    /// Optional condition to apply to the sort key.
    pub sort_key_condition: Option<common::condition::KeyCondition>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl Query {
    /// The key condition expression with its name aliases and value bindings.
    pub fn key_condition(&self) -> common::ExpressionInput {
        common::condition::KeyCondition::get_expression_operation(
            self.partition_key.clone(),
            self.sort_key_condition.clone(),
        )
    }

    /// Whether a stored item satisfies the key condition of this query.
    pub fn matches(&self, item: &common::Item) -> bool {
        let hash_matches = item.get(&self.partition_key.name).is_some_and(|value| {
            common::condition::Condition::Equals(self.partition_key.value.clone()).evaluate(value)
        });
        hash_matches
            && self.sort_key_condition.as_ref().is_none_or(|sort_key| {
                item.get(&sort_key.name)
                    .is_some_and(|value| sort_key.condition.evaluate(value))
            })
    }
}

impl From<Query> for QueryInput {
    fn from(query: Query) -> Self {
        let key_condition = query.key_condition();
        Self {
            expression_attribute_names: key_condition.expression_attribute_names,
            expression_attribute_values: key_condition.expression_attribute_values,
            index_name: query.index_name,
            key_condition_expression: key_condition.expression,
            table_name: query.table_name,
        }
    }
}

impl Query {
    /// Execute the query request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.query", skip(client), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::query::QueryOutput, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.into();
        client
            .query()
            .key_condition_expression(query.key_condition_expression)
            .set_expression_attribute_names(Some(query.expression_attribute_names))
            .set_expression_attribute_values(Some(query.expression_attribute_values))
            .set_index_name(query.index_name)
            .table_name(query.table_name)
            .send()
            .await
    }
}
