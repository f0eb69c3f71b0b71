use crate::common;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// Maximum number of keys DynamoDB accepts in a single batch get.
pub const MAX_BATCH_GET_ITEMS: usize = 25;

/// Batch get item request for a single table.
///
/// Callers are expected to split larger key sets into chunks of
/// [`MAX_BATCH_GET_ITEMS`].
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_get = read::batch_get_item::BatchGetItem {
///     keys: vec![common::Item::from([(
///         "id".to_string(),
///         AttributeValue::S("1".to_string()),
///     )])],
///     table_name: "users".to_string(),
/// };
/// batch_get.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItem {
    /// The primary keys of the items to retrieve.
    pub keys: Vec<common::Item>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl TryFrom<BatchGetItem> for operation::batch_get_item::BatchGetItemInput {
    type Error = error::BuildError;

    fn try_from(batch_get_item: BatchGetItem) -> Result<Self, Self::Error> {
        let keys_and_attributes = types::KeysAndAttributes::builder()
            .set_keys(Some(batch_get_item.keys))
            .build()?;
        let request_items =
            collections::HashMap::from([(batch_get_item.table_name, keys_and_attributes)]);
        Self::builder()
            .set_request_items(Some(request_items))
            .build()
    }
}

impl BatchGetItem {
    /// Execute the batch get item request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.batch_get_item", skip_all, fields(table_name = %self.table_name, keys = self.keys.len()), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_get_item::BatchGetItemOutput,
        error::SdkError<operation::batch_get_item::BatchGetItemError>,
    > {
        let batch_get_item: operation::batch_get_item::BatchGetItemInput = self.try_into()?;
        client
            .batch_get_item()
            .set_request_items(batch_get_item.request_items)
            .send()
            .await
    }
}
