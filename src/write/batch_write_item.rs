use crate::common;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// Maximum number of requests DynamoDB accepts in a single batch write.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Batch write item request putting items into a single table.
///
/// Callers are expected to split larger item sets into chunks of
/// [`MAX_BATCH_WRITE_ITEMS`].
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     items: vec![common::Item::from([
///         ("id".to_string(), AttributeValue::S("1".to_string())),
///         ("name".to_string(), AttributeValue::S("John".to_string())),
///     ])],
///     table_name: "users".to_string(),
/// };
/// batch_write.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem {
    /// The items to put into the table.
    pub items: Vec<common::Item>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl TryFrom<BatchWriteItem> for operation::batch_write_item::BatchWriteItemInput {
    type Error = error::BuildError;

    fn try_from(batch_write_item: BatchWriteItem) -> Result<Self, Self::Error> {
        let mut write_requests = Vec::with_capacity(batch_write_item.items.len());
        for item in batch_write_item.items {
            let put_request = types::PutRequest::builder().set_item(Some(item)).build()?;
            let write_request = types::WriteRequest::builder()
                .set_put_request(Some(put_request))
                .build();
            write_requests.push(write_request);
        }
        let request_items =
            collections::HashMap::from([(batch_write_item.table_name, write_requests)]);
        Self::builder()
            .set_request_items(Some(request_items))
            .build()
    }
}

impl BatchWriteItem {
    /// Execute the batch write item request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.batch_write_item", skip_all, fields(table_name = %self.table_name, items = self.items.len()), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_write_item::BatchWriteItemOutput,
        error::SdkError<operation::batch_write_item::BatchWriteItemError>,
    > {
        let batch_write_item: operation::batch_write_item::BatchWriteItemInput =
            self.try_into()?;
        client
            .batch_write_item()
            .set_request_items(batch_write_item.request_items)
            .send()
            .await
    }
}
