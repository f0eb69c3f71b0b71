use crate::common;

use aws_sdk_dynamodb::{Client, error, operation};

/// Delete item request.
///
/// Deleting a key that does not exist succeeds.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item = write::delete_item::DeleteItem {
///     keys: common::Item::from([("id".to_string(), AttributeValue::S("1".to_string()))]),
///     table_name: "users".to_string(),
/// };
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItem {
    /// The primary key of the item to delete.
    pub keys: common::Item,
    /// The name of the table to write to.
    pub table_name: String,
}

impl TryFrom<DeleteItem> for operation::delete_item::DeleteItemInput {
    type Error = error::BuildError;

    fn try_from(delete_item: DeleteItem) -> Result<Self, Self::Error> {
        Self::builder()
            .set_key(Some(delete_item.keys))
            .table_name(delete_item.table_name)
            .build()
    }
}

impl DeleteItem {
    /// Execute the delete item request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.delete_item", skip(client), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item: operation::delete_item::DeleteItemInput = self.try_into()?;
        client
            .delete_item()
            .set_key(delete_item.key)
            .set_table_name(delete_item.table_name)
            .send()
            .await
    }
}
