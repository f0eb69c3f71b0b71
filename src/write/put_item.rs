use crate::common;

use aws_sdk_dynamodb::{Client, error, operation};

/// Put item request.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: common::Item::from([
///         ("name".to_string(), AttributeValue::S("foo".to_string())),
///         ("age".to_string(), AttributeValue::N("18".to_string())),
///     ]),
///     table_name: "users".to_string(),
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItem {
    /// The item to put into the table.
    pub item: common::Item,
    /// The name of the table to write to.
    pub table_name: String,
}

impl TryFrom<PutItem> for operation::put_item::PutItemInput {
    type Error = error::BuildError;

    fn try_from(put_item: PutItem) -> Result<Self, Self::Error> {
        Self::builder()
            .set_item(Some(put_item.item))
            .table_name(put_item.table_name)
            .build()
    }
}

impl PutItem {
    /// Execute the put item request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.put_item", skip(client), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: operation::put_item::PutItemInput = self.try_into()?;
        client
            .put_item()
            .set_item(put_item.item)
            .set_table_name(put_item.table_name)
            .send()
            .await
    }
}
