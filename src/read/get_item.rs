use crate::common;

use aws_sdk_dynamodb::{Client, error, operation};

/// Get item request.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem {
///     keys: common::Item::from([("id".to_string(), AttributeValue::S("1".to_string()))]),
///     table_name: "users".to_string(),
/// };
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem {
    /// The primary key of the item to retrieve.
    pub keys: common::Item,
    /// The name of the table to read from.
    pub table_name: String,
}

impl TryFrom<GetItem> for operation::get_item::GetItemInput {
    type Error = error::BuildError;

    fn try_from(get_item: GetItem) -> Result<Self, Self::Error> {
        Self::builder()
            .set_key(Some(get_item.keys))
            .table_name(get_item.table_name)
            .build()
    }
}

impl GetItem {
    /// Execute the get item request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.get_item", skip(client), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item: operation::get_item::GetItemInput = self.try_into()?;
        client
            .get_item()
            .set_key(get_item.key)
            .set_table_name(get_item.table_name)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;

    #[rstest]
    #[case::hash_key_only(
        GetItem {
            keys: common::Item::from(
                [(
                    "b".to_string(),
                    types::AttributeValue::S(
                        "c".to_string()
                    ),
                )]
            ),
            table_name: "a".to_string(),
        },
        operation::get_item::GetItemInput::builder()
            .set_key(
                Some(
                    common::Item::from(
                        [(
                            "b".to_string(),
                            types::AttributeValue::S(
                                "c".to_string()
                            ),
                        )]
                    )
                )
            )
            .table_name("a")
            .build()
            .unwrap()
    )]
    #[case::hash_and_sort_key(
        GetItem {
            keys: common::Item::from(
                [
                    (
                        "b".to_string(),
                        types::AttributeValue::S(
                            "c".to_string()
                        ),
                    ),
                    (
                        "d".to_string(),
                        types::AttributeValue::N(
                            "18".to_string()
                        ),
                    ),
                ]
            ),
            table_name: "a".to_string(),
        },
        operation::get_item::GetItemInput::builder()
            .set_key(
                Some(
                    common::Item::from(
                        [
                            (
                                "b".to_string(),
                                types::AttributeValue::S(
                                    "c".to_string()
                                ),
                            ),
                            (
                                "d".to_string(),
                                types::AttributeValue::N(
                                    "18".to_string()
                                ),
                            ),
                        ]
                    )
                )
            )
            .table_name("a")
            .build()
            .unwrap()
    )]
    fn test_get_item(
        #[case] args: GetItem,
        #[case] expected: operation::get_item::GetItemInput,
    ) {
        let actual: operation::get_item::GetItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
