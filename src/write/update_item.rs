use crate::common;

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use std::collections;

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateItemInput {
    expression_attribute_names: Option<collections::HashMap<String, String>>,
    expression_attribute_values: Option<collections::HashMap<String, types::AttributeValue>>,
    keys: common::Item,
    table_name: String,
    update_expression: Option<String>,
}

/// Update item request.
///
/// Every attribute in `set` is assigned; attributes not listed are left untouched.
/// With nothing to set, the request only ensures the item exists.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, write};
/// use indexmap::IndexMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item = write::update_item::UpdateItem {
///     keys: common::Item::from([
///         ("name".to_string(), AttributeValue::S("foo".to_string())),
///         ("age".to_string(), AttributeValue::N("18".to_string())),
///     ]),
///     set: IndexMap::from([("thing".to_string(), AttributeValue::S("what".to_string()))]),
///     table_name: "users".to_string(),
/// };
/// // The crate builds: "SET #set0 = :set0"
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItem {
    /// The primary key of the item to update.
    pub keys: common::Item,
    /// The attributes to assign, in expression order.
    pub set: IndexMap<String, types::AttributeValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl UpdateItem {
    /// The `SET` update expression, `None` when there is nothing to assign.
    pub fn update_expression(&self) -> Option<common::ExpressionInput> {
        if self.set.is_empty() {
            return None;
        }
        let operations = self
            .set
            .iter()
            .enumerate()
            .map(|(index, (name, value))| {
                let name_placeholder = format!("#set{index}");
                let value_placeholder = format!(":set{index}");
                common::ExpressionInput {
                    expression: format!("{name_placeholder} = {value_placeholder}"),
                    expression_attribute_names: collections::HashMap::from([(
                        name_placeholder,
                        name.clone(),
                    )]),
                    expression_attribute_values: collections::HashMap::from([(
                        value_placeholder,
                        value.clone(),
                    )]),
                }
            })
            .collect();
        let mut operation = common::ExpressionInput::merge(", ", operations);
        operation.expression = format!("SET {}", operation.expression);
        Some(operation)
    }
}

impl From<UpdateItem> for UpdateItemInput {
    fn from(update_item: UpdateItem) -> Self {
        let (update_expression, expression_attribute_names, expression_attribute_values) =
            match update_item.update_expression() {
                Some(operation) => (
                    Some(operation.expression),
                    Some(operation.expression_attribute_names),
                    Some(operation.expression_attribute_values),
                ),
                None => (None, None, None),
            };
        Self {
            expression_attribute_names,
            expression_attribute_values,
            keys: update_item.keys,
            table_name: update_item.table_name,
            update_expression,
        }
    }
}

impl UpdateItem {
    /// Execute the update item request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.update_item", skip(client), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.into();
        client
            .update_item()
            .set_key(Some(update_item.keys))
            .set_update_expression(update_item.update_expression)
            .set_expression_attribute_names(update_item.expression_attribute_names)
            .set_expression_attribute_values(update_item.expression_attribute_values)
            .table_name(update_item.table_name)
            .send()
            .await
    }
}
