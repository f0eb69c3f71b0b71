//! Common utilities for DynamoDB operations.
//!
//! This module provides shared types used across read and write operations,
//! including key handling, sort key conditions and expression rendering.

/// Sort key conditions for queries.
pub mod condition;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

use aws_sdk_dynamodb::types;
use std::collections;

/// A DynamoDB item: attribute names mapped to attribute values.
pub type Item = collections::HashMap<String, types::AttributeValue>;

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// An expression with its attribute name aliases and value bindings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionInput {
    /// The expression text.
    pub expression: String,
    /// Attribute name aliases (`#x` to `name`).
    pub expression_attribute_names: collections::HashMap<String, String>,
    /// Attribute value bindings (`:x` to value).
    pub expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }
}

/// Drop `NULL` attributes, so that unsupplied optional fields stay absent.
pub(crate) fn strip_nulls(mut item: Item) -> Item {
    item.retain(|_, value| !matches!(value, types::AttributeValue::Null(_)));
    item
}
