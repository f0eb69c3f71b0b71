use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Result, to_attribute_value};

/// Key component: a key attribute name and its value.
///
/// ```rust
/// use dynamodb_mapper::common::key;
///
/// let key = key::Key {
///     name: "id".to_string(),
///     value: "1".to_string(),
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

impl<T: Serialize> Key<T> {
    /// Serialize the value into a DynamoDB attribute value.
    pub fn serialize(self) -> Result<Key<types::AttributeValue>> {
        let value = to_attribute_value(self.value)?;
        Ok(Key {
            name: self.name,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::string(json!("b"), types::AttributeValue::S("b".to_string()))]
    #[case::number(json!(42), types::AttributeValue::N("42".to_string()))]
    #[case::float(json!(4.5), types::AttributeValue::N("4.5".to_string()))]
    #[case::boolean(json!(true), types::AttributeValue::Bool(true))]
    fn test_key_serialize(#[case] value: Value, #[case] expected: types::AttributeValue) {
        let key = Key {
            name: "a".to_string(),
            value,
        };
        let actual = key.serialize().unwrap();
        assert_eq!(
            actual,
            Key {
                name: "a".to_string(),
                value: expected,
            }
        );
    }
}
