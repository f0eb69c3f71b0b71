use crate::common;

use aws_sdk_dynamodb::types;
use bigdecimal::BigDecimal;
use std::{cmp, collections, str::FromStr};

/// Joins the hash key equality and the sort key condition.
const KEY_CONDITION_SEPARATOR: &str = " and ";

/// Placeholder of the first sort key operand.
const FIRST_OPERAND: &str = ":y";

/// Placeholder of the second sort key operand.
const SECOND_OPERAND: &str = ":z";

/// Sort key condition.
///
/// A query carries at most one of these, applied to the sort key of the queried
/// table or index.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_mapper::common::condition;
///
/// let between = condition::Condition::Between(
///     AttributeValue::N("5".to_string()),
///     AttributeValue::N("10".to_string()),
/// );
/// assert!(between.evaluate(&AttributeValue::N("7".to_string())));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Checks if an attribute begins with a specified prefix (string types only).
    BeginsWith(String),
    /// Checks if an attribute value is between two values (inclusive).
    Between(types::AttributeValue, types::AttributeValue),
    /// Checks if an attribute value equals a specified value.
    Equals(types::AttributeValue),
    /// Checks if an attribute value is greater than a specified value.
    GreaterThan(types::AttributeValue),
    /// Checks if an attribute value is greater than or equal to a specified value.
    GreaterThanOrEqual(types::AttributeValue),
    /// Checks if an attribute value is less than a specified value.
    LessThan(types::AttributeValue),
    /// Checks if an attribute value is less than or equal to a specified value.
    LessThanOrEqual(types::AttributeValue),
}

impl Condition {
    /// The operator as written in a key condition expression.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::BeginsWith(_) => "begins_with",
            Self::Between(..) => "between",
            Self::Equals(_) => "=",
            Self::GreaterThan(_) => ">",
            Self::GreaterThanOrEqual(_) => ">=",
            Self::LessThan(_) => "<",
            Self::LessThanOrEqual(_) => "<=",
        }
    }

    /// The operand values, in binding order.
    pub fn operands(&self) -> Vec<types::AttributeValue> {
        match self {
            Self::BeginsWith(prefix) => vec![types::AttributeValue::S(prefix.clone())],
            Self::Between(low, high) => vec![low.clone(), high.clone()],
            Self::Equals(value)
            | Self::GreaterThan(value)
            | Self::GreaterThanOrEqual(value)
            | Self::LessThan(value)
            | Self::LessThanOrEqual(value) => vec![value.clone()],
        }
    }

    fn get_expression(
        self,
        key_placeholder: &str,
    ) -> (String, collections::HashMap<String, types::AttributeValue>) {
        let operator = self.operator();
        match self {
            Self::BeginsWith(prefix) => {
                let expression = format!("{operator}({key_placeholder}, {FIRST_OPERAND})");
                let values = collections::HashMap::from([(
                    FIRST_OPERAND.to_string(),
                    types::AttributeValue::S(prefix),
                )]);
                (expression, values)
            }
            Self::Between(low, high) => {
                let expression =
                    format!("{key_placeholder} {operator} {FIRST_OPERAND} and {SECOND_OPERAND}");
                let values = collections::HashMap::from([
                    (FIRST_OPERAND.to_string(), low),
                    (SECOND_OPERAND.to_string(), high),
                ]);
                (expression, values)
            }
            Self::Equals(value)
            | Self::GreaterThan(value)
            | Self::GreaterThanOrEqual(value)
            | Self::LessThan(value)
            | Self::LessThanOrEqual(value) => {
                let expression = format!("{key_placeholder} {operator} {FIRST_OPERAND}");
                let values = collections::HashMap::from([(FIRST_OPERAND.to_string(), value)]);
                (expression, values)
            }
        }
    }

    /// Evaluate the condition against a stored sort key value.
    pub fn evaluate(&self, value: &types::AttributeValue) -> bool {
        match self {
            Self::BeginsWith(prefix) => {
                matches!(value, types::AttributeValue::S(value) if value.starts_with(prefix.as_str()))
            }
            Self::Between(low, high) => {
                matches!(
                    compare(value, low),
                    Some(cmp::Ordering::Greater | cmp::Ordering::Equal)
                ) && matches!(
                    compare(value, high),
                    Some(cmp::Ordering::Less | cmp::Ordering::Equal)
                )
            }
            Self::Equals(other) => compare(value, other) == Some(cmp::Ordering::Equal),
            Self::GreaterThan(other) => compare(value, other) == Some(cmp::Ordering::Greater),
            Self::GreaterThanOrEqual(other) => matches!(
                compare(value, other),
                Some(cmp::Ordering::Greater | cmp::Ordering::Equal)
            ),
            Self::LessThan(other) => compare(value, other) == Some(cmp::Ordering::Less),
            Self::LessThanOrEqual(other) => matches!(
                compare(value, other),
                Some(cmp::Ordering::Less | cmp::Ordering::Equal)
            ),
        }
    }
}

/// Order two key values the way DynamoDB orders sort keys.
///
/// Numbers compare as exact decimals. Returns `None` when the values are not of the same
/// scalar type.
pub fn compare(
    left: &types::AttributeValue,
    right: &types::AttributeValue,
) -> Option<cmp::Ordering> {
    match (left, right) {
        (types::AttributeValue::S(left), types::AttributeValue::S(right)) => Some(left.cmp(right)),
        (types::AttributeValue::N(left), types::AttributeValue::N(right)) => {
            let left = BigDecimal::from_str(left).ok()?;
            let right = BigDecimal::from_str(right).ok()?;
            Some(left.cmp(&right))
        }
        (types::AttributeValue::B(left), types::AttributeValue::B(right)) => {
            Some(left.as_ref().cmp(right.as_ref()))
        }
        _ => None,
    }
}

/// Condition applied to a key attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition {
    /// The condition to apply to the attribute.
    pub condition: Condition,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

impl KeyCondition {
    /// Render the key condition expression of a query.
    ///
    /// The hash key is aliased `#x` and bound to `:x`; the sort key, when present,
    /// is aliased `#y` and bound to `:y` (and `:z` for the upper bound of `between`).
    pub(crate) fn get_expression_operation(
        partition_key: common::key::Key<types::AttributeValue>,
        sort_key: Option<Self>,
    ) -> common::ExpressionInput {
        let mut operation = common::ExpressionInput {
            expression: "#x = :x".to_string(),
            expression_attribute_names: collections::HashMap::from([(
                "#x".to_string(),
                partition_key.name,
            )]),
            expression_attribute_values: collections::HashMap::from([(
                ":x".to_string(),
                partition_key.value,
            )]),
        };
        if let Some(sort_key) = sort_key {
            let (expression, expression_attribute_values) = sort_key.condition.get_expression("#y");
            let sort_operation = common::ExpressionInput {
                expression,
                expression_attribute_names: collections::HashMap::from([(
                    "#y".to_string(),
                    sort_key.name,
                )]),
                expression_attribute_values,
            };
            operation =
                common::ExpressionInput::merge(KEY_CONDITION_SEPARATOR, vec![operation, sort_operation]);
        }
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn number(value: &str) -> types::AttributeValue {
        types::AttributeValue::N(value.to_string())
    }

    fn string(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    #[rstest]
    #[case::equals(Condition::Equals(number("1")), "#y = :y")]
    #[case::less_than(Condition::LessThan(number("1")), "#y < :y")]
    #[case::less_than_or_equal(Condition::LessThanOrEqual(number("1")), "#y <= :y")]
    #[case::greater_than(Condition::GreaterThan(number("1")), "#y > :y")]
    #[case::greater_than_or_equal(Condition::GreaterThanOrEqual(number("1")), "#y >= :y")]
    #[case::between(Condition::Between(number("1"), number("2")), "#y between :y and :z")]
    #[case::begins_with(Condition::BeginsWith("a".to_string()), "begins_with(#y, :y)")]
    fn test_get_expression(#[case] condition: Condition, #[case] expected: &str) {
        let (actual, _) = condition.get_expression("#y");
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::hash_key_only(
        common::key::Key {
            name: "a".to_string(),
            value: string("b"),
        },
        None,
        common::ExpressionInput {
            expression: "#x = :x".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [("#x".to_string(), "a".to_string())]
            ),
            expression_attribute_values: collections::HashMap::from(
                [(":x".to_string(), string("b"))]
            ),
        }
    )]
    #[case::between(
        common::key::Key {
            name: "a".to_string(),
            value: string("b"),
        },
        Some(
            KeyCondition {
                condition: Condition::Between(number("5"), number("10")),
                name: "c".to_string(),
            }
        ),
        common::ExpressionInput {
            expression: "#x = :x and #y between :y and :z".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#x".to_string(), "a".to_string()),
                    ("#y".to_string(), "c".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (":x".to_string(), string("b")),
                    (":y".to_string(), number("5")),
                    (":z".to_string(), number("10")),
                ]
            ),
        }
    )]
    #[case::begins_with(
        common::key::Key {
            name: "a".to_string(),
            value: number("100"),
        },
        Some(
            KeyCondition {
                condition: Condition::BeginsWith("United States".to_string()),
                name: "c".to_string(),
            }
        ),
        common::ExpressionInput {
            expression: "#x = :x and begins_with(#y, :y)".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#x".to_string(), "a".to_string()),
                    ("#y".to_string(), "c".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (":x".to_string(), number("100")),
                    (":y".to_string(), string("United States")),
                ]
            ),
        }
    )]
    fn test_get_expression_operation(
        #[case] partition_key: common::key::Key<types::AttributeValue>,
        #[case] sort_key: Option<KeyCondition>,
        #[case] expected: common::ExpressionInput,
    ) {
        let actual = KeyCondition::get_expression_operation(partition_key, sort_key);
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::equals_numeric(Condition::Equals(number("18")), number("18.0"), true)]
    #[case::less_than(Condition::LessThan(number("6")), number("5"), true)]
    #[case::less_than_boundary(Condition::LessThan(number("6")), number("6"), false)]
    #[case::less_than_or_equal(Condition::LessThanOrEqual(number("10")), number("10"), true)]
    #[case::greater_than(Condition::GreaterThan(number("24")), number("25"), true)]
    #[case::greater_than_or_equal(Condition::GreaterThanOrEqual(number("15")), number("14"), false)]
    #[case::between_low(Condition::Between(number("5"), number("10")), number("5"), true)]
    #[case::between_high(Condition::Between(number("5"), number("10")), number("10"), true)]
    #[case::between_outside(Condition::Between(number("5"), number("10")), number("15"), false)]
    #[case::begins_with(Condition::BeginsWith("United States".to_string()), string("United States, New York"), true)]
    #[case::begins_with_other(Condition::BeginsWith("United States".to_string()), string("Australia, Sydney"), false)]
    #[case::mismatched_types(Condition::Equals(number("1")), string("1"), false)]
    #[case::equals_past_f64_precision(Condition::Equals(number("9007199254740992")), number("9007199254740993"), false)]
    #[case::greater_than_past_f64_precision(Condition::GreaterThan(number("9007199254740992")), number("9007199254740993"), true)]
    #[case::between_38_digits(
        Condition::Between(number("12345678901234567890123456789012345670"), number("12345678901234567890123456789012345679")),
        number("12345678901234567890123456789012345671"),
        true
    )]
    #[case::equals_fraction(Condition::Equals(number("0.1")), number("0.10000000000000001"), false)]
    fn test_evaluate(
        #[case] condition: Condition,
        #[case] value: types::AttributeValue,
        #[case] expected: bool,
    ) {
        assert_eq!(condition.evaluate(&value), expected);
    }

    #[test]
    fn test_compare_strings_lexicographically() {
        assert_eq!(
            compare(&string("Australia"), &string("United States")),
            Some(cmp::Ordering::Less)
        );
    }
}
