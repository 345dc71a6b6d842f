//! Rule model: a single matching predicate over one query parameter.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field that older documents serialize as explicit `null`
/// into its default, as if it were absent.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request field a rule matches against.
///
/// Current documents always use `queryParam`; `body` and `query` appear only
/// in documents written by older format revisions and are folded into
/// `queryParam` during migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleTarget {
    #[default]
    QueryParam,
    Body,
    Query,
}

impl RuleTarget {
    /// Wire name, also used for canonical text ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTarget::QueryParam => "queryParam",
            RuleTarget::Body => "body",
            RuleTarget::Query => "query",
        }
    }
}

/// Comparison applied to the targeted parameter.
///
/// Canonical form never carries `equals` with an empty value; that
/// combination is represented as `exists`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOperator {
    #[default]
    Equals,
    Exists,
}

impl RuleOperator {
    /// Wire name, also used for canonical text ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOperator::Equals => "equals",
            RuleOperator::Exists => "exists",
        }
    }
}

/// Combinator applied across a response's rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RulesCombinator {
    /// All rules must match (current policy for every produced response).
    #[default]
    And,
    Or,
}

/// A single matching predicate: target field, parameter name, comparison,
/// value, and negation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, deserialize_with = "null_to_default")]
    pub target: RuleTarget,
    #[serde(default, deserialize_with = "null_to_default")]
    pub modifier: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub operator: RuleOperator,
    #[serde(default, deserialize_with = "null_to_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub invert: bool,
}

impl Rule {
    /// Equality rule for a parameter captured with a value.
    pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            target: RuleTarget::QueryParam,
            modifier: name.into(),
            operator: RuleOperator::Equals,
            value: value.into(),
            invert: false,
        }
    }

    /// Existence rule for a parameter captured without a value.
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            target: RuleTarget::QueryParam,
            modifier: name.into(),
            operator: RuleOperator::Exists,
            value: String::new(),
            invert: false,
        }
    }

    /// Negated existence rule asserting a parameter must be absent.
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            target: RuleTarget::QueryParam,
            modifier: name.into(),
            operator: RuleOperator::Exists,
            value: String::new(),
            invert: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_serde_shape() {
        let rule = Rule::equals("type", "book");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target": "queryParam",
                "modifier": "type",
                "operator": "equals",
                "value": "book",
                "invert": false
            })
        );
    }

    #[test]
    fn test_legacy_targets_deserialize() {
        let rule: Rule =
            serde_json::from_str(r#"{"target":"query","modifier":"a","operator":"equals","value":"1"}"#)
                .unwrap();
        assert_eq!(rule.target, RuleTarget::Query);
        assert!(!rule.invert);

        let rule: Rule =
            serde_json::from_str(r#"{"target":"body","modifier":"b","operator":"exists"}"#).unwrap();
        assert_eq!(rule.target, RuleTarget::Body);
        assert_eq!(rule.value, "");
    }

    #[test]
    fn test_null_fields_deserialize_as_defaults() {
        let rule: Rule = serde_json::from_str(
            r#"{"target":null,"modifier":"a","operator":null,"value":null,"invert":null}"#,
        )
        .unwrap();
        assert_eq!(rule.target, RuleTarget::QueryParam);
        assert_eq!(rule.operator, RuleOperator::Equals);
        assert_eq!(rule.value, "");
        assert!(!rule.invert);
    }

    #[test]
    fn test_combinator_wire_names() {
        assert_eq!(serde_json::to_string(&RulesCombinator::And).unwrap(), "\"AND\"");
        assert_eq!(serde_json::to_string(&RulesCombinator::Or).unwrap(), "\"OR\"");
        assert_eq!(RulesCombinator::default(), RulesCombinator::And);
    }
}
