//! Canonical rule-set form used for equality and deduplication.

use super::codec::decode_text;
use super::types::{Rule, RuleTarget};
use serde::Serialize;
use std::cmp::Ordering;

/// A rule collection held in canonical form: every rule decoded and targeted
/// at `queryParam`, the whole list sorted by the canonical key.
///
/// Canonical ordering is a property of this type, not a convention callers
/// must remember: the only constructor sorts. Two rule sets describing the
/// same logical predicates compare equal no matter which code path produced
/// them (legacy migration vs. fresh derivation), which is what makes the
/// duplicate check on merge reliable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    /// Build the canonical form of an arbitrary rule collection.
    ///
    /// Idempotent: feeding a canonical set back in returns it unchanged.
    /// Operators are kept as given; rewriting empty `equals` to `exists`
    /// happens during migration, and freshly derived rules are emitted with
    /// the right operator already.
    pub fn canonical<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut rules: Vec<Rule> = rules.into_iter().map(normalize_rule).collect();
        rules.sort_by(canonical_cmp);
        RuleSet(rules)
    }

    /// Rules in canonical order.
    pub fn rules(&self) -> &[Rule] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap into the plain rule list stored on a response.
    pub fn into_vec(self) -> Vec<Rule> {
        self.0
    }
}

fn normalize_rule(mut rule: Rule) -> Rule {
    rule.target = RuleTarget::QueryParam;
    rule.modifier = decode_text(&rule.modifier);
    rule.value = decode_text(&rule.value);
    rule
}

/// Canonical ordering: target, then modifier, then value as text, then
/// operator, then invert with `false` first.
fn canonical_cmp(a: &Rule, b: &Rule) -> Ordering {
    a.target
        .as_str()
        .cmp(b.target.as_str())
        .then_with(|| a.modifier.cmp(&b.modifier))
        .then_with(|| a.value.cmp(&b.value))
        .then_with(|| a.operator.as_str().cmp(b.operator.as_str()))
        .then_with(|| a.invert.cmp(&b.invert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::types::RuleOperator;

    #[test]
    fn test_canonical_is_idempotent() {
        let rules = vec![
            Rule::equals("b", "2"),
            Rule::absent("c"),
            Rule::equals("a", "1"),
            Rule::exists("a"),
        ];
        let once = RuleSet::canonical(rules);
        let twice = RuleSet::canonical(once.rules().to_vec());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_equality_is_encoding_insensitive() {
        let spaced = RuleSet::canonical(vec![Rule::equals("a b", "x y")]);
        let encoded = RuleSet::canonical(vec![Rule::equals("a%20b", "x%20y")]);
        assert_eq!(spaced, encoded);
    }

    #[test]
    fn test_legacy_targets_are_folded() {
        let legacy = RuleSet::canonical(vec![Rule {
            target: RuleTarget::Query,
            modifier: "a".to_string(),
            operator: RuleOperator::Equals,
            value: "1".to_string(),
            invert: false,
        }]);
        assert_eq!(legacy.rules()[0].target, RuleTarget::QueryParam);
    }

    #[test]
    fn test_order_independent_equality() {
        let forward = RuleSet::canonical(vec![Rule::equals("a", "1"), Rule::absent("b")]);
        let reversed = RuleSet::canonical(vec![Rule::absent("b"), Rule::equals("a", "1")]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_sort_key_value_before_operator() {
        // Same modifier: ordering falls through to value before operator
        let set = RuleSet::canonical(vec![Rule::equals("a", "z"), Rule::exists("a")]);
        // exists carries an empty value, so it sorts first
        assert_eq!(set.rules()[0].operator, RuleOperator::Exists);
        assert_eq!(set.rules()[1].value, "z");
    }

    #[test]
    fn test_invert_false_sorts_first() {
        let set = RuleSet::canonical(vec![Rule::absent("a"), Rule::exists("a")]);
        assert!(!set.rules()[0].invert);
        assert!(set.rules()[1].invert);
    }

    #[test]
    fn test_empty_input_is_empty_set() {
        let set = RuleSet::canonical(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set, RuleSet::default());
    }
}
