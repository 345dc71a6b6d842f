//! Rule derivation from captured query parameters.

use super::normalize::RuleSet;
use super::types::Rule;
use crate::capture::QueryPair;
use std::collections::{BTreeSet, HashSet};

/// Derive the minimal rule set matching one captured request.
///
/// Present parameters yield equality rules, or plain existence rules when the
/// captured value is empty. Every name in `known_params` missing from the
/// request yields a negated existence rule, which keeps this variant from
/// shadowing sibling variants that do carry the parameter.
///
/// Callers union the request's parameter names into `known_params` before
/// calling, so exclusion rules reflect everything observed so far. Variants
/// built earlier in the session are not re-derived.
pub fn derive_rules(pairs: &[QueryPair], known_params: &BTreeSet<String>) -> RuleSet {
    let mut rules: Vec<Rule> = pairs
        .iter()
        .map(|pair| {
            if pair.value.is_empty() {
                Rule::exists(pair.name.as_str())
            } else {
                Rule::equals(pair.name.as_str(), pair.value.as_str())
            }
        })
        .collect();

    let present: HashSet<&str> = pairs.iter().map(|pair| pair.name.as_str()).collect();
    rules.extend(
        known_params
            .iter()
            .filter(|name| !present.contains(name.as_str()))
            .map(|name| Rule::absent(name.as_str())),
    );

    RuleSet::canonical(rules)
}
