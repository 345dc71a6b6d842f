//! One-way upgrade of documents written by older format revisions.

use crate::environment::{Environment, ResponseMode};
use crate::rule::{Rule, RuleOperator, RuleSet, RuleTarget};
use tracing::debug;

/// Upgrade an environment document in place to the current rule model.
///
/// Safe to run unconditionally at the start of every merge session: a
/// document already in current form passes through unchanged. There is no
/// downgrade path.
///
/// Per route, selection is forced to rules-based mode. Per rule, legacy
/// `body`/`query` targets fold into `queryParam` and an equality comparison
/// against an empty value becomes a plain existence check; everything else
/// is preserved. Each rewritten rule list is re-canonicalized. A response
/// missing its combinator picks up `AND` from the document model's default
/// when it is deserialized.
pub fn migrate_environment(env: &mut Environment) {
    for route in &mut env.routes {
        route.response_mode = Some(ResponseMode::Rules);
        for response in &mut route.responses {
            let rules = std::mem::take(&mut response.rules);
            response.rules = RuleSet::canonical(rules.into_iter().map(migrate_rule)).into_vec();
        }
    }
    debug!("migrated {} route(s) to rules-based selection", env.routes.len());
}

fn migrate_rule(mut rule: Rule) -> Rule {
    rule.target = RuleTarget::QueryParam;
    if rule.operator == RuleOperator::Equals && rule.value.is_empty() {
        rule.operator = RuleOperator::Exists;
    }
    rule
}
