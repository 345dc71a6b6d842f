//! Duplicate-aware insertion of captured responses into routes.

use crate::environment::{Route, RouteResponse};
use crate::rule::RuleSet;
use tracing::debug;

/// Outcome of offering a candidate response to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Candidate appended to the route's response list.
    Inserted,
    /// Candidate matched an existing response's status code and canonical
    /// rule set; the route is unchanged.
    Skipped,
}

/// Append `candidate` unless the route already carries an equivalent
/// response.
///
/// A duplicate is the same status code plus the same canonical rule set.
/// Stored rules are re-canonicalized for the comparison, since documents
/// written before the current format revision may hold rules in stored
/// order. A duplicate's body is discarded even when it differs from the
/// stored one.
///
/// Upstream preconditions: entries with an error status (>= 400) or an
/// empty body are filtered out by the fold pipeline and never offered here.
pub fn merge_response(route: &mut Route, candidate: RouteResponse) -> MergeAction {
    let candidate_rules = RuleSet::canonical(candidate.rules.iter().cloned());
    let duplicate = route.responses.iter().any(|existing| {
        existing.status_code == candidate.status_code
            && RuleSet::canonical(existing.rules.iter().cloned()) == candidate_rules
    });

    if duplicate {
        debug!(
            "skipped duplicate {} response for {} /{}",
            candidate.status_code, route.method, route.endpoint
        );
        MergeAction::Skipped
    } else {
        route.responses.push(candidate);
        MergeAction::Inserted
    }
}
