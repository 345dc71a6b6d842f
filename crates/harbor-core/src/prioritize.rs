//! Specificity ordering and default selection for a route's responses.

use crate::environment::{ResponseMode, Route};

/// Re-sort a route's responses from most to least specific and re-assign
/// the single default flag.
///
/// Response order is the matching precedence the serving runtime walks:
/// descending rule count, zero-rule responses after the rest among equal
/// counts, ties otherwise keeping their current order (the sort is stable).
/// The default is the first post-sort response with an empty rule set, or
/// the first response when none is empty; exactly one response ends up
/// flagged.
///
/// Idempotent, and run over every route at session end, touched or not, so
/// merges into pre-existing routes re-derive ordering and default without
/// regenerating their older responses.
pub fn reprioritize(route: &mut Route) {
    route.response_mode = Some(ResponseMode::Rules);
    if route.responses.is_empty() {
        return;
    }

    route.responses.sort_by(|a, b| {
        b.rules
            .len()
            .cmp(&a.rules.len())
            .then_with(|| a.rules.is_empty().cmp(&b.rules.is_empty()))
    });

    let default_index = route
        .responses
        .iter()
        .position(|response| response.rules.is_empty())
        .unwrap_or(0);
    for (index, response) in route.responses.iter_mut().enumerate() {
        response.default = index == default_index;
    }
}
