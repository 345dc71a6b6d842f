//! Merge session: migrate, fold captures, reprioritize.

use crate::capture::{CaptureDocument, CaptureEntry};
use crate::environment::{Environment, Header, RootChild, Route, RouteResponse};
use crate::merge::{merge_response, MergeAction};
use crate::migrate::migrate_environment;
use crate::prioritize::reprioritize;
use crate::rule::{derive_rules, RuleTarget};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Route lookup key: lowercase method plus slash-prefixed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    method: String,
    path: String,
}

impl RouteKey {
    fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_lowercase(),
            path: path.to_string(),
        }
    }

    fn for_route(route: &Route) -> Self {
        Self {
            method: route.method.clone(),
            path: format!("/{}", route.endpoint),
        }
    }
}

/// What folding one captured entry did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// First observation of this method+path: route created.
    RouteCreated,
    /// New response variant appended to an existing route.
    ResponseAdded,
    /// Candidate matched an existing variant's status and rules.
    DuplicateSkipped,
    /// Response status marked the capture as an error (>= 400).
    ErrorStatusSkipped,
    /// Captured body was empty; not a valid mock response.
    EmptyBodySkipped,
    /// Entry had no usable request/response pair.
    MissingResponseSkipped,
}

/// Aggregate entry outcomes for one or more folded documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    pub routes_created: usize,
    pub responses_added: usize,
    pub duplicates_skipped: usize,
    pub error_status_skipped: usize,
    pub empty_body_skipped: usize,
    pub missing_response_skipped: usize,
}

impl FoldStats {
    pub fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::RouteCreated => self.routes_created += 1,
            EntryOutcome::ResponseAdded => self.responses_added += 1,
            EntryOutcome::DuplicateSkipped => self.duplicates_skipped += 1,
            EntryOutcome::ErrorStatusSkipped => self.error_status_skipped += 1,
            EntryOutcome::EmptyBodySkipped => self.empty_body_skipped += 1,
            EntryOutcome::MissingResponseSkipped => self.missing_response_skipped += 1,
        }
    }

    /// Fold another stats block into this one.
    pub fn absorb(&mut self, other: FoldStats) {
        self.routes_created += other.routes_created;
        self.responses_added += other.responses_added;
        self.duplicates_skipped += other.duplicates_skipped;
        self.error_status_skipped += other.error_status_skipped;
        self.empty_body_skipped += other.empty_body_skipped;
        self.missing_response_skipped += other.missing_response_skipped;
    }

    pub fn entries_merged(&self) -> usize {
        self.routes_created + self.responses_added
    }

    pub fn entries_skipped(&self) -> usize {
        self.duplicates_skipped
            + self.error_status_skipped
            + self.empty_body_skipped
            + self.missing_response_skipped
    }
}

/// One conversion run over a persisted environment document.
///
/// Owns the document plus two derived caches: the route index and the set
/// of query parameter names observed per route. Both caches are rebuilt
/// from the document at session start and extended as entries are folded;
/// they are never persisted, the document stays the only source of truth.
///
/// Fixed pass order: migrate on construction, fold documents strictly in
/// sequence, reprioritize everything in [`MergeSession::finish`].
pub struct MergeSession {
    env: Environment,
    route_index: HashMap<RouteKey, usize>,
    known_params: HashMap<RouteKey, BTreeSet<String>>,
}

impl MergeSession {
    /// Start a session over `env`, migrating it to the current format and
    /// rebuilding the derived caches from its routes.
    pub fn new(mut env: Environment) -> Self {
        migrate_environment(&mut env);

        let mut route_index = HashMap::new();
        let mut known_params: HashMap<RouteKey, BTreeSet<String>> = HashMap::new();
        for (index, route) in env.routes.iter().enumerate() {
            let key = RouteKey::for_route(route);
            let params = known_params.entry(key.clone()).or_default();
            for response in &route.responses {
                for rule in &response.rules {
                    if rule.target == RuleTarget::QueryParam && !rule.modifier.is_empty() {
                        params.insert(rule.modifier.clone());
                    }
                }
            }
            route_index.insert(key, index);
        }

        Self {
            env,
            route_index,
            known_params,
        }
    }

    /// Fold every entry of one capture document into the environment.
    pub fn fold_document(&mut self, doc: &CaptureDocument) -> FoldStats {
        let mut stats = FoldStats::default();
        for entry in doc.entries() {
            stats.record(self.fold_entry(entry));
        }
        stats
    }

    /// Fold a single captured request/response pair.
    pub fn fold_entry(&mut self, entry: &CaptureEntry) -> EntryOutcome {
        let (Some(request), Some(response)) = (&entry.request, &entry.response) else {
            debug!("skipped entry without a usable request/response pair");
            return EntryOutcome::MissingResponseSkipped;
        };

        let Ok(status) = u16::try_from(response.status) else {
            debug!("skipped request {} with status {}", request.url, response.status);
            return EntryOutcome::ErrorStatusSkipped;
        };
        if status >= 400 {
            debug!("skipped errored request {} ({})", request.url, status);
            return EntryOutcome::ErrorStatusSkipped;
        }

        let body = response.formatted_body();
        if body.is_empty() {
            debug!("skipped empty body for {}", request.url);
            return EntryOutcome::EmptyBodySkipped;
        }

        let path = request.path();
        let key = RouteKey::new(&request.method, &path);

        // Union the request's names into the known set before deriving, so
        // the exclusion rules see parameters this very request introduces.
        let known = self.known_params.entry(key.clone()).or_default();
        for pair in &request.query_string {
            known.insert(pair.name.clone());
        }
        let rules = derive_rules(&request.query_string, known);

        let headers = response
            .headers
            .iter()
            .map(|h| Header::new(h.name.clone(), h.value.clone()))
            .collect();
        let label = format!("{} {}", status, request.url);
        let candidate = RouteResponse::captured(status, label, body, headers, rules);

        match self.route_index.get(&key) {
            Some(&index) => {
                let route = &mut self.env.routes[index];
                match merge_response(route, candidate) {
                    MergeAction::Inserted => {
                        info!("added {} response to {} {}", status, key.method, key.path);
                        EntryOutcome::ResponseAdded
                    }
                    MergeAction::Skipped => EntryOutcome::DuplicateSkipped,
                }
            }
            None => {
                let route = Route::new(key.method.clone(), &path, candidate);
                info!("added new route {} {}", key.method, key.path);
                self.env.root_children.push(RootChild::route(route.uuid.clone()));
                self.route_index.insert(key, self.env.routes.len());
                self.env.routes.push(route);
                EntryOutcome::RouteCreated
            }
        }
    }

    /// Number of routes currently in the document.
    pub fn route_count(&self) -> usize {
        self.env.routes.len()
    }

    /// Finish the session: re-order and re-flag every route, touched or
    /// not, and hand the document back for persistence.
    pub fn finish(mut self) -> Environment {
        for route in &mut self.env.routes {
            reprioritize(route);
        }
        self.env
    }
}
