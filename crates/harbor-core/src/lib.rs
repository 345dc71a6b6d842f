//! Harbor core: folds captured HTTP traffic into a rule-indexed mock
//! environment document.
//!
//! For a given method+path, captured response variants are disambiguated by
//! matching rules derived from request query parameters, so replaying the
//! environment returns the variant matching the original request. The
//! conversion is three composable passes over an explicit document value,
//! applied in fixed order by [`session::MergeSession`]:
//!
//! 1. `migrate` - upgrade documents from older format revisions
//! 2. fold - derive rules per captured entry and merge without duplicates
//! 3. `prioritize` - re-sort variants by specificity and re-flag defaults
//!
//! # Module Structure
//!
//! - `rule` - predicate model, canonical rule-set form, rule derivation
//! - `environment` - the persisted mock environment document
//! - `capture` - the captured-traffic (HTTP Archive) document
//! - `migrate` - legacy document upgrade
//! - `merge` - duplicate-aware response insertion
//! - `prioritize` - specificity ordering and default selection
//! - `session` - the conversion run tying the passes together

pub mod capture;
pub mod environment;
pub mod error;
pub mod merge;
pub mod migrate;
pub mod prioritize;
pub mod rule;
pub mod session;

pub use error::{Error, Result};
pub use merge::MergeAction;
pub use session::{EntryOutcome, FoldStats, MergeSession};
