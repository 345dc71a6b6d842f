//! Query-parameter rule model.
//!
//! - `types` - the rule predicate and its enums
//! - `codec` - tolerant percent-decoding of rule text
//! - `normalize` - canonical, sorted rule-set form
//! - `builder` - rule derivation from captured query parameters

mod builder;
mod codec;
mod normalize;
mod types;

pub use builder::derive_rules;
pub use codec::decode_text;
pub use normalize::RuleSet;
pub use types::{Rule, RuleOperator, RuleTarget, RulesCombinator};

pub(crate) use types::null_to_default;
