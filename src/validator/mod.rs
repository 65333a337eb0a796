//! Query validation
//!
//! One pass over the raw JSON query document: structure, grammar, key shapes,
//! single-dataset scoping, grouped-column legality. Validation is
//! parse-don't-validate: a successful pass yields the typed
//! [`ParsedQuery`](crate::query::ParsedQuery) the engine executes, so the
//! engine never re-checks grammar.

mod filter;
mod keys;
mod options;
mod query;
mod transformations;

pub use filter::FilterValidator;
pub use keys::KeyValidator;
pub use options::OptionsValidator;
pub use query::QueryValidator;
pub use transformations::TransformationsValidator;
