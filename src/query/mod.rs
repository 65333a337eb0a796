//! Typed query representation
//!
//! The validator parses the raw JSON query document into these types; the
//! engine evaluates them with exhaustive matching.

mod ast;

pub use ast::{
    ApplyRule, ApplyToken, Direction, Filter, MComparison, Order, ParsedQuery, SComparison,
    Transformations,
};
