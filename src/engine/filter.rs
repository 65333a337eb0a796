//! Predicate evaluation for query execution
//!
//! Evaluates a validated filter tree against one record. No type coercion:
//! validation already guaranteed every referenced field exists on the
//! record's schema with the right typing, so a mismatch here is a defect, not
//! a miss.

use crate::model::{FieldAccess, FieldValue};
use crate::query::Filter;

/// Evaluates filter trees against records
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Whether a record satisfies the filter
    pub fn matches<R: FieldAccess>(record: &R, filter: &Filter) -> bool {
        match filter {
            Filter::And(filters) => filters.iter().all(|f| Self::matches(record, f)),
            Filter::Or(filters) => filters.iter().any(|f| Self::matches(record, f)),
            Filter::LessThan(cmp) => Self::numeric_field(record, &cmp.field) < cmp.value,
            Filter::GreaterThan(cmp) => Self::numeric_field(record, &cmp.field) > cmp.value,
            Filter::Equal(cmp) => Self::numeric_field(record, &cmp.field) == cmp.value,
            Filter::Is(cmp) => Self::wildcard_match(Self::string_field(record, &cmp.field), &cmp.pattern),
            Filter::Not(inner) => !Self::matches(record, inner),
        }
    }

    /// Match a value against an IS pattern.
    ///
    /// `*` and `**` match everything; a leading `*` makes a suffix match, a
    /// trailing `*` a prefix match, both a substring match; with no `*` the
    /// match is exact equality. Interior asterisks never reach evaluation.
    pub fn wildcard_match(value: &str, pattern: &str) -> bool {
        if !pattern.contains('*') {
            return value == pattern;
        }
        if pattern == "*" || pattern == "**" {
            return true;
        }

        let leading = pattern.starts_with('*');
        let trailing = pattern.ends_with('*');
        // '*' is a one-byte char, so byte slicing at its edges is sound
        if leading && trailing {
            value.contains(&pattern[1..pattern.len() - 1])
        } else if leading {
            value.ends_with(&pattern[1..])
        } else if trailing {
            value.starts_with(&pattern[..pattern.len() - 1])
        } else {
            unreachable!("interior asterisk in validated pattern {}", pattern)
        }
    }

    fn numeric_field<R: FieldAccess>(record: &R, field: &str) -> f64 {
        match record.get(field) {
            Some(FieldValue::Num(value)) => value,
            _ => unreachable!("validated filter read non-numeric field {}", field),
        }
    }

    fn string_field<'r, R: FieldAccess>(record: &'r R, field: &str) -> &'r str {
        match record.get(field) {
            Some(FieldValue::Str(value)) => value,
            _ => unreachable!("validated filter read non-string field {}", field),
        }
    }
}
