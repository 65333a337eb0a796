//! Result ordering
//!
//! A bare ORDER key sorts ascending on one column. A `{dir, keys}` order is a
//! recursive multi-key sort: stable-sort by the first key with the direction
//! applied, partition into runs of equal values, re-sort the remaining keys
//! within each run, and concatenate. Stable sorting makes the outcome a
//! deterministic total order with consistent tie-breaking.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::{Direction, Order};

use super::result::ResultRow;

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Sort rows in place according to the ORDER clause
    pub fn sort(rows: &mut [ResultRow], order: &Order) {
        match order {
            Order::Key(key) => Self::sort_by_key(rows, key, true),
            Order::Advanced { dir, keys } => {
                Self::sort_multi(rows, keys, *dir == Direction::Up)
            }
        }
    }

    fn sort_multi(rows: &mut [ResultRow], keys: &[String], ascending: bool) {
        let Some((key, rest)) = keys.split_first() else {
            return;
        };
        Self::sort_by_key(rows, key, ascending);
        if rest.is_empty() {
            return;
        }

        // Re-sort each run of equal first-key values by the remaining keys
        let mut start = 0;
        while start < rows.len() {
            let mut end = start + 1;
            while end < rows.len()
                && Self::compare_values(rows[start].get(key), rows[end].get(key))
                    == Ordering::Equal
            {
                end += 1;
            }
            Self::sort_multi(&mut rows[start..end], rest, ascending);
            start = end;
        }
    }

    fn sort_by_key(rows: &mut [ResultRow], key: &str, ascending: bool) {
        rows.sort_by(|a, b| {
            let ordering = Self::compare_values(a.get(key), b.get(key));
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }

    /// Total order over result cell values: numbers compare numerically,
    /// strings lexicographically. Mixed typing within one column cannot
    /// happen for a validated query, but the order stays total regardless
    /// (numbers before strings, absent before present).
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => match (a, b) {
                (Value::Number(a), Value::Number(b)) => {
                    let a = a.as_f64().unwrap_or(0.0);
                    let b = b.as_f64().unwrap_or(0.0);
                    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
                }
                (Value::String(a), Value::String(b)) => a.cmp(b),
                (Value::Number(_), _) => Ordering::Less,
                (_, Value::Number(_)) => Ordering::Greater,
                _ => Ordering::Equal,
            },
        }
    }
}
