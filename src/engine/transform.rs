//! GROUP/APPLY transformation
//!
//! Partitions result rows into groups keyed by the serialized tuple of GROUP
//! key values (first-seen order of distinct tuples is preserved) and replaces
//! each group with one row carrying the group's key/value pairs plus every
//! APPLY aggregate. AVG and SUM accumulate exactly in decimal, not in naive
//! floating point, and round to two places.

use std::collections::{HashMap, HashSet};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::query::{ApplyRule, ApplyToken, Transformations};

use super::result::{number_value, ResultRow};

/// Applies the GROUP/APPLY stage to filtered result rows
pub struct Transformer;

impl Transformer {
    /// Replace rows with one aggregated row per distinct group tuple
    pub fn transform(rows: &[ResultRow], transformations: &Transformations) -> Vec<ResultRow> {
        let groups = Self::group_by_keys(rows, &transformations.group);

        let mut transformed = Vec::with_capacity(groups.len());
        for (mut row, members) in groups {
            for rule in &transformations.apply {
                row.insert(rule.name.clone(), Self::apply(&members, rule));
            }
            transformed.push(row);
        }
        transformed
    }

    /// Partition rows by the value tuple at `keys`, preserving first-seen
    /// order of distinct tuples. Each partition carries the tuple as a row.
    fn group_by_keys<'r>(
        rows: &'r [ResultRow],
        keys: &[String],
    ) -> Vec<(ResultRow, Vec<&'r ResultRow>)> {
        let mut groups: Vec<(ResultRow, Vec<&'r ResultRow>)> = Vec::new();
        let mut index_by_tuple: HashMap<String, usize> = HashMap::new();

        for row in rows {
            let mut tuple = ResultRow::new();
            for key in keys {
                tuple.insert(key.clone(), Self::value_at(row, key).clone());
            }
            let serialized = Value::Object(tuple.clone()).to_string();

            match index_by_tuple.get(&serialized) {
                Some(&index) => groups[index].1.push(row),
                None => {
                    index_by_tuple.insert(serialized, groups.len());
                    groups.push((tuple, vec![row]));
                }
            }
        }
        groups
    }

    /// Compute one aggregate over a group
    fn apply(members: &[&ResultRow], rule: &ApplyRule) -> Value {
        match rule.token {
            ApplyToken::Min => {
                let min = Self::numeric_values(members, &rule.key)
                    .fold(f64::INFINITY, |a, b| if b < a { b } else { a });
                number_value(min)
            }
            ApplyToken::Max => {
                let max = Self::numeric_values(members, &rule.key)
                    .fold(f64::NEG_INFINITY, |a, b| if b > a { b } else { a });
                number_value(max)
            }
            ApplyToken::Avg => {
                let total = Self::decimal_sum(members, &rule.key);
                let avg = total.to_f64().unwrap_or_else(|| {
                    unreachable!("decimal sum not representable as f64")
                }) / members.len() as f64;
                number_value((avg * 100.0).round() / 100.0)
            }
            ApplyToken::Sum => {
                let total = Self::decimal_sum(members, &rule.key)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                number_value(total.to_f64().unwrap_or_else(|| {
                    unreachable!("decimal sum not representable as f64")
                }))
            }
            ApplyToken::Count => {
                let distinct: HashSet<String> = members
                    .iter()
                    .map(|row| Self::value_at(*row, &rule.key).to_string())
                    .collect();
                number_value(distinct.len() as f64)
            }
        }
    }

    fn decimal_sum(members: &[&ResultRow], key: &str) -> Decimal {
        Self::numeric_values(members, key)
            .map(|value| match Decimal::from_f64_retain(value) {
                Some(decimal) => decimal,
                None => unreachable!("dataset numeric {} outside decimal range", value),
            })
            .fold(Decimal::ZERO, |a, b| a + b)
    }

    fn numeric_values<'r>(
        members: &'r [&'r ResultRow],
        key: &'r str,
    ) -> impl Iterator<Item = f64> + 'r {
        members.iter().map(move |row| {
            match Self::value_at(*row, key).as_f64() {
                Some(value) => value,
                None => unreachable!("validated aggregate read non-numeric key {}", key),
            }
        })
    }

    fn value_at<'r>(row: &'r ResultRow, key: &str) -> &'r Value {
        match row.get(key) {
            Some(value) => value,
            None => unreachable!("validated key {} missing from result row", key),
        }
    }
}
