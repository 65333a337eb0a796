//! Query executor
//!
//! Runs a validated query against one dataset's rows, in strict stage order:
//!
//! 1. Filter rows by the WHERE tree (empty WHERE keeps everything)
//! 2. Project each surviving record to a full qualified-key result row
//! 3. Transform (GROUP/APPLY) when present
//! 4. Enforce the row cap, strictly before projection and ordering
//! 5. Narrow each row to COLUMNS
//! 6. Sort when ORDER is present
//!
//! Deterministic: same query + same rows = same results.

use crate::error::{FacadeError, FacadeResult};
use crate::model::{FieldAccess, FieldValue};

use super::filter::FilterEvaluator;
use super::result::{number_value, ResultRow, RESULT_ROW_LIMIT};
use super::sorter::ResultSorter;
use super::transform::Transformer;
use crate::query::ParsedQuery;

/// Executes validated queries against a dataset's rows
pub struct QueryExecutor<'a> {
    dataset_id: &'a str,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(dataset_id: &'a str) -> Self {
        Self { dataset_id }
    }

    /// Execute the query. The only caller-facing failure is the row cap;
    /// every other precondition was established by validation.
    pub fn execute<R: FieldAccess>(
        &self,
        rows: &[R],
        query: &ParsedQuery,
    ) -> FacadeResult<Vec<ResultRow>> {
        let mut result: Vec<ResultRow> = match &query.filter {
            None => rows.iter().map(|record| self.to_result_row(record)).collect(),
            Some(filter) => rows
                .iter()
                .filter(|record| FilterEvaluator::matches(*record, filter))
                .map(|record| self.to_result_row(record))
                .collect(),
        };

        if let Some(transformations) = &query.transformations {
            result = Transformer::transform(&result, transformations);
        }

        if result.len() > RESULT_ROW_LIMIT {
            return Err(FacadeError::ResultTooLarge);
        }

        let mut result = Self::project(result, &query.columns);
        if let Some(order) = &query.order {
            ResultSorter::sort(&mut result, order);
        }
        Ok(result)
    }

    /// Map a record to a row keyed `datasetId_field` for every schema field
    fn to_result_row<R: FieldAccess>(&self, record: &R) -> ResultRow {
        let mut row = ResultRow::new();
        for field in R::FIELD_NAMES {
            let value = match record.get(field) {
                Some(FieldValue::Str(value)) => serde_json::Value::String(value.to_string()),
                Some(FieldValue::Num(value)) => number_value(value),
                None => unreachable!("schema field {} unreadable", field),
            };
            row.insert(format!("{}_{}", self.dataset_id, field), value);
        }
        row
    }

    /// Narrow each row to exactly the requested columns
    fn project(rows: Vec<ResultRow>, columns: &[String]) -> Vec<ResultRow> {
        rows.into_iter()
            .map(|row| {
                let mut narrowed = ResultRow::new();
                for column in columns {
                    let value = match row.get(column) {
                        Some(value) => value.clone(),
                        None => unreachable!("validated column {} missing from row", column),
                    };
                    narrowed.insert(column.clone(), value);
                }
                narrowed
            })
            .collect()
    }
}
