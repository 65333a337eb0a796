//! Query execution
//!
//! Executes a validated query against one dataset's rows in six stages:
//! filter, project to qualified result rows, optional group/apply transform,
//! row-cap check, projection to COLUMNS, optional sort. Grammar violations
//! cannot reach this module; the only caller-facing failure here is the row
//! cap.

mod executor;
mod filter;
mod result;
mod sorter;
mod transform;

pub use executor::QueryExecutor;
pub use filter::FilterEvaluator;
pub use result::{number_value, ResultRow, RESULT_ROW_LIMIT};
pub use sorter::ResultSorter;
pub use transform::Transformer;
