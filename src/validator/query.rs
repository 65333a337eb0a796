//! Whole-query validation
//!
//! Orchestrates structure, TRANSFORMATIONS, OPTIONS and WHERE validation into
//! one pass. A query references exactly one dataset; this pass resolves it
//! and produces the typed query the engine executes. Fails with a single
//! `InvalidQuery` on the first violation found.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{FacadeError, FacadeResult};
use crate::model::DatasetKind;
use crate::query::ParsedQuery;

use super::filter::FilterValidator;
use super::keys::KeyValidator;
use super::options::OptionsValidator;
use super::transformations::TransformationsValidator;

/// Validates raw query documents against the currently held datasets
pub struct QueryValidator {
    id_to_kind: HashMap<String, DatasetKind>,
}

impl QueryValidator {
    pub fn new(id_to_kind: HashMap<String, DatasetKind>) -> Self {
        Self { id_to_kind }
    }

    /// Validate a raw query document and parse it into a [`ParsedQuery`].
    pub fn validate(&self, raw: &Value) -> FacadeResult<ParsedQuery> {
        let query = self.validate_structure(raw)?;
        let keys = KeyValidator::new(&self.id_to_kind);

        let options_node = query
            .get("OPTIONS")
            .unwrap_or_else(|| unreachable!("OPTIONS checked present"));

        let (dataset_id, columns, order, transformations) =
            match query.get("TRANSFORMATIONS") {
                Some(transformations_node) => {
                    let (dataset_id, transformations, legal_columns) =
                        TransformationsValidator::new(&keys).validate(transformations_node)?;
                    let (_, columns, order) =
                        OptionsValidator::new(&keys, &legal_columns).validate(options_node)?;
                    (dataset_id, columns, order, Some(transformations))
                }
                None => {
                    let (dataset_id, columns, order) =
                        OptionsValidator::new(&keys, &[]).validate(options_node)?;
                    let dataset_id = dataset_id.unwrap_or_else(|| {
                        unreachable!("ungrouped COLUMNS must resolve a dataset id")
                    });
                    (dataset_id, columns, order, None)
                }
            };

        let kind = keys.kind_of(&dataset_id);

        let where_node = query
            .get("WHERE")
            .unwrap_or_else(|| unreachable!("WHERE checked present"));
        // The empty object is the sole zero-key filter; it matches every row
        let filter = match where_node.as_object() {
            Some(object) if object.is_empty() => None,
            _ => Some(FilterValidator::new(&dataset_id, kind).validate(where_node, "WHERE")?),
        };

        Ok(ParsedQuery {
            dataset_id,
            filter,
            columns,
            order,
            transformations,
        })
    }

    fn validate_structure<'q>(
        &self,
        raw: &'q Value,
    ) -> FacadeResult<&'q serde_json::Map<String, Value>> {
        let query = raw
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query("Query must be object"))?;
        if !query.contains_key("WHERE") {
            return Err(FacadeError::invalid_query("Missing WHERE"));
        }
        if !query.contains_key("OPTIONS") {
            return Err(FacadeError::invalid_query("Missing OPTIONS"));
        }
        if query
            .keys()
            .any(|key| !matches!(key.as_str(), "WHERE" | "OPTIONS" | "TRANSFORMATIONS"))
        {
            return Err(FacadeError::invalid_query("Excess keys in query"));
        }
        Ok(query)
    }
}
