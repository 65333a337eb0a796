//! OPTIONS validation
//!
//! COLUMNS is required and non-empty. When a GROUP/APPLY legal-column set is
//! in effect, COLUMNS may only draw from it; otherwise COLUMNS entries are raw
//! dataset keys and fix the query's dataset id. ORDER may only reference keys
//! present in COLUMNS.

use serde_json::Value;

use crate::error::{FacadeError, FacadeResult};
use crate::query::{Direction, Order};

use super::keys::KeyValidator;

/// Validates the OPTIONS clause
pub struct OptionsValidator<'a> {
    keys: &'a KeyValidator<'a>,
    /// Legal column names once grouping is in effect; empty means no
    /// TRANSFORMATIONS clause was present
    group_and_apply: &'a [String],
}

impl<'a> OptionsValidator<'a> {
    pub fn new(keys: &'a KeyValidator<'a>, group_and_apply: &'a [String]) -> Self {
        Self {
            keys,
            group_and_apply,
        }
    }

    /// Validate the clause. Returns the dataset id (only resolved here when
    /// no transformations are in effect), the columns, and the order.
    pub fn validate(
        &self,
        node: &Value,
    ) -> FacadeResult<(Option<String>, Vec<String>, Option<Order>)> {
        let object = node
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query("OPTIONS must be object"))?;

        let columns_node = object
            .get("COLUMNS")
            .ok_or_else(|| FacadeError::invalid_query("OPTIONS missing COLUMNS"))?;
        if object.keys().any(|key| key != "COLUMNS" && key != "ORDER") {
            return Err(FacadeError::invalid_query("Invalid keys in OPTIONS"));
        }

        let (dataset_id, columns) = self.validate_columns(columns_node)?;

        let order = match object.get("ORDER") {
            Some(order_node) => Some(self.validate_order(order_node, &columns)?),
            None => None,
        };

        Ok((dataset_id, columns, order))
    }

    fn validate_columns(&self, node: &Value) -> FacadeResult<(Option<String>, Vec<String>)> {
        let list = node.as_array().filter(|list| !list.is_empty()).ok_or_else(|| {
            FacadeError::invalid_query("COLUMNS must be a non-empty array")
        })?;

        if !self.group_and_apply.is_empty() {
            let mut columns = Vec::with_capacity(list.len());
            for key in list {
                let legal = key
                    .as_str()
                    .map(|key| self.group_and_apply.iter().any(|name| name == key))
                    .unwrap_or(false);
                if !legal {
                    return Err(FacadeError::invalid_query(
                        "Keys in COLUMNS must be in GROUP or APPLY when TRANSFORMATIONS is present",
                    ));
                }
                columns.push(key.as_str().map(String::from).unwrap_or_else(|| {
                    unreachable!("legal COLUMNS key was not a string")
                }));
            }
            return Ok((None, columns));
        }

        let dataset_id = self
            .keys
            .validate_keys_and_extract_dataset_id(list, "COLUMNS")?;
        let columns = list
            .iter()
            .map(|key| match key.as_str() {
                Some(key) => key.to_string(),
                None => unreachable!("validated COLUMNS key was not a string"),
            })
            .collect();
        Ok((Some(dataset_id), columns))
    }

    fn validate_order(&self, node: &Value, columns: &[String]) -> FacadeResult<Order> {
        if let Some(key) = node.as_str() {
            if !columns.iter().any(|column| column == key) {
                return Err(FacadeError::invalid_query("ORDER key must be in COLUMNS"));
            }
            return Ok(Order::Key(key.to_string()));
        }

        let object = node
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query("Invalid ORDER type"))?;

        let dir_node = object
            .get("dir")
            .ok_or_else(|| FacadeError::invalid_query("ORDER missing \"dir\" key"))?;
        let dir = dir_node
            .as_str()
            .and_then(Direction::parse)
            .ok_or_else(|| FacadeError::invalid_query("Invalid ORDER direction"))?;

        let keys_node = object
            .get("keys")
            .ok_or_else(|| FacadeError::invalid_query("ORDER missing \"keys\" key"))?;
        let keys_list = keys_node.as_array().filter(|list| !list.is_empty()).ok_or_else(
            || FacadeError::invalid_query("ORDER keys must be a non-empty array"),
        )?;

        let mut keys = Vec::with_capacity(keys_list.len());
        for key in keys_list {
            let key = key
                .as_str()
                .filter(|key| columns.iter().any(|column| column == key))
                .ok_or_else(|| {
                    FacadeError::invalid_query("All ORDER keys must be in COLUMNS")
                })?;
            keys.push(key.to_string());
        }

        if object.len() > 2 {
            return Err(FacadeError::invalid_query("Extra keys in ORDER"));
        }

        Ok(Order::Advanced { dir, keys })
    }
}
