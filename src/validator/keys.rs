//! Key and field validation
//!
//! A key addresses one field of one dataset: `<datasetId>_<fieldName>`, where
//! the id contains no underscore. This validator checks key shape, resolves
//! which single dataset a key list references, and checks every field against
//! the resolved dataset's kind.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{FacadeError, FacadeResult};
use crate::model::DatasetKind;

/// Pure key validation against the currently held datasets
pub struct KeyValidator<'a> {
    id_to_kind: &'a HashMap<String, DatasetKind>,
}

impl<'a> KeyValidator<'a> {
    pub fn new(id_to_kind: &'a HashMap<String, DatasetKind>) -> Self {
        Self { id_to_kind }
    }

    /// Validate a list of keys and resolve the single dataset they reference.
    ///
    /// Fails if any key is malformed, if the keys span more than one dataset,
    /// if the referenced dataset is not held, or if a field name is not a
    /// field of the dataset's kind. `context` names the clause being
    /// validated for error messages.
    pub fn validate_keys_and_extract_dataset_id(
        &self,
        keys: &[Value],
        context: &str,
    ) -> FacadeResult<String> {
        let mut dataset_id: Option<String> = None;
        let mut field_refs: Vec<&str> = Vec::with_capacity(keys.len());

        for key in keys {
            let key = self.validate_key_string(key, context)?;
            let (dataset_ref, field_ref) = split_key(key);
            field_refs.push(field_ref);

            match &dataset_id {
                None => {
                    if !self.id_to_kind.contains_key(dataset_ref) {
                        return Err(FacadeError::invalid_query(format!(
                            "Referenced dataset \"{}\" not added yet",
                            dataset_ref
                        )));
                    }
                    dataset_id = Some(dataset_ref.to_string());
                }
                Some(id) => {
                    if dataset_ref != id {
                        return Err(FacadeError::invalid_query(
                            "Cannot query more than one dataset",
                        ));
                    }
                }
            }
        }

        // Callers only pass non-empty key lists
        let dataset_id = dataset_id
            .unwrap_or_else(|| unreachable!("key list validated for {} was empty", context));

        let kind = self.kind_of(&dataset_id);
        for field_ref in field_refs {
            if !kind.is_field(field_ref) {
                return Err(FacadeError::invalid_query(format!(
                    "Invalid field reference {} in {}",
                    field_ref, context
                )));
            }
        }

        Ok(dataset_id)
    }

    /// Syntactic shape check only: the key must be a string matching
    /// `<nonUnderscore>_<nonUnderscore>`. Returns the key on success.
    pub fn validate_key_string<'v>(&self, key: &'v Value, context: &str) -> FacadeResult<&'v str> {
        let key = key.as_str().ok_or_else(|| {
            FacadeError::invalid_query(format!("Invalid type of {} key", context))
        })?;
        if key.is_empty() {
            return Err(FacadeError::invalid_query(format!(
                "Invalid key in {}",
                context
            )));
        }
        if key.starts_with('_') {
            return Err(FacadeError::invalid_query(
                "Referenced dataset cannot be empty string",
            ));
        }
        if !is_well_formed_key(key) {
            return Err(FacadeError::invalid_query(format!(
                "Invalid key {} in {}",
                key, context
            )));
        }
        Ok(key)
    }

    /// Kind of a dataset id this validator already resolved.
    ///
    /// Only callable for resolved ids; an unknown id here is a defect.
    pub fn kind_of(&self, dataset_id: &str) -> DatasetKind {
        match self.id_to_kind.get(dataset_id) {
            Some(kind) => *kind,
            None => unreachable!("kind requested for unresolved dataset {}", dataset_id),
        }
    }
}

/// Whether a key is `<nonUnderscore>_<nonUnderscore>`: exactly one underscore
/// with non-empty text on both sides
pub fn is_well_formed_key(key: &str) -> bool {
    match key.split_once('_') {
        Some((dataset_ref, field_ref)) => {
            !dataset_ref.is_empty() && !field_ref.is_empty() && !field_ref.contains('_')
        }
        None => false,
    }
}

/// Split a well-formed key into (dataset ref, field ref)
pub fn split_key(key: &str) -> (&str, &str) {
    match key.split_once('_') {
        Some(parts) => parts,
        None => unreachable!("split of malformed key {}", key),
    }
}
