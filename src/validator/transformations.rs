//! TRANSFORMATIONS validation
//!
//! GROUP fixes the query's dataset id; APPLY rules name aggregate output
//! columns. The returned legal-column set (GROUP ∪ APPLY names) is what
//! COLUMNS must draw from once grouping is in effect.

use serde_json::Value;

use crate::error::{FacadeError, FacadeResult};
use crate::query::{ApplyRule, ApplyToken, Transformations};

use super::keys::{split_key, KeyValidator};

/// Validates the TRANSFORMATIONS clause
pub struct TransformationsValidator<'a> {
    keys: &'a KeyValidator<'a>,
}

impl<'a> TransformationsValidator<'a> {
    pub fn new(keys: &'a KeyValidator<'a>) -> Self {
        Self { keys }
    }

    /// Validate the clause. Returns the dataset id GROUP resolved, the typed
    /// transformations, and the set of column names legal after grouping.
    pub fn validate(
        &self,
        node: &Value,
    ) -> FacadeResult<(String, Transformations, Vec<String>)> {
        let object = node
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query("TRANSFORMATIONS must be object"))?;

        let group_node = object
            .get("GROUP")
            .ok_or_else(|| FacadeError::invalid_query("TRANSFORMATIONS missing GROUP"))?;
        let apply_node = object
            .get("APPLY")
            .ok_or_else(|| FacadeError::invalid_query("TRANSFORMATIONS missing APPLY"))?;
        if object.len() > 2 {
            return Err(FacadeError::invalid_query("Excess keys in TRANSFORMATIONS"));
        }

        let (dataset_id, group) = self.validate_group(group_node)?;
        let apply = self.validate_apply(apply_node, &dataset_id)?;

        let mut legal_columns = group.clone();
        legal_columns.extend(apply.iter().map(|rule| rule.name.clone()));

        Ok((dataset_id, Transformations { group, apply }, legal_columns))
    }

    fn validate_group(&self, node: &Value) -> FacadeResult<(String, Vec<String>)> {
        let list = node.as_array().filter(|list| !list.is_empty()).ok_or_else(|| {
            FacadeError::invalid_query("GROUP must be a non-empty array")
        })?;

        let dataset_id = self
            .keys
            .validate_keys_and_extract_dataset_id(list, "GROUP")?;
        let group = list
            .iter()
            .map(|key| match key.as_str() {
                Some(key) => key.to_string(),
                None => unreachable!("validated GROUP key was not a string"),
            })
            .collect();
        Ok((dataset_id, group))
    }

    fn validate_apply(&self, node: &Value, dataset_id: &str) -> FacadeResult<Vec<ApplyRule>> {
        let rules = node
            .as_array()
            .ok_or_else(|| FacadeError::invalid_query("APPLY must be an array"))?;

        let mut apply: Vec<ApplyRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            let rule = self.validate_apply_rule(rule, dataset_id)?;
            if apply.iter().any(|existing| existing.name == rule.name) {
                return Err(FacadeError::invalid_query(format!(
                    "Duplicate apply key {}",
                    rule.name
                )));
            }
            apply.push(rule);
        }
        Ok(apply)
    }

    fn validate_apply_rule(&self, node: &Value, dataset_id: &str) -> FacadeResult<ApplyRule> {
        let rule = node
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query("Apply rule must be object"))?;
        if rule.len() != 1 {
            return Err(FacadeError::invalid_query(format!(
                "Apply rule should only have 1 key, has {}",
                rule.len()
            )));
        }

        let (apply_key, body) = rule
            .iter()
            .next()
            .unwrap_or_else(|| unreachable!("single-key object had no entries"));
        if apply_key.is_empty() {
            return Err(FacadeError::invalid_query("Apply key cannot be empty string"));
        }
        if apply_key.contains('_') {
            return Err(FacadeError::invalid_query(
                "Cannot have underscore in applyKey",
            ));
        }

        let body = body
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query("Apply body must be object"))?;
        if body.len() != 1 {
            return Err(FacadeError::invalid_query(format!(
                "Apply body should only have 1 key, has {}",
                body.len()
            )));
        }

        let (token, target) = body
            .iter()
            .next()
            .unwrap_or_else(|| unreachable!("single-key object had no entries"));
        let token = ApplyToken::parse(token)
            .ok_or_else(|| FacadeError::invalid_query("Invalid transformation operator"))?;

        let target = self.keys.validate_key_string(target, token.as_str())?;
        let (dataset_ref, field_ref) = split_key(target);
        if dataset_ref != dataset_id {
            return Err(FacadeError::invalid_query(
                "Cannot query more than one dataset",
            ));
        }
        let kind = self.keys.kind_of(dataset_ref);
        if !kind.is_field(field_ref) {
            return Err(FacadeError::invalid_query(format!(
                "Invalid key {} in {}",
                target,
                token.as_str()
            )));
        }
        if token != ApplyToken::Count && !kind.is_numeric_field(field_ref) {
            return Err(FacadeError::invalid_query(format!(
                "Invalid key type in {}",
                token.as_str()
            )));
        }

        Ok(ApplyRule {
            name: apply_key.clone(),
            token,
            key: target.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatasetKind;
    use serde_json::json;
    use std::collections::HashMap;

    fn held() -> HashMap<String, DatasetKind> {
        let mut map = HashMap::new();
        map.insert("rooms".to_string(), DatasetKind::Rooms);
        map
    }

    #[test]
    fn test_group_and_apply_parse() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let node = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"maxSeats": {"MAX": "rooms_seats"}}]
        });
        let (id, transformations, legal) =
            TransformationsValidator::new(&keys).validate(&node).unwrap();
        assert_eq!(id, "rooms");
        assert_eq!(transformations.group, vec!["rooms_shortname"]);
        assert_eq!(transformations.apply.len(), 1);
        assert_eq!(transformations.apply[0].token, ApplyToken::Max);
        assert_eq!(legal, vec!["rooms_shortname", "maxSeats"]);
    }

    #[test]
    fn test_empty_apply_is_legal() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let node = json!({"GROUP": ["rooms_shortname"], "APPLY": []});
        let (_, transformations, legal) =
            TransformationsValidator::new(&keys).validate(&node).unwrap();
        assert!(transformations.apply.is_empty());
        assert_eq!(legal, vec!["rooms_shortname"]);
    }

    #[test]
    fn test_missing_group_or_apply() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let validator = TransformationsValidator::new(&keys);
        assert!(validator.validate(&json!({"APPLY": []})).is_err());
        assert!(validator
            .validate(&json!({"GROUP": ["rooms_shortname"]}))
            .is_err());
    }

    #[test]
    fn test_empty_group_rejected() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let node = json!({"GROUP": [], "APPLY": []});
        assert!(TransformationsValidator::new(&keys).validate(&node).is_err());
    }

    #[test]
    fn test_apply_key_shape() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let validator = TransformationsValidator::new(&keys);
        let underscored = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"max_seats": {"MAX": "rooms_seats"}}]
        });
        assert!(validator.validate(&underscored).is_err());
        let empty = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"": {"MAX": "rooms_seats"}}]
        });
        assert!(validator.validate(&empty).is_err());
    }

    #[test]
    fn test_non_count_tokens_need_numeric_field() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let validator = TransformationsValidator::new(&keys);
        let avg_on_string = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"x": {"AVG": "rooms_furniture"}}]
        });
        assert!(validator.validate(&avg_on_string).is_err());
        let count_on_string = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"x": {"COUNT": "rooms_furniture"}}]
        });
        assert!(validator.validate(&count_on_string).is_ok());
    }

    #[test]
    fn test_unknown_token_rejected() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let node = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"x": {"MEDIAN": "rooms_seats"}}]
        });
        assert!(TransformationsValidator::new(&keys).validate(&node).is_err());
    }

    #[test]
    fn test_duplicate_apply_keys_rejected() {
        let held = held();
        let keys = KeyValidator::new(&held);
        let node = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [
                {"x": {"MAX": "rooms_seats"}},
                {"x": {"MIN": "rooms_seats"}}
            ]
        });
        let err = TransformationsValidator::new(&keys)
            .validate(&node)
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate apply key"));
    }

    #[test]
    fn test_apply_must_stay_on_group_dataset() {
        let mut held = held();
        held.insert("sections".to_string(), DatasetKind::Sections);
        let keys = KeyValidator::new(&held);
        let node = json!({
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"x": {"MAX": "sections_avg"}}]
        });
        let err = TransformationsValidator::new(&keys)
            .validate(&node)
            .unwrap_err();
        assert!(err.to_string().contains("more than one dataset"));
    }
}
