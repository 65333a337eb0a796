//! WHERE clause validation
//!
//! Recursive descent over the raw filter tree. Every concrete filter node has
//! exactly one discriminant key drawn from {AND, OR, LT, GT, EQ, IS, NOT};
//! comparison bodies have exactly one key/value member. A successful pass
//! yields the typed [`Filter`] tree.

use serde_json::{Map, Value};

use crate::error::{FacadeError, FacadeResult};
use crate::model::DatasetKind;
use crate::query::{Filter, MComparison, SComparison};

/// Validates a WHERE tree against the dataset the query references
pub struct FilterValidator<'a> {
    dataset_id: &'a str,
    kind: DatasetKind,
}

impl<'a> FilterValidator<'a> {
    pub fn new(dataset_id: &'a str, kind: DatasetKind) -> Self {
        Self { dataset_id, kind }
    }

    /// Validate one filter node. `label` names the enclosing clause for
    /// error messages ("WHERE", "AND", "OR", "NOT").
    pub fn validate(&self, node: &Value, label: &str) -> FacadeResult<Filter> {
        let object = node
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query(format!("{} must be object", label)))?;

        if object.len() != 1 {
            return Err(FacadeError::invalid_query(format!(
                "{} should only have 1 key, has {}",
                label,
                object.len()
            )));
        }

        let (filter_key, body) = object
            .iter()
            .next()
            .unwrap_or_else(|| unreachable!("single-key object had no entries"));

        match filter_key.as_str() {
            "AND" | "OR" => self.validate_logic(filter_key, body),
            "LT" | "GT" | "EQ" => self.validate_math(filter_key, body),
            "IS" => self.validate_string(body),
            "NOT" => Ok(Filter::Not(Box::new(self.validate(body, "NOT")?))),
            _ => Err(FacadeError::invalid_query(format!(
                "Invalid filter key: {}",
                filter_key
            ))),
        }
    }

    fn validate_logic(&self, logic: &str, body: &Value) -> FacadeResult<Filter> {
        let list = body.as_array().filter(|list| !list.is_empty()).ok_or_else(|| {
            FacadeError::invalid_query(format!("{} must be a non-empty array", logic))
        })?;

        let mut filters = Vec::with_capacity(list.len());
        for node in list {
            filters.push(self.validate(node, logic)?);
        }

        Ok(match logic {
            "AND" => Filter::And(filters),
            _ => Filter::Or(filters),
        })
    }

    fn validate_math(&self, comparator: &str, body: &Value) -> FacadeResult<Filter> {
        let (key, value) = self.single_entry(comparator, body)?;

        let field_ref = self.check_comparison_key(key, comparator, true)?;

        let value = value.as_f64().ok_or_else(|| {
            FacadeError::invalid_query(format!(
                "Invalid value type in {}, should be number",
                comparator
            ))
        })?;

        let comparison = MComparison {
            field: field_ref.to_string(),
            value,
        };
        Ok(match comparator {
            "LT" => Filter::LessThan(comparison),
            "GT" => Filter::GreaterThan(comparison),
            _ => Filter::Equal(comparison),
        })
    }

    fn validate_string(&self, body: &Value) -> FacadeResult<Filter> {
        let (key, value) = self.single_entry("IS", body)?;

        let field_ref = self.check_comparison_key(key, "IS", false)?;

        let pattern = value.as_str().ok_or_else(|| {
            FacadeError::invalid_query("Invalid value type in IS, should be string")
        })?;

        // An asterisk may only be the first and/or last character
        let chars: Vec<char> = pattern.chars().collect();
        if chars.len() >= 3 && chars[1..chars.len() - 1].contains(&'*') {
            return Err(FacadeError::invalid_query(
                "Asterisks (*) can only be the first or last characters of input strings",
            ));
        }

        Ok(Filter::Is(SComparison {
            field: field_ref.to_string(),
            pattern: pattern.to_string(),
        }))
    }

    /// A comparison body must be an object with exactly one member
    fn single_entry<'v>(
        &self,
        comparator: &str,
        body: &'v Value,
    ) -> FacadeResult<(&'v String, &'v Value)> {
        let object: &Map<String, Value> = body
            .as_object()
            .ok_or_else(|| FacadeError::invalid_query(format!("{} must be object", comparator)))?;
        if object.len() != 1 {
            return Err(FacadeError::invalid_query(format!(
                "{} should only have 1 key, has {}",
                comparator,
                object.len()
            )));
        }
        Ok(object
            .iter()
            .next()
            .unwrap_or_else(|| unreachable!("single-key object had no entries")))
    }

    /// Check the comparison key: well-shaped, a field of the right typing,
    /// and scoped to the query's dataset. Returns the field reference.
    fn check_comparison_key<'k>(
        &self,
        key: &'k str,
        comparator: &str,
        numeric: bool,
    ) -> FacadeResult<&'k str> {
        let (dataset_ref, field_ref) = match key.split_once('_') {
            Some(parts) => parts,
            None => {
                return Err(FacadeError::invalid_query(format!(
                    "Invalid key {} in {}",
                    key, comparator
                )))
            }
        };
        if !self.kind.is_field(field_ref) {
            return Err(FacadeError::invalid_query(format!(
                "Invalid key {} in {}",
                key, comparator
            )));
        }
        let typed_ok = if numeric {
            self.kind.is_numeric_field(field_ref)
        } else {
            self.kind.is_string_field(field_ref)
        };
        if !typed_ok {
            return Err(FacadeError::invalid_query(format!(
                "Invalid key type in {}",
                comparator
            )));
        }
        if dataset_ref != self.dataset_id {
            return Err(FacadeError::invalid_query(
                "Cannot query more than one dataset",
            ));
        }
        Ok(field_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> FilterValidator<'static> {
        FilterValidator::new("sections", DatasetKind::Sections)
    }

    #[test]
    fn test_math_comparison_parses() {
        let filter = validator()
            .validate(&json!({"GT": {"sections_avg": 90}}), "WHERE")
            .unwrap();
        assert_eq!(
            filter,
            Filter::GreaterThan(MComparison {
                field: "avg".into(),
                value: 90.0
            })
        );
    }

    #[test]
    fn test_rejects_multiple_discriminants() {
        let node = json!({"GT": {"sections_avg": 90}, "LT": {"sections_avg": 99}});
        let err = validator().validate(&node, "WHERE").unwrap_err();
        assert!(err.to_string().contains("1 key"));
    }

    #[test]
    fn test_rejects_unknown_discriminant() {
        let err = validator()
            .validate(&json!({"XOR": []}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid filter key"));
    }

    #[test]
    fn test_rejects_empty_logic_list() {
        assert!(validator().validate(&json!({"AND": []}), "WHERE").is_err());
        assert!(validator().validate(&json!({"OR": {}}), "WHERE").is_err());
    }

    #[test]
    fn test_logic_recurses() {
        let node = json!({"AND": [
            {"GT": {"sections_avg": 80}},
            {"IS": {"sections_dept": "cpsc"}}
        ]});
        let filter = validator().validate(&node, "WHERE").unwrap();
        match filter {
            Filter::And(children) => assert_eq!(children.len(), 2),
            other => panic!("expected AND, got {:?}", other),
        }
    }

    #[test]
    fn test_math_requires_numeric_field() {
        let err = validator()
            .validate(&json!({"LT": {"sections_dept": 50}}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid key type in LT"));
    }

    #[test]
    fn test_is_requires_string_field() {
        let err = validator()
            .validate(&json!({"IS": {"sections_avg": "90"}}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid key type in IS"));
    }

    #[test]
    fn test_math_requires_number_literal() {
        let err = validator()
            .validate(&json!({"EQ": {"sections_avg": "90"}}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("should be number"));
    }

    #[test]
    fn test_is_requires_string_literal() {
        let err = validator()
            .validate(&json!({"IS": {"sections_dept": 42}}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("should be string"));
    }

    #[test]
    fn test_cross_dataset_reference_rejected() {
        let err = validator()
            .validate(&json!({"GT": {"other_avg": 90}}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("more than one dataset"));
    }

    #[test]
    fn test_interior_asterisk_rejected() {
        let err = validator()
            .validate(&json!({"IS": {"sections_dept": "cp*c"}}), "WHERE")
            .unwrap_err();
        assert!(err.to_string().contains("Asterisks"));
    }

    #[test]
    fn test_edge_asterisks_accepted() {
        for pattern in ["*", "**", "cp*", "*sc", "*ps*"] {
            assert!(
                validator()
                    .validate(&json!({"IS": {"sections_dept": pattern}}), "WHERE")
                    .is_ok(),
                "pattern {} should validate",
                pattern
            );
        }
    }

    #[test]
    fn test_negation_wraps_inner_filter() {
        let filter = validator()
            .validate(&json!({"NOT": {"EQ": {"sections_avg": 60}}}), "WHERE")
            .unwrap();
        assert!(matches!(filter, Filter::Not(_)));
    }
}
