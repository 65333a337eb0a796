//! Course section records

use serde::{Deserialize, Serialize};

use super::fields::{FieldAccess, FieldValue};

/// String-typed fields of a section
pub const SECTION_STRING_FIELDS: &[&str] = &["dept", "id", "instructor", "title", "uuid"];

/// Numeric fields of a section
pub const SECTION_NUMERIC_FIELDS: &[&str] = &["avg", "pass", "fail", "audit", "year"];

/// One course section record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub dept: String,
    pub id: String,
    pub instructor: String,
    pub title: String,
    pub uuid: String,
    pub avg: f64,
    pub pass: f64,
    pub fail: f64,
    pub audit: f64,
    pub year: f64,
}

impl FieldAccess for Section {
    const FIELD_NAMES: &'static [&'static str] = &[
        "dept",
        "id",
        "instructor",
        "title",
        "uuid",
        "avg",
        "pass",
        "fail",
        "audit",
        "year",
    ];

    fn get(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "dept" => Some(FieldValue::Str(&self.dept)),
            "id" => Some(FieldValue::Str(&self.id)),
            "instructor" => Some(FieldValue::Str(&self.instructor)),
            "title" => Some(FieldValue::Str(&self.title)),
            "uuid" => Some(FieldValue::Str(&self.uuid)),
            "avg" => Some(FieldValue::Num(self.avg)),
            "pass" => Some(FieldValue::Num(self.pass)),
            "fail" => Some(FieldValue::Num(self.fail)),
            "audit" => Some(FieldValue::Num(self.audit)),
            "year" => Some(FieldValue::Num(self.year)),
            _ => None,
        }
    }
}
