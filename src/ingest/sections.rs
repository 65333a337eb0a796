//! Section record ingestion
//!
//! Decodes a JSON array of raw course records as they appear in the source
//! archives: capitalized field names, string-or-number leniency on the
//! string fields, digit-string leniency on the numeric fields. A record
//! missing a field or carrying an unconvertible value is skipped, not fatal;
//! a content body yielding zero records is rejected.

use serde_json::Value;

use crate::model::Section;

use super::errors::{ParseError, ParseResult};
use super::SectionParser;

/// Parses a JSON array of raw course records
#[derive(Debug, Clone, Default)]
pub struct JsonSectionParser;

impl JsonSectionParser {
    pub fn new() -> Self {
        Self
    }

    fn convert(record: &Value) -> Option<Section> {
        let record = record.as_object()?;

        let dept = string_prop(record.get("Subject")?)?;
        let id = string_prop(record.get("Course")?)?;
        let instructor = string_prop(record.get("Professor")?)?;
        let title = string_prop(record.get("Title")?)?;
        let uuid = string_prop(record.get("id")?)?;

        let mut year = numeric_prop(record.get("Year")?)?;
        let avg = numeric_prop(record.get("Avg")?)?;
        let pass = numeric_prop(record.get("Pass")?)?;
        let fail = numeric_prop(record.get("Fail")?)?;
        let audit = numeric_prop(record.get("Audit")?)?;

        // Overall sections carry no meaningful year
        if record.get("Section").and_then(Value::as_str) == Some("overall") {
            year = 1900.0;
        }

        Some(Section {
            dept,
            id,
            instructor,
            title,
            uuid,
            avg,
            pass,
            fail,
            audit,
            year,
        })
    }
}

impl SectionParser for JsonSectionParser {
    fn parse(&self, content: &str) -> ParseResult<Vec<Section>> {
        let records: Vec<Value> = serde_json::from_str(content)
            .map_err(|e| ParseError::Undecodable(e.to_string()))?;

        let sections: Vec<Section> = records.iter().filter_map(Self::convert).collect();
        if sections.is_empty() {
            return Err(ParseError::NoValidRecords);
        }
        Ok(sections)
    }
}

/// String fields accept strings and numbers (stringified)
fn string_prop(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric fields accept numbers and all-digit strings
fn numeric_prop(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}
