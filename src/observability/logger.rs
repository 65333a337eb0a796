//! Structured JSON logger
//!
//! One log line = one event. Output is deterministic: the event and severity
//! lead, remaining fields are ordered alphabetically. Writes are synchronous
//! and unbuffered.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Recoverable issues
    Warn,
    /// Operation failures
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic structured logger
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        let _ = handle.write_all(line.as_bytes());
        let _ = handle.flush();
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Render one log line; key order is deterministic
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":\"");
        Self::escape(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        for (key, value) in sorted {
            line.push_str(",\"");
            Self::escape(&mut line, key);
            line.push_str("\":\"");
            Self::escape(&mut line, value);
            line.push('"');
        }

        line.push_str("}\n");
        line
    }

    fn escape(line: &mut String, text: &str) {
        for c in text.chars() {
            match c {
                '"' => line.push_str("\\\""),
                '\\' => line.push_str("\\\\"),
                '\n' => line.push_str("\\n"),
                '\r' => line.push_str("\\r"),
                '\t' => line.push_str("\\t"),
                c if c.is_control() => {
                    line.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => line.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_render_alphabetically() {
        let line = Logger::render(
            Severity::Info,
            "DATASET_ADDED",
            &[("rows", "12"), ("id", "sections")],
        );
        assert_eq!(
            line,
            "{\"event\":\"DATASET_ADDED\",\"severity\":\"INFO\",\"id\":\"sections\",\"rows\":\"12\"}\n"
        );
    }

    #[test]
    fn test_escaping() {
        let line = Logger::render(Severity::Error, "E", &[("msg", "a\"b\\c\nd")]);
        assert!(line.contains("a\\\"b\\\\c\\nd"));
    }

    #[test]
    fn test_rendered_line_is_valid_json() {
        let line = Logger::render(Severity::Warn, "X", &[("k", "v")]);
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["severity"], "WARN");
    }
}
