//! Field capability trait
//!
//! The engine never assumes a concrete record schema; it reads fields through
//! this trait, so sections and rooms share the same execution code without
//! either assuming the other's fields exist.

/// A single field value read from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// String-typed field
    Str(&'a str),
    /// Numeric field
    Num(f64),
}

/// Typed, by-name access to the fields of a record
pub trait FieldAccess {
    /// Every field name of this schema, in stable order
    const FIELD_NAMES: &'static [&'static str];

    /// Read one field by name; `None` only for names outside the schema
    fn get(&self, field: &str) -> Option<FieldValue<'_>>;
}
