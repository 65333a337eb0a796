//! Campus room records

use serde::{Deserialize, Serialize};

use super::fields::{FieldAccess, FieldValue};

/// String-typed fields of a room
pub const ROOM_STRING_FIELDS: &[&str] = &[
    "fullname",
    "shortname",
    "number",
    "name",
    "address",
    "type",
    "furniture",
    "href",
];

/// Numeric fields of a room
pub const ROOM_NUMERIC_FIELDS: &[&str] = &["lat", "lon", "seats"];

/// One room record
///
/// `type` is a reserved word in Rust; the struct member is `room_type` but it
/// serializes and is queried as `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub fullname: String,
    pub shortname: String,
    pub number: String,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub furniture: String,
    pub href: String,
    pub lat: f64,
    pub lon: f64,
    pub seats: f64,
}

impl FieldAccess for Room {
    const FIELD_NAMES: &'static [&'static str] = &[
        "fullname",
        "shortname",
        "number",
        "name",
        "address",
        "type",
        "furniture",
        "href",
        "lat",
        "lon",
        "seats",
    ];

    fn get(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "fullname" => Some(FieldValue::Str(&self.fullname)),
            "shortname" => Some(FieldValue::Str(&self.shortname)),
            "number" => Some(FieldValue::Str(&self.number)),
            "name" => Some(FieldValue::Str(&self.name)),
            "address" => Some(FieldValue::Str(&self.address)),
            "type" => Some(FieldValue::Str(&self.room_type)),
            "furniture" => Some(FieldValue::Str(&self.furniture)),
            "href" => Some(FieldValue::Str(&self.href)),
            "lat" => Some(FieldValue::Num(self.lat)),
            "lon" => Some(FieldValue::Num(self.lon)),
            "seats" => Some(FieldValue::Num(self.seats)),
            _ => None,
        }
    }
}
