//! Datasets and their kind tag

use serde::{Deserialize, Serialize};

use super::room::{Room, ROOM_NUMERIC_FIELDS, ROOM_STRING_FIELDS};
use super::section::{Section, SECTION_NUMERIC_FIELDS, SECTION_STRING_FIELDS};

/// The two supported dataset kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Sections,
    Rooms,
}

impl DatasetKind {
    /// String-typed field names of this kind
    pub fn string_fields(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Sections => SECTION_STRING_FIELDS,
            DatasetKind::Rooms => ROOM_STRING_FIELDS,
        }
    }

    /// Numeric field names of this kind
    pub fn numeric_fields(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Sections => SECTION_NUMERIC_FIELDS,
            DatasetKind::Rooms => ROOM_NUMERIC_FIELDS,
        }
    }

    /// Whether `field` is a string-typed field of this kind
    pub fn is_string_field(&self, field: &str) -> bool {
        self.string_fields().contains(&field)
    }

    /// Whether `field` is a numeric field of this kind
    pub fn is_numeric_field(&self, field: &str) -> bool {
        self.numeric_fields().contains(&field)
    }

    /// Whether `field` is any field of this kind
    pub fn is_field(&self, field: &str) -> bool {
        self.is_string_field(field) || self.is_numeric_field(field)
    }

    /// Kind name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Sections => "sections",
            DatasetKind::Rooms => "rooms",
        }
    }
}

/// Row storage for one dataset, tagged by kind
///
/// Rows keep ingestion order and are never reordered in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    Sections(Vec<Section>),
    Rooms(Vec<Room>),
}

impl Rows {
    /// Number of rows held
    pub fn len(&self) -> usize {
        match self {
            Rows::Sections(rows) => rows.len(),
            Rows::Rooms(rows) => rows.len(),
        }
    }

    /// Whether the dataset holds no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, typed collection of records
///
/// Immutable between add and remove; the engine borrows a read-only view for
/// the duration of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub rows: Rows,
}

impl Dataset {
    pub fn new(kind: DatasetKind, rows: Rows) -> Self {
        Self { kind, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Listing entry for one held dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub kind: DatasetKind,
    pub num_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&DatasetKind::Sections).unwrap(),
            "\"sections\""
        );
        assert_eq!(
            serde_json::to_string(&DatasetKind::Rooms).unwrap(),
            "\"rooms\""
        );
    }

    #[test]
    fn test_field_kind_lookup() {
        assert!(DatasetKind::Sections.is_string_field("dept"));
        assert!(DatasetKind::Sections.is_numeric_field("avg"));
        assert!(!DatasetKind::Sections.is_field("seats"));

        assert!(DatasetKind::Rooms.is_string_field("type"));
        assert!(DatasetKind::Rooms.is_numeric_field("lat"));
        assert!(!DatasetKind::Rooms.is_field("dept"));
    }

    #[test]
    fn test_rows_round_trip_by_shape() {
        let rows = Rows::Sections(vec![Section {
            dept: "cpsc".into(),
            id: "110".into(),
            instructor: "".into(),
            title: "computation".into(),
            uuid: "9".into(),
            avg: 70.0,
            pass: 100.0,
            fail: 10.0,
            audit: 0.0,
            year: 2019.0,
        }]);
        let json = serde_json::to_string(&rows).unwrap();
        let back: Rows = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rows);
        assert_eq!(back.len(), 1);
    }
}
