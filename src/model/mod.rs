//! Record model
//!
//! The two closed record schemas a dataset's rows conform to, the kind tag
//! that selects between them, and the field capability trait the query engine
//! is generic over.

mod dataset;
mod fields;
mod room;
mod section;

pub use dataset::{Dataset, DatasetKind, DatasetSummary, Rows};
pub use fields::{FieldAccess, FieldValue};
pub use room::{Room, ROOM_NUMERIC_FIELDS, ROOM_STRING_FIELDS};
pub use section::{Section, SECTION_NUMERIC_FIELDS, SECTION_STRING_FIELDS};
