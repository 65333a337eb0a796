//! Dataset ingestion collaborators
//!
//! The facade delegates raw dataset content to a parser per kind. Parsers
//! are trait objects so the archive-decoding frontends stay outside the
//! core; the shipped implementations decode a JSON array of raw records.

mod errors;
mod geo;
mod rooms;
mod sections;

pub use errors::{ParseError, ParseResult};
pub use geo::{GeoLookup, GeoResponse, StaticGeoLookup};
pub use rooms::JsonRoomParser;
pub use sections::JsonSectionParser;

use crate::model::{Room, Section};

/// Turns raw content into section records
pub trait SectionParser: Send + Sync {
    /// Parse the content. Fails if the content is not decodable or yields
    /// zero valid records.
    fn parse(&self, content: &str) -> ParseResult<Vec<Section>>;
}

/// Turns raw content into room records
pub trait RoomParser: Send + Sync {
    /// Parse the content. Fails if the content is not decodable or yields
    /// zero valid records. A building whose geolocation cannot be resolved
    /// is omitted from the result, not an error.
    fn parse(&self, content: &str) -> ParseResult<Vec<Room>>;
}
