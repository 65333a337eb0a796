//! Room record ingestion
//!
//! Decodes a JSON array of raw room records. Each record names its building
//! (fullname, shortname, address) and its own number, type, furniture, seats
//! and href; the room name is always `<shortname>_<number>`. Records without
//! explicit coordinates are resolved through the geolocation seam, one
//! lookup per distinct address; every room of a building whose lookup fails
//! is omitted, not fatal.

use std::collections::HashMap;

use serde::Deserialize;

use crate::model::Room;

use super::errors::{ParseError, ParseResult};
use super::geo::{GeoLookup, GeoResponse};
use super::RoomParser;

#[derive(Debug, Deserialize)]
struct RawRoom {
    fullname: String,
    shortname: String,
    number: String,
    address: String,
    #[serde(rename = "type", default)]
    room_type: String,
    #[serde(default)]
    furniture: String,
    #[serde(default)]
    href: String,
    seats: f64,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Parses a JSON array of raw room records, resolving coordinates through a
/// [`GeoLookup`]
pub struct JsonRoomParser<G: GeoLookup> {
    geo: G,
}

impl<G: GeoLookup> JsonRoomParser<G> {
    pub fn new(geo: G) -> Self {
        Self { geo }
    }
}

impl<G: GeoLookup> RoomParser for JsonRoomParser<G> {
    fn parse(&self, content: &str) -> ParseResult<Vec<Room>> {
        let records: Vec<RawRoom> = serde_json::from_str(content)
            .map_err(|e| ParseError::Undecodable(e.to_string()))?;

        // One lookup per distinct address
        let mut resolved: HashMap<String, Option<(f64, f64)>> = HashMap::new();
        let mut rooms = Vec::with_capacity(records.len());
        for record in records {
            let coordinates = match (record.lat, record.lon) {
                (Some(lat), Some(lon)) => Some((lat, lon)),
                _ => *resolved
                    .entry(record.address.clone())
                    .or_insert_with(|| match self.geo.lookup(&record.address) {
                        GeoResponse::Location { lat, lon } => Some((lat, lon)),
                        GeoResponse::Error(_) => None,
                    }),
            };
            let Some((lat, lon)) = coordinates else {
                continue; // building omitted
            };

            let name = format!("{}_{}", record.shortname, record.number);
            rooms.push(Room {
                fullname: record.fullname,
                shortname: record.shortname,
                number: record.number,
                name,
                address: record.address,
                room_type: record.room_type,
                furniture: record.furniture,
                href: record.href,
                lat,
                lon,
                seats: record.seats,
            });
        }

        if rooms.is_empty() {
            return Err(ParseError::NoValidRecords);
        }
        Ok(rooms)
    }
}
