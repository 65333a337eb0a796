//! Building geolocation lookup
//!
//! Room ingestion resolves each building address to coordinates through this
//! seam. A lookup answers with either a location or an error string; the
//! caller decides what an error means (room ingestion omits the building).

use std::collections::HashMap;

/// Outcome of one address lookup
#[derive(Debug, Clone, PartialEq)]
pub enum GeoResponse {
    /// Resolved coordinates
    Location { lat: f64, lon: f64 },
    /// Lookup failed for this address
    Error(String),
}

/// Resolves building addresses to coordinates
pub trait GeoLookup: Send + Sync {
    fn lookup(&self, address: &str) -> GeoResponse;
}

/// Table-backed lookup
///
/// Useful as a fixture and for embedders that already know their campus.
/// Unknown addresses answer with an error.
#[derive(Debug, Clone, Default)]
pub struct StaticGeoLookup {
    table: HashMap<String, (f64, f64)>,
}

impl StaticGeoLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register coordinates for an address
    pub fn with(mut self, address: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.table.insert(address.into(), (lat, lon));
        self
    }
}

impl GeoLookup for StaticGeoLookup {
    fn lookup(&self, address: &str) -> GeoResponse {
        match self.table.get(address) {
            Some(&(lat, lon)) => GeoResponse::Location { lat, lon },
            None => GeoResponse::Error(format!("no location known for {}", address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        let lookup = StaticGeoLookup::new().with("6245 Agronomy Road", 49.26, -123.25);
        assert_eq!(
            lookup.lookup("6245 Agronomy Road"),
            GeoResponse::Location {
                lat: 49.26,
                lon: -123.25
            }
        );
        assert!(matches!(
            lookup.lookup("elsewhere"),
            GeoResponse::Error(_)
        ));
    }
}
