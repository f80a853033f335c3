//! Reverse Geocoding Address Resolver
//!
//! Queries the Google Geocoding API for `route`/`street_address` matches and
//! reduces the ambiguous result list to a single Spanish display line.

mod address;
mod client;
mod error;
mod types;

pub use address::{format_address, pick_best, sanitize_line};
pub use client::{
    AddressResolver, GeocodeTransport, GoogleGeocoder, ADDRESS_LOOKUP_FAILED, ADDRESS_NOT_FOUND,
    ADDRESS_UNAVAILABLE,
};
pub use error::{GeocodingError, Result};
pub use types::{AddressComponent, GeocodeResponse, GeocodeResult, Geometry, LocationType};
