//! Geocoder tools module.
//!
//! Tools backed by the upstream geocoding / routing service:
//! - `geocode`: address to GeoJSON
//! - `reverse_geocode`: coordinates to address
//! - `shortest_path`: Dijkstra route between two coordinates
//!
//! All three share one [`GeocoderClient`] and differ only in URL shape.

pub mod client;
pub mod common;
pub mod geocode;
pub mod reverse_geocode;
pub mod shortest_path;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{GeocoderClient, RouteQuery};
pub use geocode::{GeocodeParams, GeocodeTool};
pub use reverse_geocode::{ReverseGeocodeParams, ReverseGeocodeTool};
pub use shortest_path::{ShortestPathParams, ShortestPathTool};
