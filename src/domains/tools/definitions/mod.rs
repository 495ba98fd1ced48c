//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod geocoder;

pub use geocoder::{
    GeocodeParams, GeocodeTool, GeocoderClient, ReverseGeocodeParams, ReverseGeocodeTool,
    RouteQuery, ShortestPathParams, ShortestPathTool,
};
