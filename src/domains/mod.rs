//! Domains module containing business logic organized by bounded contexts.
//!
//! The geocoder server only has one: the tools that proxy the upstream
//! geocoding and routing service.

pub mod tools;
