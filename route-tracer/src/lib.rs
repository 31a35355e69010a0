//! Route tracer server.
//!
//! Turns an ordered list of place names into coordinates and plays a
//! choreographed, pausable camera-and-marker animation along the route.

pub mod animation;
pub mod autocomplete;
pub mod cache;
pub mod domain;
pub mod estimate;
pub mod geocode;
pub mod geolocate;
pub mod itinerary;
pub mod web;
