//! Domain types for the route tracer.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod coord;
mod place;
mod speed;

pub use coord::{Bounds, Coordinate, InvalidCoordinate};
pub use place::PlaceList;
pub use speed::{InvalidSpeed, SpeedMultiplier};
