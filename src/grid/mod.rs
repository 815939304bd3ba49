//! Grid representation and static geometry.
//!
//! This module provides the unstructured finite-volume [`Grid`] observed by
//! the solver, a validation pass for it, and the one-time geometric
//! preprocessing (half-transmissibilities, transmissibilities, pore volumes)
//! that the two-point flux approximation needs.

mod geometry;
mod topology;
mod types;
mod validate;

pub use geometry::{half_transmissibilities, pore_volumes, transmissibilities, StaticGeometry};
pub use topology::Grid;
pub use types::{Side, Sides};
pub use validate::validate_grid;
