//! Pure domain types with minimal dependencies
//!
//! This module contains the geometry and shape types used throughout the
//! overlay. Types here should not depend on a viewer or a drawing surface.

pub mod annotation;
pub mod geometry;
pub mod record;

pub use annotation::*;
pub use geometry::*;
pub use record::*;
