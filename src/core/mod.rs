//! Core overlay module
//!
//! This module contains:
//! - The embeddable overlay tying viewer, surface, sessions and edits together

pub mod overlay;

pub use overlay::Overlay;
