//! Annotation editing and pointer handling
//!
//! This module provides:
//! - The shared edit controller (anchor hover, drag and hit testing)
//! - Pointer handlers that drive drawing sessions and edits

pub mod edit;
pub mod handlers;

pub use edit::{AnchorHit, EditController, EditStep, EditTarget};
