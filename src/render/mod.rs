//! Annotation rendering module
//!
//! This module contains:
//! - The drawing surface trait with raster and vector implementations
//! - Shape, marker and live preview drawing
//! - The baseline-restoring render pipeline

pub mod pipeline;
pub mod pixmap;
pub mod shapes;
pub mod surface;

pub use pipeline::RenderPipeline;
pub use pixmap::PixmapSurface;
pub use surface::{DisplayList, DrawCommand, StrokeStyle, Surface};
