//! Shape annotation overlay for orthogonal-plane volume viewers
//!
//! Draws rectangles and polygons on the axial, coronal and sagittal planes of
//! a multi-planar viewer. Shapes are stored in plane-local volume
//! coordinates, bound to the slice they were drawn on, and can be edited by
//! dragging their anchors.

pub mod annotations;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod session;
pub mod viewer;

pub use crate::config::{OverlayConfig, ShapeColor, ShapeStyle, Tool};
pub use crate::core::Overlay;
pub use crate::domain::{Annotation, Plane, Point, ScreenPoint, Shape, ShapeId, ShapeRecord};
pub use crate::render::{DisplayList, PixmapSurface, Surface};
pub use crate::session::{FinishOutcome, FinishReport, Key, OverlayEvent, PointerMsg};
pub use crate::viewer::{OrthoViewer, Viewer};
