//! Geometric types for planes, plane-local points and screen positions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three orthogonal cross-sections through a volume
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    Axial,
    Sagittal,
    Coronal,
}

impl Plane {
    /// All planes in collection order
    pub const ALL: [Plane; 3] = [Plane::Axial, Plane::Coronal, Plane::Sagittal];

    /// Stable lowercase name, also used in persisted records
    pub fn name(self) -> &'static str {
        match self {
            Plane::Axial => "axial",
            Plane::Sagittal => "sagittal",
            Plane::Coronal => "coronal",
        }
    }

    /// Build a volumetric point from a plane-local point.
    ///
    /// The plane-local axes map onto the volume as axial `(x, y)`,
    /// coronal `(x, z)` and sagittal `(y, z)`; `depth` fills the remaining axis.
    pub fn lift(self, point: Point, depth: f32) -> VolumePoint {
        match self {
            Plane::Axial => VolumePoint::new(point.x, point.y, depth),
            Plane::Coronal => VolumePoint::new(point.x, depth, point.y),
            Plane::Sagittal => VolumePoint::new(depth, point.x, point.y),
        }
    }

    /// Drop the depth axis of a volumetric point
    pub fn flatten(self, point: VolumePoint) -> Point {
        match self {
            Plane::Axial => Point::new(point.x, point.y),
            Plane::Coronal => Point::new(point.x, point.z),
            Plane::Sagittal => Point::new(point.y, point.z),
        }
    }

    /// Depth coordinate of a volumetric point along this plane's normal
    pub fn depth(self, point: VolumePoint) -> f32 {
        match self {
            Plane::Axial => point.z,
            Plane::Coronal => point.y,
            Plane::Sagittal => point.x,
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Plane {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "axial" => Ok(Plane::Axial),
            "sagittal" => Ok(Plane::Sagittal),
            "coronal" => Ok(Plane::Coronal),
            other => anyhow::bail!("unknown plane '{other}'"),
        }
    }
}

/// Plane-local volumetric coordinate (not screen pixels)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Coordinate in 3D image space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VolumePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl VolumePoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Position on the drawing surface in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in screen space
    pub fn distance_to(self, other: ScreenPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in screen pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding box of two corners, independent of their order
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Check if the rectangle contains a point (right and bottom edges excluded)
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
