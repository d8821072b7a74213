//! Persisted shape records
//!
//! A record is plain data: `{ "type", "plane", "sliceIndex", "points" }`.
//! Rectangles serialize as two points (start, end).

use serde::{Deserialize, Serialize};

use super::annotation::{Annotation, PolygonShape, RectangleShape, Shape, ShapeId};
use super::geometry::{Plane, Point};

pub const RECTANGLE_TYPE: &str = "rectangle";
pub const POLYGON_TYPE: &str = "polygon";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub plane: Plane,
    #[serde(rename = "sliceIndex")]
    pub slice_index: usize,
    pub points: Vec<Point>,
}

impl ShapeRecord {
    /// Rebuild the shape geometry, or None if the record type is unknown or
    /// its points cannot form a valid shape
    pub fn to_shape(&self) -> Option<Shape> {
        let shape = match self.kind.as_str() {
            RECTANGLE_TYPE => match self.points.as_slice() {
                [start, end] => Shape::Rectangle(RectangleShape {
                    start: Some(*start),
                    end: Some(*end),
                }),
                _ => return None,
            },
            POLYGON_TYPE => Shape::Polygon(PolygonShape {
                points: self.points.clone(),
            }),
            _ => return None,
        };
        shape.is_valid().then_some(shape)
    }

    /// Attach an identity to the record's geometry
    pub fn to_annotation(&self, id: ShapeId) -> Option<Annotation> {
        Some(Annotation {
            id,
            plane: self.plane,
            slice: self.slice_index,
            shape: self.to_shape()?,
        })
    }
}

impl Annotation {
    /// Plain-data record for this annotation, None if it is not finalized
    pub fn to_record(&self) -> Option<ShapeRecord> {
        if !self.shape.is_valid() {
            return None;
        }
        let kind = match self.shape {
            Shape::Rectangle(_) => RECTANGLE_TYPE,
            Shape::Polygon(_) => POLYGON_TYPE,
        };
        Some(ShapeRecord {
            kind: kind.to_string(),
            plane: self.plane,
            slice_index: self.slice,
            points: self.shape.anchors(),
        })
    }
}
