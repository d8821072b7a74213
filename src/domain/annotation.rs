//! Annotation shape types
//!
//! All anchor coordinates are stored as plane-local volumetric points, so they
//! stay valid across pan, zoom and device resolution changes.

use std::fmt;

use super::geometry::{Plane, Point};

/// Identity of a finalized shape within one overlay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Rectangle defined by two opposite corners
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RectangleShape {
    pub start: Option<Point>,
    pub end: Option<Point>,
}

/// Closed polygon through its points in insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonShape {
    pub points: Vec<Point>,
}

impl PolygonShape {
    /// Minimum number of points for a finalized polygon
    pub const MIN_POINTS: usize = 3;
}

/// Geometry of an annotation
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rectangle(RectangleShape),
    Polygon(PolygonShape),
}

impl Shape {
    /// Check if the shape has enough anchors to be finalized
    pub fn is_valid(&self) -> bool {
        match self {
            Shape::Rectangle(rect) => rect.start.is_some() && rect.end.is_some(),
            Shape::Polygon(poly) => poly.points.len() >= PolygonShape::MIN_POINTS,
        }
    }

    /// Editable anchors in index order (rectangle: start, end; polygon: vertices)
    pub fn anchors(&self) -> Vec<Point> {
        match self {
            Shape::Rectangle(rect) => rect.start.into_iter().chain(rect.end).collect(),
            Shape::Polygon(poly) => poly.points.clone(),
        }
    }

    /// Mutable access to one anchor by index
    pub fn anchor_mut(&mut self, index: usize) -> Option<&mut Point> {
        match self {
            Shape::Rectangle(rect) => match index {
                0 => rect.start.as_mut(),
                1 => rect.end.as_mut(),
                _ => None,
            },
            Shape::Polygon(poly) => poly.points.get_mut(index),
        }
    }
}

/// A finalized shape bound to one plane and one slice of that plane
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: ShapeId,
    pub plane: Plane,
    /// Slice displayed on `plane` when the shape was created
    pub slice: usize,
    pub shape: Shape,
}

impl Annotation {
    /// Whether this annotation shows on the given current slice of its plane
    pub fn is_on_slice(&self, current_slice: usize) -> bool {
        self.slice == current_slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_validity() {
        let mut rect = RectangleShape::default();
        assert!(!Shape::Rectangle(rect.clone()).is_valid());
        rect.start = Some(Point::new(1.0, 1.0));
        assert!(!Shape::Rectangle(rect.clone()).is_valid());
        rect.end = Some(Point::new(4.0, 2.0));
        assert!(Shape::Rectangle(rect).is_valid());
    }

    #[test]
    fn test_polygon_validity() {
        let mut poly = PolygonShape::default();
        for i in 0..2 {
            poly.points.push(Point::new(i as f32, 0.0));
        }
        assert!(!Shape::Polygon(poly.clone()).is_valid());
        poly.points.push(Point::new(0.0, 5.0));
        assert!(Shape::Polygon(poly).is_valid());
    }

    #[test]
    fn test_anchor_mut_touches_only_one_anchor() {
        let mut shape = Shape::Polygon(PolygonShape {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ],
        });
        *shape.anchor_mut(1).unwrap() = Point::new(20.0, 5.0);
        assert_eq!(
            shape.anchors(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 5.0),
                Point::new(10.0, 10.0)
            ]
        );
        assert!(shape.anchor_mut(3).is_none());
    }

    #[test]
    fn test_rectangle_anchor_order() {
        let shape = Shape::Rectangle(RectangleShape {
            start: Some(Point::new(5.0, 5.0)),
            end: Some(Point::new(1.0, 1.0)),
        });
        assert_eq!(
            shape.anchors(),
            vec![Point::new(5.0, 5.0), Point::new(1.0, 1.0)]
        );
    }
}
