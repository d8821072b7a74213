//! Shape drawing
//!
//! Every function projects anchors through the viewer at call time. A shape
//! with an anchor that cannot be projected is skipped.

use super::surface::{StrokeStyle, Surface};
use crate::config::{ShapeColor, ShapeStyle};
use crate::domain::{Plane, Point, ScreenPoint, ScreenRect, Shape};
use crate::viewer::{self, Viewer};

/// Draw an anchor marker (small stroked circle)
pub fn render_marker<S: Surface + ?Sized>(
    surface: &mut S,
    center: ScreenPoint,
    style: &ShapeStyle,
    color: ShapeColor,
) {
    surface.stroke_circle(
        center,
        style.marker_radius,
        &StrokeStyle::solid(color, style.line_width),
    );
}

/// Draw a shape's markers and connective geometry on `plane`.
///
/// `highlight` replaces the stroke colors without touching the shape.
pub fn render_shape<S, V>(
    surface: &mut S,
    viewer: &V,
    shape: &Shape,
    plane: Plane,
    style: &ShapeStyle,
    highlight: Option<ShapeColor>,
) where
    S: Surface + ?Sized,
    V: Viewer + ?Sized,
{
    let Some(anchors) = viewer::project_all(viewer, &shape.anchors(), plane) else {
        log::trace!("Skipping shape on {plane}: anchor outside projection");
        return;
    };
    let marker_color = highlight.unwrap_or(style.marker_color);
    for anchor in &anchors {
        render_marker(surface, *anchor, style, marker_color);
    }

    match shape {
        Shape::Rectangle(_) => {
            if let [start, end] = anchors.as_slice() {
                let color = highlight.unwrap_or(style.rectangle_color);
                surface.stroke_rect(
                    ScreenRect::from_corners(*start, *end),
                    &StrokeStyle::solid(color, style.line_width),
                );
            }
        }
        Shape::Polygon(_) => {
            if anchors.len() >= 2 {
                let color = highlight.unwrap_or(style.polygon_color);
                surface.fill_path(&anchors, style.polygon_fill);
                surface.stroke_path(&anchors, true, &StrokeStyle::solid(color, style.line_width));
            }
        }
    }
}

/// Redraw one anchor of a shape in the highlight color
pub fn render_anchor_highlight<S, V>(
    surface: &mut S,
    viewer: &V,
    shape: &Shape,
    plane: Plane,
    anchor: usize,
    style: &ShapeStyle,
) where
    S: Surface + ?Sized,
    V: Viewer + ?Sized,
{
    let Some(point) = shape.anchors().get(anchor).copied() else {
        return;
    };
    if let Some(center) = viewer::project(viewer, point, plane) {
        render_marker(surface, center, style, style.highlight_color);
    }
}

fn preview_stroke(style: &ShapeStyle) -> StrokeStyle {
    StrokeStyle::dashed(
        style.preview_color,
        style.preview_line_width,
        style.preview_dash,
    )
}

/// Live rectangle from the start corner to the cursor. Only the start marker
/// is drawn while the cursor sits on the start corner.
pub fn render_rectangle_preview<S, V>(
    surface: &mut S,
    viewer: &V,
    start: Point,
    cursor: Point,
    plane: Plane,
    style: &ShapeStyle,
) where
    S: Surface + ?Sized,
    V: Viewer + ?Sized,
{
    let (Some(start), Some(cursor)) = (
        viewer::project(viewer, start, plane),
        viewer::project(viewer, cursor, plane),
    ) else {
        return;
    };
    render_marker(surface, start, style, style.marker_color);
    if cursor != start {
        surface.stroke_rect(ScreenRect::from_corners(start, cursor), &preview_stroke(style));
    }
}

/// Live polygon: a closing line from a single point, or the outline through
/// every point and the cursor
pub fn render_polygon_preview<S, V>(
    surface: &mut S,
    viewer: &V,
    points: &[Point],
    cursor: Point,
    plane: Plane,
    style: &ShapeStyle,
) where
    S: Surface + ?Sized,
    V: Viewer + ?Sized,
{
    if points.is_empty() {
        return;
    }
    let (Some(mut outline), Some(cursor)) = (
        viewer::project_all(viewer, points, plane),
        viewer::project(viewer, cursor, plane),
    ) else {
        return;
    };
    let markers = outline.clone();
    outline.push(cursor);
    surface.stroke_path(&outline, outline.len() > 2, &preview_stroke(style));
    for marker in markers {
        render_marker(surface, marker, style, style.marker_color);
    }
}
