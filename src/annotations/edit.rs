//! Anchor hover and drag editing
//!
//! One controller serves every finalized shape. It keeps a single edit
//! target, so at most one shape is hovered or dragged at any time. When
//! several anchors are within reach the nearest one wins.

use crate::domain::{Annotation, Plane, ScreenPoint, ShapeId};
use crate::viewer::{self, Viewer};

/// Anchor currently hovered or dragged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditTarget {
    pub shape: ShapeId,
    pub plane: Plane,
    /// Anchor index (rectangle: 0 start, 1 end; polygon: vertex index)
    pub anchor: usize,
    pub dragging: bool,
}

/// Anchor within the activation radius of the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorHit {
    pub shape: ShapeId,
    pub plane: Plane,
    pub anchor: usize,
    /// Screen distance in pixels
    pub distance: f32,
}

/// Outcome of one pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditStep {
    Ignored,
    /// Pointer is over an anchor. `released` is the previous target if it
    /// belonged to another shape.
    Hover {
        target: EditTarget,
        released: Option<EditTarget>,
    },
    /// Pointer left every anchor
    Released(EditTarget),
    Grabbed(EditTarget),
    /// Dragged anchor moved
    Dragged(EditTarget),
    /// Drag finished
    Dropped(EditTarget),
}

/// Nearest anchor of an armed shape within `radius` (inclusive) of `screen`.
///
/// Ties keep the earlier shape in collection order, then the lower anchor
/// index.
pub fn hit_test<V: Viewer + ?Sized>(
    viewer: &V,
    annotations: &[Annotation],
    armed: &[ShapeId],
    screen: ScreenPoint,
    radius: f32,
) -> Option<AnchorHit> {
    let mut best: Option<AnchorHit> = None;
    for annotation in annotations.iter().filter(|a| armed.contains(&a.id)) {
        for (anchor, point) in annotation.shape.anchors().into_iter().enumerate() {
            let Some(projected) = viewer::project(viewer, point, annotation.plane) else {
                continue;
            };
            let distance = projected.distance_to(screen);
            if distance > radius {
                continue;
            }
            if best.is_none_or(|hit| distance < hit.distance) {
                best = Some(AnchorHit {
                    shape: annotation.id,
                    plane: annotation.plane,
                    anchor,
                    distance,
                });
            }
        }
    }
    best
}

#[derive(Debug, Default)]
pub struct EditController {
    target: Option<EditTarget>,
    /// Last pointer position seen, for re-resolving hover after a repaint
    pointer: Option<ScreenPoint>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<EditTarget> {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.target.is_some_and(|t| t.dragging)
    }

    /// Drop the edit target without any redraw
    pub fn reset(&mut self) -> Option<EditTarget> {
        self.target.take()
    }

    /// Drop the edit target if it belongs to `shape`
    pub fn forget(&mut self, shape: ShapeId) -> Option<EditTarget> {
        if self.target.is_some_and(|t| t.shape == shape) {
            self.target.take()
        } else {
            None
        }
    }

    pub fn pointer_move<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &mut [Annotation],
        armed: &[ShapeId],
        screen: ScreenPoint,
        radius: f32,
    ) -> EditStep {
        self.pointer = Some(screen);
        if let Some(target) = self.target
            && target.dragging
        {
            return self.drag(viewer, annotations, target, screen);
        }
        self.hover(viewer, annotations, armed, screen, radius)
    }

    fn hover<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &[Annotation],
        armed: &[ShapeId],
        screen: ScreenPoint,
        radius: f32,
    ) -> EditStep {
        let hit = hit_test(viewer, annotations, armed, screen, radius);
        match (self.target, hit) {
            (None, None) => EditStep::Ignored,
            (Some(previous), None) => {
                self.target = None;
                EditStep::Released(previous)
            }
            (previous, Some(hit)) => {
                if previous.is_some_and(|p| p.shape == hit.shape && p.anchor == hit.anchor) {
                    return EditStep::Ignored;
                }
                let target = EditTarget {
                    shape: hit.shape,
                    plane: hit.plane,
                    anchor: hit.anchor,
                    dragging: false,
                };
                self.target = Some(target);
                EditStep::Hover {
                    target,
                    released: previous.filter(|p| p.shape != hit.shape),
                }
            }
        }
    }

    /// Re-check the target after the view changed (slice, pan or zoom).
    ///
    /// A hover is resolved again at the last pointer position. A drag whose
    /// shape is no longer armed is dropped where it is.
    pub fn refresh<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &[Annotation],
        armed: &[ShapeId],
        radius: f32,
    ) -> EditStep {
        let Some(target) = self.target else {
            return EditStep::Ignored;
        };
        if target.dragging {
            if armed.contains(&target.shape) {
                return EditStep::Ignored;
            }
            log::debug!("{} left the view while dragged", target.shape);
            self.target = None;
            return EditStep::Dropped(EditTarget {
                dragging: false,
                ..target
            });
        }
        match self.pointer {
            Some(screen) => self.hover(viewer, annotations, armed, screen, radius),
            None => {
                self.target = None;
                EditStep::Released(target)
            }
        }
    }

    fn drag<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &mut [Annotation],
        target: EditTarget,
        screen: ScreenPoint,
    ) -> EditStep {
        let Some(position) = viewer::resolve(viewer, screen) else {
            return EditStep::Ignored;
        };
        if position.plane != target.plane {
            log::trace!("Drag left {}, ignoring", target.plane);
            return EditStep::Ignored;
        }
        let Some(anchor) = annotations
            .iter_mut()
            .find(|a| a.id == target.shape)
            .and_then(|a| a.shape.anchor_mut(target.anchor))
        else {
            log::debug!("Dragged {} no longer exists", target.shape);
            self.target = None;
            return EditStep::Ignored;
        };
        *anchor = position.point;
        EditStep::Dragged(target)
    }

    /// Grab the hovered anchor if it is still under the pointer. A stale
    /// hover is resolved again instead.
    pub fn pointer_down<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &[Annotation],
        armed: &[ShapeId],
        screen: ScreenPoint,
        radius: f32,
    ) -> EditStep {
        self.pointer = Some(screen);
        let Some(target) = self.target else {
            return EditStep::Ignored;
        };
        if target.dragging {
            return EditStep::Ignored;
        }
        let hit = hit_test(viewer, annotations, armed, screen, radius);
        if !hit.is_some_and(|h| h.shape == target.shape && h.anchor == target.anchor) {
            log::debug!("Hover on {} is stale, not grabbing", target.shape);
            return self.hover(viewer, annotations, armed, screen, radius);
        }
        let grabbed = EditTarget {
            dragging: true,
            ..target
        };
        self.target = Some(grabbed);
        log::debug!("Grabbed anchor {} of {}", grabbed.anchor, grabbed.shape);
        EditStep::Grabbed(grabbed)
    }

    pub fn pointer_up(&mut self) -> EditStep {
        match self.target {
            Some(target) if target.dragging => {
                self.target = None;
                log::debug!("Dropped anchor {} of {}", target.anchor, target.shape);
                EditStep::Dropped(EditTarget {
                    dragging: false,
                    ..target
                })
            }
            _ => EditStep::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, PolygonShape, RectangleShape, Shape};
    use crate::viewer::OrthoViewer;

    fn rectangle(id: u64, plane: Plane, start: Point, end: Point) -> Annotation {
        Annotation {
            id: ShapeId(id),
            plane,
            slice: 128,
            shape: Shape::Rectangle(RectangleShape {
                start: Some(start),
                end: Some(end),
            }),
        }
    }

    fn ids(annotations: &[Annotation]) -> Vec<ShapeId> {
        annotations.iter().map(|a| a.id).collect()
    }

    /// Pointer move with every shape armed and the default radius
    fn move_pointer(
        edit: &mut EditController,
        viewer: &OrthoViewer,
        shapes: &mut [Annotation],
        x: f32,
        y: f32,
    ) -> EditStep {
        let armed = ids(shapes);
        edit.pointer_move(viewer, shapes, &armed, ScreenPoint::new(x, y), 5.0)
    }

    fn press(
        edit: &mut EditController,
        viewer: &OrthoViewer,
        shapes: &[Annotation],
        x: f32,
        y: f32,
    ) -> EditStep {
        edit.pointer_down(viewer, shapes, &ids(shapes), ScreenPoint::new(x, y), 5.0)
    }

    #[test]
    fn test_activation_radius_is_inclusive() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let shapes = vec![rectangle(
            1,
            Plane::Axial,
            Point::new(100.0, 100.0),
            Point::new(150.0, 130.0),
        )];
        let armed = ids(&shapes);

        let hit = hit_test(&viewer, &shapes, &armed, ScreenPoint::new(105.0, 100.0), 5.0);
        assert_eq!(hit.map(|h| h.anchor), Some(0));
        let miss = hit_test(&viewer, &shapes, &armed, ScreenPoint::new(105.01, 100.0), 5.0);
        assert!(miss.is_none());
    }

    #[test]
    fn test_nearest_anchor_wins_across_shapes() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let shapes = vec![
            rectangle(1, Plane::Axial, Point::new(10.0, 10.0), Point::new(50.0, 50.0)),
            rectangle(2, Plane::Axial, Point::new(13.0, 10.0), Point::new(80.0, 80.0)),
        ];
        let armed = ids(&shapes);

        let hit = hit_test(&viewer, &shapes, &armed, ScreenPoint::new(12.0, 10.0), 5.0).unwrap();
        assert_eq!(hit.shape, ShapeId(2));

        // equal distance keeps the earlier shape
        let tie = hit_test(&viewer, &shapes, &armed, ScreenPoint::new(11.5, 10.0), 5.0).unwrap();
        assert_eq!(tie.shape, ShapeId(1));
    }

    #[test]
    fn test_first_anchor_wins_within_shape() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let shapes = vec![Annotation {
            id: ShapeId(1),
            plane: Plane::Axial,
            slice: 128,
            shape: Shape::Polygon(PolygonShape {
                points: vec![
                    Point::new(10.0, 10.0),
                    Point::new(14.0, 10.0),
                    Point::new(12.0, 40.0),
                ],
            }),
        }];
        let hit = hit_test(&viewer, &shapes, &ids(&shapes), ScreenPoint::new(12.0, 10.0), 5.0);
        assert_eq!(hit.map(|h| h.anchor), Some(0));
    }

    #[test]
    fn test_unarmed_shapes_are_not_hit() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let shapes = vec![rectangle(
            1,
            Plane::Axial,
            Point::new(10.0, 10.0),
            Point::new(50.0, 50.0),
        )];
        assert!(hit_test(&viewer, &shapes, &[], ScreenPoint::new(10.0, 10.0), 5.0).is_none());
    }

    #[test]
    fn test_hover_switch_releases_previous_shape() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let mut shapes = vec![
            rectangle(1, Plane::Axial, Point::new(10.0, 10.0), Point::new(50.0, 50.0)),
            rectangle(2, Plane::Axial, Point::new(100.0, 100.0), Point::new(150.0, 150.0)),
        ];
        let mut edit = EditController::new();

        let step = move_pointer(&mut edit, &viewer, &mut shapes, 11.0, 10.0);
        assert!(matches!(step, EditStep::Hover { released: None, .. }));
        assert_eq!(
            move_pointer(&mut edit, &viewer, &mut shapes, 10.0, 11.0),
            EditStep::Ignored
        );

        let step = move_pointer(&mut edit, &viewer, &mut shapes, 150.0, 149.0);
        match step {
            EditStep::Hover { target, released } => {
                assert_eq!(target.shape, ShapeId(2));
                assert_eq!(target.anchor, 1);
                assert_eq!(released.map(|t| t.shape), Some(ShapeId(1)));
            }
            other => panic!("expected hover, got {other:?}"),
        }

        let step = move_pointer(&mut edit, &viewer, &mut shapes, 200.0, 10.0);
        assert!(matches!(step, EditStep::Released(t) if t.shape == ShapeId(2)));
        assert!(edit.target().is_none());
    }

    #[test]
    fn test_drag_moves_only_selected_anchor() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let mut shapes = vec![
            rectangle(1, Plane::Axial, Point::new(10.0, 10.0), Point::new(50.0, 50.0)),
            rectangle(2, Plane::Axial, Point::new(100.0, 100.0), Point::new(150.0, 150.0)),
        ];
        let untouched = shapes[1].clone();
        let mut edit = EditController::new();

        assert_eq!(press(&mut edit, &viewer, &shapes, 50.0, 50.0), EditStep::Ignored);
        move_pointer(&mut edit, &viewer, &mut shapes, 50.0, 50.0);
        assert!(matches!(
            press(&mut edit, &viewer, &shapes, 50.0, 50.0),
            EditStep::Grabbed(_)
        ));
        assert!(edit.is_dragging());

        let step = move_pointer(&mut edit, &viewer, &mut shapes, 70.0, 60.0);
        assert!(matches!(step, EditStep::Dragged(t) if t.anchor == 1));
        assert_eq!(
            shapes[0].shape.anchors(),
            vec![Point::new(10.0, 10.0), Point::new(70.0, 60.0)]
        );
        assert_eq!(shapes[1], untouched);

        // moves into another pane are ignored while dragging
        let step = move_pointer(&mut edit, &viewer, &mut shapes, 300.0, 60.0);
        assert_eq!(step, EditStep::Ignored);
        assert_eq!(shapes[0].shape.anchors()[1], Point::new(70.0, 60.0));

        let step = edit.pointer_up();
        assert!(matches!(step, EditStep::Dropped(t) if !t.dragging));
        assert!(edit.target().is_none());
    }

    #[test]
    fn test_forget_only_matching_shape() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let mut shapes = vec![rectangle(
            1,
            Plane::Axial,
            Point::new(10.0, 10.0),
            Point::new(50.0, 50.0),
        )];
        let mut edit = EditController::new();
        move_pointer(&mut edit, &viewer, &mut shapes, 10.0, 10.0);

        assert!(edit.forget(ShapeId(9)).is_none());
        assert!(edit.forget(ShapeId(1)).is_some());
        assert!(edit.target().is_none());
    }

    #[test]
    fn test_stale_hover_is_not_grabbed() {
        let mut viewer = OrthoViewer::new([256, 256, 256]);
        let mut shapes = vec![rectangle(
            1,
            Plane::Axial,
            Point::new(10.0, 10.0),
            Point::new(50.0, 50.0),
        )];
        let mut edit = EditController::new();
        move_pointer(&mut edit, &viewer, &mut shapes, 10.0, 10.0);

        // the anchor slides away from the stationary pointer
        viewer.set_pan(Plane::Axial, Point::new(40.0, 0.0));
        let step = press(&mut edit, &viewer, &shapes, 10.0, 10.0);
        assert!(matches!(step, EditStep::Released(t) if t.shape == ShapeId(1)));
        assert!(!edit.is_dragging());
        assert!(edit.target().is_none());

        // nothing armed, nothing grabbed
        let step = move_pointer(&mut edit, &viewer, &mut shapes, 10.0, 50.0);
        assert!(matches!(step, EditStep::Hover { target, .. } if target.anchor == 1));
        let step = edit.pointer_down(&viewer, &shapes, &[], ScreenPoint::new(10.0, 50.0), 5.0);
        assert!(matches!(step, EditStep::Released(_)));
        assert!(!edit.is_dragging());
    }

    #[test]
    fn test_refresh_drops_unarmed_targets() {
        let viewer = OrthoViewer::new([256, 256, 256]);
        let mut shapes = vec![rectangle(
            1,
            Plane::Axial,
            Point::new(10.0, 10.0),
            Point::new(50.0, 50.0),
        )];
        let armed = ids(&shapes);
        let mut edit = EditController::new();

        move_pointer(&mut edit, &viewer, &mut shapes, 10.0, 10.0);
        assert_eq!(edit.refresh(&viewer, &shapes, &armed, 5.0), EditStep::Ignored);
        let step = edit.refresh(&viewer, &shapes, &[], 5.0);
        assert!(matches!(step, EditStep::Released(t) if t.shape == ShapeId(1)));

        move_pointer(&mut edit, &viewer, &mut shapes, 10.0, 10.0);
        press(&mut edit, &viewer, &shapes, 10.0, 10.0);
        move_pointer(&mut edit, &viewer, &mut shapes, 20.0, 20.0);
        assert_eq!(edit.refresh(&viewer, &shapes, &armed, 5.0), EditStep::Ignored);
        assert!(edit.is_dragging());

        let step = edit.refresh(&viewer, &shapes, &[], 5.0);
        assert!(matches!(step, EditStep::Dropped(t) if !t.dragging && t.anchor == 0));
        assert!(edit.target().is_none());
    }
}
