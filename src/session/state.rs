//! Drawing session state machine
//!
//! A session builds one shape from pointer events. It knows nothing about
//! rendering; callers redraw according to the returned [`Step`].

use crate::config::Tool;
use crate::domain::{Plane, Point, PolygonShape, RectangleShape, Shape};
use crate::session::messages::PointerKind;
use crate::viewer::PlanePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Rectangle waiting for its first corner
    AwaitingStart,
    /// Rectangle waiting for the opposite corner
    AwaitingEnd,
    /// Polygon collecting vertices
    Accumulating,
    Done,
    Cancelled,
}

impl SessionState {
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Done | SessionState::Cancelled)
    }
}

/// Shape under construction together with the plane and slice it is bound to
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub plane: Plane,
    pub slice: usize,
    pub shape: Shape,
}

/// Result of feeding one pointer event to a session
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Event had no effect
    Ignored,
    /// An anchor was added
    Progress,
    /// Cursor moved; draw a live preview towards this point
    Preview(Point),
    /// Shape is complete
    Finished(Draft),
    /// In-progress shape discarded
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct DrawingSession {
    tool: Tool,
    state: SessionState,
    /// Plane and slice fixed by the first anchor
    locked: Option<(Plane, usize)>,
    shape: Shape,
    cursor: Option<Point>,
}

impl DrawingSession {
    pub fn new(tool: Tool) -> Self {
        let (state, shape) = match tool {
            Tool::Rectangle => (
                SessionState::AwaitingStart,
                Shape::Rectangle(RectangleShape::default()),
            ),
            Tool::Polygon => (
                SessionState::Accumulating,
                Shape::Polygon(PolygonShape::default()),
            ),
        };
        Self {
            tool,
            state,
            locked: None,
            shape,
            cursor: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn locked_plane(&self) -> Option<Plane> {
        self.locked.map(|(plane, _)| plane)
    }

    /// Last previewed cursor position on the locked plane
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// In-progress shape, None before the plane is locked
    pub fn draft(&self) -> Option<Draft> {
        let (plane, slice) = self.locked?;
        Some(Draft {
            plane,
            slice,
            shape: self.shape.clone(),
        })
    }

    /// Feed a resolved pointer event
    pub fn handle(&mut self, position: &PlanePosition, kind: PointerKind) -> Step {
        if self.state.is_finished() {
            return Step::Ignored;
        }
        if let Some((plane, _)) = self.locked
            && plane != position.plane
        {
            log::trace!(
                "Ignoring {kind:?} on {}, session locked to {plane}",
                position.plane
            );
            return Step::Ignored;
        }

        match self.state {
            SessionState::AwaitingStart | SessionState::AwaitingEnd => {
                self.handle_rectangle(position, kind)
            }
            SessionState::Accumulating => self.handle_polygon(position, kind),
            SessionState::Done | SessionState::Cancelled => Step::Ignored,
        }
    }

    fn lock(&mut self, position: &PlanePosition) {
        if self.locked.is_none() {
            log::debug!(
                "{} session locked to {} slice {}",
                self.tool,
                position.plane,
                position.slice
            );
            self.locked = Some((position.plane, position.slice));
        }
    }

    fn handle_rectangle(&mut self, position: &PlanePosition, kind: PointerKind) -> Step {
        let Shape::Rectangle(rect) = &mut self.shape else {
            return Step::Ignored;
        };
        match (self.state, kind) {
            (SessionState::AwaitingStart, PointerKind::Down) => {
                rect.start = Some(position.point);
                self.cursor = Some(position.point);
                self.lock(position);
                self.state = SessionState::AwaitingEnd;
                Step::Progress
            }
            (SessionState::AwaitingEnd, PointerKind::Move) => {
                self.cursor = Some(position.point);
                Step::Preview(position.point)
            }
            (SessionState::AwaitingEnd, PointerKind::Down) => {
                rect.end = Some(position.point);
                self.finish()
            }
            _ => Step::Ignored,
        }
    }

    fn handle_polygon(&mut self, position: &PlanePosition, kind: PointerKind) -> Step {
        let Shape::Polygon(poly) = &mut self.shape else {
            return Step::Ignored;
        };
        match kind {
            PointerKind::Down => {
                if poly.points.last() == Some(&position.point) {
                    return Step::Ignored;
                }
                poly.points.push(position.point);
                self.cursor = Some(position.point);
                self.lock(position);
                Step::Progress
            }
            PointerKind::Move if !poly.points.is_empty() => {
                self.cursor = Some(position.point);
                Step::Preview(position.point)
            }
            PointerKind::DoubleClick => {
                if poly.points.len() < PolygonShape::MIN_POINTS {
                    log::debug!("Polygon cancelled with {} points", poly.points.len());
                    self.state = SessionState::Cancelled;
                    self.cursor = None;
                    return Step::Cancelled;
                }
                if poly.points.last() != Some(&position.point) {
                    poly.points.push(position.point);
                }
                self.finish()
            }
            _ => Step::Ignored,
        }
    }

    fn finish(&mut self) -> Step {
        self.cursor = None;
        match self.draft() {
            Some(draft) if draft.shape.is_valid() => {
                self.state = SessionState::Done;
                Step::Finished(draft)
            }
            _ => {
                self.state = SessionState::Cancelled;
                Step::Cancelled
            }
        }
    }
}
