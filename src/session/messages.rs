//! Message types for the annotation overlay
//!
//! This module contains:
//! - PointerMsg, the pointer input consumed by the overlay
//! - OverlayEvent, the notifications the overlay broadcasts
//! - FinishReport, delivered to completion subscribers

use crate::config::Tool;
use crate::domain::{Plane, ScreenPoint, ShapeId};

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    DoubleClick,
}

/// Pointer event in screen pixels of the hosting surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMsg {
    pub kind: PointerKind,
    pub screen: ScreenPoint,
}

impl PointerMsg {
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn double_click(x: f32, y: f32) -> Self {
        Self::new(PointerKind::DoubleClick, x, y)
    }

    fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            screen: ScreenPoint::new(x, y),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// How a drawing session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    /// A shape was added to the collection
    Created(ShapeId),
    /// Polygon double-clicked with too few points
    Cancelled,
    /// Tool unset or replaced before the shape was finished
    Aborted,
}

/// Delivered to completion subscribers when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishReport {
    pub tool: Tool,
    pub outcome: FinishOutcome,
}

impl FinishReport {
    pub fn created(&self) -> Option<ShapeId> {
        match self.outcome {
            FinishOutcome::Created(id) => Some(id),
            _ => None,
        }
    }
}

/// Notifications broadcast by the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A shape's anchor came within (or left) the activation radius
    EditabilityChanged {
        shape: ShapeId,
        plane: Plane,
        editable: bool,
    },
    ShapeCreated { shape: ShapeId, plane: Plane },
    /// An anchor drag finished
    ShapeEdited { shape: ShapeId, plane: Plane },
    ShapesCleared { count: usize },
    SessionFinished(FinishReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_constructors() {
        let msg = PointerMsg::double_click(3.0, 4.0);
        assert_eq!(msg.kind, PointerKind::DoubleClick);
        assert_eq!(msg.screen, ScreenPoint::new(3.0, 4.0));
        assert_eq!(PointerMsg::moved(0.0, 0.0).kind, PointerKind::Move);
    }

    #[test]
    fn test_report_created_id() {
        let report = FinishReport {
            tool: Tool::Polygon,
            outcome: FinishOutcome::Created(ShapeId(7)),
        };
        assert_eq!(report.created(), Some(ShapeId(7)));
        let cancelled = FinishReport {
            outcome: FinishOutcome::Cancelled,
            ..report
        };
        assert_eq!(cancelled.created(), None);
    }
}
