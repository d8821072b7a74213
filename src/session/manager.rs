//! Tool activation and session bookkeeping
//!
//! Owns the single active drawing session, the completion subscribers, the
//! per-shape editable flags and the viewer navigation toggle.

use std::collections::HashMap;

use crate::config::Tool;
use crate::domain::ShapeId;
use crate::session::messages::{FinishOutcome, FinishReport};
use crate::session::state::DrawingSession;
use crate::viewer::Viewer;

pub type FinishCallback = Box<dyn FnMut(&FinishReport)>;

#[derive(Default)]
pub struct ToolManager {
    session: Option<DrawingSession>,
    subscribers: Vec<FinishCallback>,
    editable: HashMap<ShapeId, bool>,
    navigation_suspended: bool,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.session.as_ref().map(DrawingSession::tool)
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DrawingSession> {
        self.session.as_mut()
    }

    pub fn subscribe(&mut self, callback: FinishCallback) {
        self.subscribers.push(callback);
    }

    /// Start a session. An active session is aborted first and its report
    /// returned.
    pub fn begin(&mut self, tool: Tool) -> Option<FinishReport> {
        let aborted = self.abort();
        log::debug!("Starting {tool} session");
        self.session = Some(DrawingSession::new(tool));
        aborted
    }

    /// Discard the active session, if any
    pub fn abort(&mut self) -> Option<FinishReport> {
        self.complete(FinishOutcome::Aborted)
    }

    /// End the active session and notify every subscriber
    pub fn complete(&mut self, outcome: FinishOutcome) -> Option<FinishReport> {
        let session = self.session.take()?;
        let report = FinishReport {
            tool: session.tool(),
            outcome,
        };
        log::debug!("{} session finished: {:?}", report.tool, report.outcome);
        for subscriber in &mut self.subscribers {
            subscriber(&report);
        }
        Some(report)
    }

    /// Record a shape's editable flag. Returns true if it changed.
    pub fn set_editable(&mut self, shape: ShapeId, editable: bool) -> bool {
        let previous = self.editable.insert(shape, editable).unwrap_or(false);
        previous != editable
    }

    pub fn is_editable(&self, shape: ShapeId) -> bool {
        self.editable.get(&shape).copied().unwrap_or(false)
    }

    /// Whether any shape is currently under edit
    pub fn is_any_editable(&self) -> bool {
        self.editable.values().any(|editable| *editable)
    }

    pub fn forget(&mut self, shape: ShapeId) {
        self.editable.remove(&shape);
    }

    pub fn navigation_suspended(&self) -> bool {
        self.navigation_suspended
    }

    /// Toggle the viewer's own navigation, calling it only on transitions
    pub fn sync_navigation<V: Viewer + ?Sized>(&mut self, viewer: &mut V, suspend: bool) {
        if suspend == self.navigation_suspended {
            return;
        }
        if suspend {
            viewer.suspend_navigation();
        } else {
            viewer.resume_navigation();
        }
        self.navigation_suspended = suspend;
    }

    /// Forget the navigation state, for a freshly attached viewer
    pub fn reset_navigation(&mut self) {
        self.navigation_suspended = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::Plane;
    use crate::viewer::OrthoViewer;

    #[test]
    fn test_begin_aborts_previous_session() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut manager = ToolManager::new();
        let sink = seen.clone();
        manager.subscribe(Box::new(move |report: &FinishReport| {
            sink.borrow_mut().push(*report)
        }));

        assert_eq!(manager.begin(Tool::Rectangle), None);
        let aborted = manager.begin(Tool::Polygon);
        assert_eq!(
            aborted,
            Some(FinishReport {
                tool: Tool::Rectangle,
                outcome: FinishOutcome::Aborted,
            })
        );
        assert_eq!(manager.active_tool(), Some(Tool::Polygon));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_complete_without_session_is_noop() {
        let calls = Rc::new(RefCell::new(0));
        let mut manager = ToolManager::new();
        let counter = calls.clone();
        manager.subscribe(Box::new(move |_: &FinishReport| *counter.borrow_mut() += 1));

        assert_eq!(manager.complete(FinishOutcome::Cancelled), None);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_editable_flags() {
        let mut manager = ToolManager::new();
        assert!(!manager.is_any_editable());
        assert!(manager.set_editable(ShapeId(1), true));
        assert!(!manager.set_editable(ShapeId(1), true));
        assert!(manager.is_editable(ShapeId(1)));
        assert!(manager.is_any_editable());

        assert!(!manager.set_editable(ShapeId(2), false));
        manager.forget(ShapeId(1));
        assert!(!manager.is_any_editable());
    }

    #[test]
    fn test_sync_navigation_only_on_transitions() {
        let mut viewer = OrthoViewer::new([10, 10, 10]);
        let mut manager = ToolManager::new();

        manager.sync_navigation(&mut viewer, true);
        assert!(!viewer.navigation_enabled());
        assert!(!viewer.scroll(Plane::Axial, 1));

        manager.sync_navigation(&mut viewer, false);
        assert!(viewer.navigation_enabled());
        assert!(!manager.navigation_suspended());
    }
}
