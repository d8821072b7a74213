//! Pointer handlers
//!
//! Routes pointer events to the active drawing session, or to the edit
//! controller when no tool is active, and applies the resulting redraws and
//! notifications to the overlay.

use crate::config::{ShapeStyle, Tool};
use crate::core::overlay::Overlay;
use crate::domain::{Annotation, Plane, Shape, ShapeId};
use crate::render::shapes;
use crate::render::surface::Surface;
use crate::session::messages::{FinishOutcome, OverlayEvent, PointerKind, PointerMsg};
use crate::session::state::{Draft, DrawingSession, Step};
use crate::viewer::{self, Viewer};

use super::edit::{EditStep, EditTarget};

/// Dispatch a pointer event
pub fn handle_pointer<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>, msg: PointerMsg) {
    if overlay.tools.is_active() {
        handle_draw_pointer(overlay, msg);
    } else {
        handle_edit_pointer(overlay, msg);
    }
}

// ============================================================================
// Drawing
// ============================================================================

fn handle_draw_pointer<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>, msg: PointerMsg) {
    let Some(viewer) = overlay.viewer.as_ref() else {
        return;
    };
    let Some(position) = viewer::resolve(viewer, msg.screen) else {
        log::trace!("Pointer at {:?} is outside every plane", msg.screen);
        return;
    };
    let Some(session) = overlay.tools.session_mut() else {
        return;
    };
    let tool = session.tool();

    match session.handle(&position, msg.kind) {
        Step::Ignored => {}
        Step::Progress | Step::Preview(_) => redraw_scene(overlay),
        Step::Finished(draft) => finish_shape(overlay, tool, draft),
        Step::Cancelled => {
            end_session(overlay, tool, FinishOutcome::Cancelled);
            redraw_scene(overlay);
        }
    }
}

fn finish_shape<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>, tool: Tool, draft: Draft) {
    let id = overlay.allocate_id();
    let plane = draft.plane;
    log::info!("Created {tool} {id} on {plane} slice {}", draft.slice);
    overlay.annotations.push(Annotation {
        id,
        plane,
        slice: draft.slice,
        shape: draft.shape,
    });
    overlay.push_event(OverlayEvent::ShapeCreated { shape: id, plane });
    end_session(overlay, tool, FinishOutcome::Created(id));
    redraw_scene(overlay);
}

/// Close the session, notify, and start the next one if re-arming is on
fn end_session<V: Viewer, S: Surface>(
    overlay: &mut Overlay<V, S>,
    tool: Tool,
    outcome: FinishOutcome,
) {
    if let Some(report) = overlay.tools.complete(outcome) {
        overlay.push_event(OverlayEvent::SessionFinished(report));
    }
    if overlay.config.rearm_after_finish && !overlay.tools.is_any_editable() {
        log::debug!("Re-arming {tool}");
        overlay.tools.begin(tool);
    }
}

// ============================================================================
// Editing
// ============================================================================

fn handle_edit_pointer<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>, msg: PointerMsg) {
    let (Some(viewer), Some(pipeline)) = (overlay.viewer.as_ref(), overlay.pipeline.as_ref())
    else {
        return;
    };
    let radius = overlay.config.activation_radius;
    let step = match msg.kind {
        PointerKind::Move => overlay.edit.pointer_move(
            viewer,
            &mut overlay.annotations,
            pipeline.armed(),
            msg.screen,
            radius,
        ),
        PointerKind::Down => overlay.edit.pointer_down(
            viewer,
            &overlay.annotations,
            pipeline.armed(),
            msg.screen,
            radius,
        ),
        PointerKind::Up => overlay.edit.pointer_up(),
        PointerKind::DoubleClick => EditStep::Ignored,
    };
    apply_edit_step(overlay, step);
}

/// Re-check the edit target against the shapes armed by the last redraw
pub(crate) fn refresh_edit<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>) {
    let (Some(viewer), Some(pipeline)) = (overlay.viewer.as_ref(), overlay.pipeline.as_ref())
    else {
        return;
    };
    let step = overlay.edit.refresh(
        viewer,
        &overlay.annotations,
        pipeline.armed(),
        overlay.config.activation_radius,
    );
    apply_edit_step(overlay, step);
}

fn apply_edit_step<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>, step: EditStep) {
    match step {
        EditStep::Ignored => return,
        EditStep::Hover { target, released } => {
            if let Some(previous) = released {
                release_editability(overlay, previous);
            }
            set_editability(overlay, target.shape, target.plane, true);
        }
        EditStep::Released(target) => release_editability(overlay, target),
        EditStep::Grabbed(_) | EditStep::Dragged(_) => {}
        EditStep::Dropped(target) => {
            release_editability(overlay, target);
            overlay.push_event(OverlayEvent::ShapeEdited {
                shape: target.shape,
                plane: target.plane,
            });
        }
    }
    redraw_scene(overlay);
}

pub(crate) fn release_editability<V: Viewer, S: Surface>(
    overlay: &mut Overlay<V, S>,
    target: EditTarget,
) {
    set_editability(overlay, target.shape, target.plane, false);
}

fn set_editability<V: Viewer, S: Surface>(
    overlay: &mut Overlay<V, S>,
    shape: ShapeId,
    plane: Plane,
    editable: bool,
) {
    if overlay.tools.set_editable(shape, editable) {
        log::debug!("{shape} editable: {editable}");
        overlay.push_event(OverlayEvent::EditabilityChanged {
            shape,
            plane,
            editable,
        });
    }
}

// ============================================================================
// Redraw
// ============================================================================

/// Restore the baseline and draw shapes, edit highlights and the live draft
pub(crate) fn redraw_scene<V: Viewer, S: Surface>(overlay: &mut Overlay<V, S>) {
    let (Some(viewer), Some(pipeline)) = (overlay.viewer.as_ref(), overlay.pipeline.as_mut())
    else {
        return;
    };
    let style = &overlay.config.style;
    let annotations = &overlay.annotations;
    let find = |id: ShapeId| annotations.iter().find(|a| a.id == id);

    match overlay.edit.target() {
        Some(target) if target.dragging => {
            pipeline.render_all_except(viewer, annotations, style, target.shape);
            if let Some(annotation) = find(target.shape)
                && pipeline.is_armed(target.shape)
            {
                shapes::render_shape(
                    pipeline.surface_mut(),
                    viewer,
                    &annotation.shape,
                    annotation.plane,
                    style,
                    Some(style.highlight_color),
                );
            }
        }
        Some(target) => {
            pipeline.render_all(viewer, annotations, style);
            if let Some(annotation) = find(target.shape)
                && pipeline.is_armed(target.shape)
            {
                shapes::render_anchor_highlight(
                    pipeline.surface_mut(),
                    viewer,
                    &annotation.shape,
                    annotation.plane,
                    target.anchor,
                    style,
                );
            }
        }
        None => {
            pipeline.render_all(viewer, annotations, style);
        }
    }

    if let Some(session) = overlay.tools.session() {
        render_draft(pipeline.surface_mut(), viewer, session, style);
    }
}

/// Live preview of the in-progress shape, only on the slice it is bound to
fn render_draft<S, V>(
    surface: &mut S,
    viewer: &V,
    session: &DrawingSession,
    style: &ShapeStyle,
) where
    S: Surface + ?Sized,
    V: Viewer + ?Sized,
{
    let Some(draft) = session.draft() else {
        return;
    };
    if viewer.current_slice(draft.plane) != draft.slice {
        return;
    }
    let anchors = draft.shape.anchors();
    let Some(cursor) = session.cursor().or_else(|| anchors.last().copied()) else {
        return;
    };
    match &draft.shape {
        Shape::Rectangle(rect) => {
            if let Some(start) = rect.start {
                let plane = draft.plane;
                shapes::render_rectangle_preview(surface, viewer, start, cursor, plane, style);
            }
        }
        Shape::Polygon(poly) => {
            let plane = draft.plane;
            shapes::render_polygon_preview(surface, viewer, &poly.points, cursor, plane, style);
        }
    }
}
