//! Baseline management and scene redraws
//!
//! The baseline is the clean picture under the overlay, captured when the
//! viewer repaints or a session starts. Every redraw restores it first, so
//! live previews never accumulate on the surface.

use super::shapes;
use super::surface::Surface;
use crate::config::ShapeStyle;
use crate::domain::{Annotation, ShapeId};
use crate::viewer::Viewer;

pub struct RenderPipeline<S: Surface> {
    surface: S,
    baseline: Option<S::Frame>,
    /// Shapes drawn by the last full pass, eligible for editing
    armed: Vec<ShapeId>,
}

impl<S: Surface> RenderPipeline<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            baseline: None,
            armed: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Snapshot the surface as the new clean picture
    pub fn capture_baseline(&mut self) {
        self.baseline = Some(self.surface.snapshot());
    }

    /// Capture the surface as the baseline only if none exists yet
    pub fn ensure_baseline(&mut self) {
        if self.baseline.is_none() {
            self.capture_baseline();
            log::debug!("Captured initial baseline");
        }
    }

    /// Blit the baseline back; without one the surface is cleared
    pub fn restore_baseline(&mut self) {
        match &self.baseline {
            Some(frame) => self.surface.restore(frame),
            None => self.surface.clear(),
        }
    }

    /// Ids of the shapes drawn by the last full pass
    pub fn armed(&self) -> &[ShapeId] {
        &self.armed
    }

    pub fn is_armed(&self, id: ShapeId) -> bool {
        self.armed.contains(&id)
    }

    /// Restore the baseline and draw every shape on its plane's current slice
    pub fn render_all<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &[Annotation],
        style: &ShapeStyle,
    ) -> usize {
        self.render_scene(viewer, annotations, style, None)
    }

    /// Same as [`Self::render_all`], skipping exactly one shape
    pub fn render_all_except<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &[Annotation],
        style: &ShapeStyle,
        skip: ShapeId,
    ) -> usize {
        self.render_scene(viewer, annotations, style, Some(skip))
    }

    fn render_scene<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        annotations: &[Annotation],
        style: &ShapeStyle,
        skip: Option<ShapeId>,
    ) -> usize {
        self.ensure_baseline();
        self.restore_baseline();
        self.armed.clear();

        let mut drawn = 0;
        for annotation in annotations {
            if !annotation.is_on_slice(viewer.current_slice(annotation.plane)) {
                continue;
            }
            self.armed.push(annotation.id);
            if skip == Some(annotation.id) {
                continue;
            }
            shapes::render_shape(
                &mut self.surface,
                viewer,
                &annotation.shape,
                annotation.plane,
                style,
                None,
            );
            drawn += 1;
        }
        log::trace!("Rendered {drawn} of {} shapes", annotations.len());
        drawn
    }
}
