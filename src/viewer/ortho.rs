//! Orthographic three-pane viewer
//!
//! Lays the axial, coronal and sagittal panes out on one screen, each with its
//! own slice, pan and zoom. Hosts without their own viewer can embed it, and it
//! backs the overlay's tests.

use crate::config::ShapeColor;
use crate::domain::{Plane, Point, ScreenPoint, ScreenRect, VolumePoint};
use crate::render::surface::Surface;

use super::Viewer;

/// Default pane edge in pixels
pub const PANE_SIZE: f32 = 256.0;

/// Screen placement of one plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub bounds: ScreenRect,
    /// Screen pixels per volume unit
    pub zoom: f32,
    /// Plane-local point shown at the pane's top-left corner
    pub pan: Point,
}

impl Viewport {
    pub fn new(bounds: ScreenRect) -> Self {
        Self {
            bounds,
            zoom: 1.0,
            pan: Point::default(),
        }
    }

    fn to_screen(&self, local: Point) -> ScreenPoint {
        ScreenPoint::new(
            self.bounds.x + (local.x - self.pan.x) * self.zoom,
            self.bounds.y + (local.y - self.pan.y) * self.zoom,
        )
    }

    fn to_local(&self, screen: ScreenPoint) -> Point {
        Point::new(
            (screen.x - self.bounds.x) / self.zoom + self.pan.x,
            (screen.y - self.bounds.y) / self.zoom + self.pan.y,
        )
    }
}

fn index(plane: Plane) -> usize {
    match plane {
        Plane::Axial => 0,
        Plane::Coronal => 1,
        Plane::Sagittal => 2,
    }
}

#[derive(Clone, Debug)]
pub struct OrthoViewer {
    /// Volume size along x, y, z
    dims: [usize; 3],
    slices: [usize; 3],
    viewports: [Viewport; 3],
    navigation_enabled: bool,
}

impl OrthoViewer {
    /// Panes side by side (axial, coronal, sagittal), slices centered
    pub fn new(dims: [usize; 3]) -> Self {
        let viewports = [0.0, 1.0, 2.0].map(|column| {
            Viewport::new(ScreenRect::new(column * PANE_SIZE, 0.0, PANE_SIZE, PANE_SIZE))
        });
        Self::with_viewports(dims, viewports)
    }

    /// Custom layout, viewports given in axial, coronal, sagittal order
    pub fn with_viewports(dims: [usize; 3], viewports: [Viewport; 3]) -> Self {
        let mut viewer = Self {
            dims,
            slices: [0; 3],
            viewports,
            navigation_enabled: true,
        };
        for plane in Plane::ALL {
            viewer.slices[index(plane)] = viewer.slice_count(plane) / 2;
        }
        viewer
    }

    /// Number of slices along `plane`'s normal
    pub fn slice_count(&self, plane: Plane) -> usize {
        match plane {
            Plane::Axial => self.dims[2],
            Plane::Coronal => self.dims[1],
            Plane::Sagittal => self.dims[0],
        }
    }

    /// Show a slice, clamped to the volume. Returns true if the slice changed.
    pub fn set_slice(&mut self, plane: Plane, slice: usize) -> bool {
        let clamped = slice.min(self.slice_count(plane).saturating_sub(1));
        let current = &mut self.slices[index(plane)];
        let changed = *current != clamped;
        *current = clamped;
        changed
    }

    /// User scroll through slices; ignored while navigation is suspended
    pub fn scroll(&mut self, plane: Plane, delta: isize) -> bool {
        if !self.navigation_enabled {
            return false;
        }
        let target = self.slices[index(plane)].saturating_add_signed(delta);
        self.set_slice(plane, target)
    }

    pub fn viewport(&self, plane: Plane) -> &Viewport {
        &self.viewports[index(plane)]
    }

    pub fn set_zoom(&mut self, plane: Plane, zoom: f32) {
        if zoom > 0.0 {
            self.viewports[index(plane)].zoom = zoom;
        }
    }

    pub fn set_pan(&mut self, plane: Plane, pan: Point) {
        self.viewports[index(plane)].pan = pan;
    }

    pub fn navigation_enabled(&self) -> bool {
        self.navigation_enabled
    }

    /// Pixel size covering every pane
    pub fn screen_size(&self) -> (u32, u32) {
        let (w, h) = self.viewports.iter().fold((0.0f32, 0.0f32), |(w, h), vp| {
            (
                w.max(vp.bounds.x + vp.bounds.width),
                h.max(vp.bounds.y + vp.bounds.height),
            )
        });
        (w.ceil() as u32, h.ceil() as u32)
    }

    /// Paint each pane with a gray level derived from its current slice
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for plane in Plane::ALL {
            let count = self.slice_count(plane).max(1) as f32;
            let level = 40 + (self.current_slice(plane) as f32 / count * 160.0) as u8;
            surface.fill_rect(
                self.viewport(plane).bounds,
                ShapeColor::rgb8(level, level, level),
            );
        }
    }
}

impl Viewer for OrthoViewer {
    fn current_slice(&self, plane: Plane) -> usize {
        self.slices[index(plane)]
    }

    fn to_screen(&self, point: VolumePoint, plane: Plane) -> Option<ScreenPoint> {
        Some(self.viewport(plane).to_screen(plane.flatten(point)))
    }

    fn plane_at(&self, screen: ScreenPoint) -> Option<Plane> {
        Plane::ALL
            .into_iter()
            .find(|plane| self.viewport(*plane).bounds.contains(screen))
    }

    fn to_volume(&self, screen: ScreenPoint) -> Option<VolumePoint> {
        let plane = self.plane_at(screen)?;
        let local = self.viewport(plane).to_local(screen);
        Some(plane.lift(local, self.current_slice(plane) as f32))
    }

    fn suspend_navigation(&mut self) {
        log::trace!("viewer navigation suspended");
        self.navigation_enabled = false;
    }

    fn resume_navigation(&mut self) {
        log::trace!("viewer navigation resumed");
        self.navigation_enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::{project, resolve};

    #[test]
    fn test_default_layout() {
        let viewer = OrthoViewer::new([100, 120, 80]);
        assert_eq!(viewer.screen_size(), (768, 256));
        assert_eq!(viewer.current_slice(Plane::Axial), 40);
        assert_eq!(viewer.current_slice(Plane::Coronal), 60);
        assert_eq!(viewer.current_slice(Plane::Sagittal), 50);
        assert_eq!(viewer.plane_at(ScreenPoint::new(10.0, 10.0)), Some(Plane::Axial));
        assert_eq!(viewer.plane_at(ScreenPoint::new(300.0, 10.0)), Some(Plane::Coronal));
        assert_eq!(viewer.plane_at(ScreenPoint::new(600.0, 10.0)), Some(Plane::Sagittal));
        assert_eq!(viewer.plane_at(ScreenPoint::new(10.0, 300.0)), None);
    }

    #[test]
    fn test_screen_roundtrip_with_pan_and_zoom() {
        let mut viewer = OrthoViewer::new([256, 256, 256]);
        viewer.set_zoom(Plane::Coronal, 2.0);
        viewer.set_pan(Plane::Coronal, Point::new(10.0, 20.0));

        let screen = ScreenPoint::new(300.0, 50.0);
        let position = resolve(&viewer, screen).unwrap();
        assert_eq!(position.plane, Plane::Coronal);
        assert_eq!(position.point, Point::new(32.0, 45.0));
        assert_eq!(project(&viewer, position.point, Plane::Coronal), Some(screen));
    }

    #[test]
    fn test_set_slice_clamps() {
        let mut viewer = OrthoViewer::new([10, 10, 10]);
        assert!(viewer.set_slice(Plane::Axial, 50));
        assert_eq!(viewer.current_slice(Plane::Axial), 9);
        assert!(!viewer.set_slice(Plane::Axial, 9));
    }

    #[test]
    fn test_scroll_respects_navigation() {
        let mut viewer = OrthoViewer::new([10, 10, 10]);
        assert!(viewer.scroll(Plane::Sagittal, 1));
        assert_eq!(viewer.current_slice(Plane::Sagittal), 6);

        viewer.suspend_navigation();
        assert!(!viewer.scroll(Plane::Sagittal, 1));
        assert_eq!(viewer.current_slice(Plane::Sagittal), 6);

        viewer.resume_navigation();
        assert!(viewer.scroll(Plane::Sagittal, -6));
        assert_eq!(viewer.current_slice(Plane::Sagittal), 0);
    }
}
