//! Viewer collaborator and coordinate mapping
//!
//! The overlay never owns slice, pan or zoom state. It reads them through the
//! [`Viewer`] trait on every call, so projections are never cached.

pub mod ortho;

pub use ortho::{OrthoViewer, Viewport};

use crate::domain::{Plane, Point, ScreenPoint, VolumePoint};

/// Multi-planar image viewer hosting the overlay
pub trait Viewer {
    /// Slice index currently displayed on `plane`
    fn current_slice(&self, plane: Plane) -> usize;

    /// Project a volumetric point onto `plane`'s screen pixels.
    /// Only the two in-plane axes of `point` are meaningful.
    fn to_screen(&self, point: VolumePoint, plane: Plane) -> Option<ScreenPoint>;

    /// Plane whose pane contains the screen position
    fn plane_at(&self, screen: ScreenPoint) -> Option<Plane>;

    /// Volumetric point under the screen position
    fn to_volume(&self, screen: ScreenPoint) -> Option<VolumePoint>;

    /// Disable the viewer's own scroll, pan and crosshair handling
    fn suspend_navigation(&mut self);

    /// Re-enable the viewer's own navigation
    fn resume_navigation(&mut self);
}

/// Pointer position resolved against the viewer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanePosition {
    pub plane: Plane,
    /// Slice displayed on `plane` when resolved
    pub slice: usize,
    /// Plane-local volumetric point
    pub point: Point,
    pub screen: ScreenPoint,
}

/// Project a plane-local point onto `plane`'s screen pixels
pub fn project<V: Viewer + ?Sized>(viewer: &V, point: Point, plane: Plane) -> Option<ScreenPoint> {
    let depth = viewer.current_slice(plane) as f32;
    viewer.to_screen(plane.lift(point, depth), plane)
}

/// Project several points, failing if any of them cannot be projected
pub fn project_all<V: Viewer + ?Sized>(
    viewer: &V,
    points: &[Point],
    plane: Plane,
) -> Option<Vec<ScreenPoint>> {
    points
        .iter()
        .map(|point| project(viewer, *point, plane))
        .collect()
}

/// Resolve a screen position to its plane and plane-local point
pub fn resolve<V: Viewer + ?Sized>(viewer: &V, screen: ScreenPoint) -> Option<PlanePosition> {
    let plane = viewer.plane_at(screen)?;
    let volume = viewer.to_volume(screen)?;
    Some(PlanePosition {
        plane,
        slice: viewer.current_slice(plane),
        point: plane.flatten(volume),
        screen,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Viewer that reports the raw volumetric axes it is asked to project
    struct StubViewer {
        seen: RefCell<Vec<(VolumePoint, Plane)>>,
    }

    impl Viewer for StubViewer {
        fn current_slice(&self, _plane: Plane) -> usize {
            99
        }

        fn to_screen(&self, point: VolumePoint, plane: Plane) -> Option<ScreenPoint> {
            self.seen.borrow_mut().push((point, plane));
            let local = plane.flatten(point);
            Some(ScreenPoint::new(local.x, local.y))
        }

        fn plane_at(&self, _screen: ScreenPoint) -> Option<Plane> {
            None
        }

        fn to_volume(&self, _screen: ScreenPoint) -> Option<VolumePoint> {
            None
        }

        fn suspend_navigation(&mut self) {}

        fn resume_navigation(&mut self) {}
    }

    fn stub() -> StubViewer {
        StubViewer {
            seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_axial_projection_uses_x_y() {
        let viewer = stub();
        let screen = project(&viewer, Point::new(10.0, 20.0), Plane::Axial).unwrap();
        assert_eq!(screen, ScreenPoint::new(10.0, 20.0));
        let (volume, plane) = viewer.seen.borrow()[0];
        assert_eq!(plane, Plane::Axial);
        assert_eq!((volume.x, volume.y), (10.0, 20.0));
    }

    #[test]
    fn test_coronal_projection_uses_x_z() {
        let viewer = stub();
        project(&viewer, Point::new(10.0, 20.0), Plane::Coronal).unwrap();
        let (volume, plane) = viewer.seen.borrow()[0];
        assert_eq!(plane, Plane::Coronal);
        assert_eq!((volume.x, volume.z), (10.0, 20.0));
        assert_eq!(volume.y, 99.0);
    }

    #[test]
    fn test_sagittal_projection_uses_y_z() {
        let viewer = stub();
        project(&viewer, Point::new(10.0, 20.0), Plane::Sagittal).unwrap();
        let (volume, plane) = viewer.seen.borrow()[0];
        assert_eq!(plane, Plane::Sagittal);
        assert_eq!((volume.y, volume.z), (10.0, 20.0));
        assert_eq!(volume.x, 99.0);
    }

    #[test]
    fn test_projection_is_never_cached() {
        let viewer = stub();
        project(&viewer, Point::new(1.0, 1.0), Plane::Axial);
        project(&viewer, Point::new(1.0, 1.0), Plane::Axial);
        assert_eq!(viewer.seen.borrow().len(), 2);
    }

    #[test]
    fn test_resolve_without_plane_is_none() {
        assert!(resolve(&stub(), ScreenPoint::new(5.0, 5.0)).is_none());
    }
}
