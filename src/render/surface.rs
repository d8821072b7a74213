//! Drawing surface abstraction
//!
//! A surface is a 2D stroke/fill target that can snapshot a full frame and
//! restore it later. The render pipeline keeps its baseline as such a frame.

use crate::config::ShapeColor;
use crate::domain::{ScreenPoint, ScreenRect};

/// Stroke parameters for outlines and markers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: ShapeColor,
    pub width: f32,
    /// Dash pattern (on, off) in pixels, solid if None
    pub dash: Option<[f32; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: ShapeColor, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: ShapeColor, width: f32, dash: [f32; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// 2D drawing target
pub trait Surface {
    /// Captured full frame
    type Frame: Clone;

    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Erase everything to transparent
    fn clear(&mut self);

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: &StrokeStyle);

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle);

    /// Stroke a polyline, joining the last point back to the first if `closed`
    fn stroke_path(&mut self, points: &[ScreenPoint], closed: bool, stroke: &StrokeStyle);

    /// Fill the closed polygon through `points`
    fn fill_path(&mut self, points: &[ScreenPoint], color: ShapeColor);

    fn fill_rect(&mut self, rect: ScreenRect, color: ShapeColor);

    /// Capture the current frame
    fn snapshot(&self) -> Self::Frame;

    /// Overwrite the whole surface with a captured frame
    fn restore(&mut self, frame: &Self::Frame);
}

/// One recorded drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    StrokeCircle {
        center: ScreenPoint,
        radius: f32,
        stroke: StrokeStyle,
    },
    StrokeRect {
        rect: ScreenRect,
        stroke: StrokeStyle,
    },
    StrokePath {
        points: Vec<ScreenPoint>,
        closed: bool,
        stroke: StrokeStyle,
    },
    FillPath {
        points: Vec<ScreenPoint>,
        color: ShapeColor,
    },
    FillRect {
        rect: ScreenRect,
        color: ShapeColor,
    },
}

/// Vector surface that records draw commands instead of rasterizing them.
///
/// Hosts that paint with their own canvas replay [`DisplayList::commands`]
/// after each event. Frames are command lists, so restoring is exact.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Commands drawn since the last clear or restore
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Check if `expected` appears as a contiguous run of commands
    pub fn contains_run(&self, expected: &[DrawCommand]) -> bool {
        expected.is_empty()
            || self
                .commands
                .windows(expected.len())
                .any(|window| window == expected)
    }
}

impl Surface for DisplayList {
    type Frame = Vec<DrawCommand>;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: *stroke,
        });
    }

    fn stroke_path(&mut self, points: &[ScreenPoint], closed: bool, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePath {
            points: points.to_vec(),
            closed,
            stroke: *stroke,
        });
    }

    fn fill_path(&mut self, points: &[ScreenPoint], color: ShapeColor) {
        self.commands.push(DrawCommand::FillPath {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: ShapeColor) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn snapshot(&self) -> Self::Frame {
        self.commands.clone()
    }

    fn restore(&mut self, frame: &Self::Frame) {
        self.commands.clone_from(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_restore() {
        let mut list = DisplayList::new(10, 10);
        list.fill_rect(ScreenRect::new(0.0, 0.0, 10.0, 10.0), ShapeColor::rgb8(1, 2, 3));
        let frame = list.snapshot();

        let stroke = StrokeStyle::solid(ShapeColor::rgb8(0, 0, 0), 1.0);
        list.stroke_circle(ScreenPoint::new(5.0, 5.0), 2.0, &stroke);
        assert_eq!(list.commands().len(), 2);

        list.restore(&frame);
        list.restore(&frame);
        assert_eq!(list.commands(), frame.as_slice());
    }

    #[test]
    fn test_contains_run() {
        let mut list = DisplayList::new(10, 10);
        let stroke = StrokeStyle::solid(ShapeColor::rgb8(0, 0, 0), 1.0);
        let a = ScreenPoint::new(1.0, 1.0);
        let b = ScreenPoint::new(2.0, 2.0);
        list.stroke_circle(a, 1.0, &stroke);
        list.stroke_circle(b, 1.0, &stroke);

        let run = [
            DrawCommand::StrokeCircle {
                center: a,
                radius: 1.0,
                stroke,
            },
            DrawCommand::StrokeCircle {
                center: b,
                radius: 1.0,
                stroke,
            },
        ];
        assert!(list.contains_run(&run));
        assert!(!list.contains_run(&[run[1].clone(), run[0].clone()]));
    }
}
