//! Raster surface using tiny-skia
//!
//! The baseline frame is a raw pixel buffer; restoring it is a single copy of
//! the pixel data with no image encoding round trip.

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, Path as SkiaPath, PathBuilder, Pixmap, Stroke,
    StrokeDash, Transform,
};

use super::surface::{StrokeStyle, Surface};
use crate::config::ShapeColor;
use crate::domain::{ScreenPoint, ScreenRect};

pub struct PixmapSurface {
    pixmap: Pixmap,
}

fn paint_for(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke_for(style: &StrokeStyle) -> Stroke {
    Stroke {
        width: style.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: style
            .dash
            .and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0)),
        ..Default::default()
    }
}

fn build_polyline(points: &[ScreenPoint], closed: bool) -> Option<SkiaPath> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for point in rest {
        pb.line_to(point.x, point.y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

impl PixmapSurface {
    /// Transparent surface, None for a zero-sized area
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
        })
    }

    /// Surface initialized from a straight-alpha RGBA image
    pub fn from_rgba_image(img: RgbaImage) -> Option<Self> {
        let (w, h) = (img.width(), img.height());
        let mut data = img.into_raw();
        // tiny-skia stores premultiplied pixels
        for px in data.chunks_exact_mut(4) {
            let color = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px.copy_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        let pixmap = Pixmap::from_vec(data, tiny_skia::IntSize::from_wh(w, h)?)?;
        Some(Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA at a pixel, None outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Convert to an RGBA image with straight alpha
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
            .unwrap_or_else(|| RgbaImage::new(self.pixmap.width(), self.pixmap.height()))
    }

    /// Save the current frame as PNG
    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        let img = self.to_rgba_image();
        img.save(path)
            .with_context(|| format!("Failed to save frame to {}", path.display()))?;
        log::debug!(
            "Saved {}x{} frame to {}",
            img.width(),
            img.height(),
            path.display()
        );
        Ok(())
    }
}

impl Surface for PixmapSurface {
    type Frame = Pixmap;

    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: &StrokeStyle) {
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(stroke.color),
            &stroke_for(stroke),
            Transform::identity(),
            None,
        );
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle) {
        let corners = [
            ScreenPoint::new(rect.x, rect.y),
            ScreenPoint::new(rect.x + rect.width, rect.y),
            ScreenPoint::new(rect.x + rect.width, rect.y + rect.height),
            ScreenPoint::new(rect.x, rect.y + rect.height),
        ];
        self.stroke_path(&corners, true, stroke);
    }

    fn stroke_path(&mut self, points: &[ScreenPoint], closed: bool, stroke: &StrokeStyle) {
        let Some(path) = build_polyline(points, closed) else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(stroke.color),
            &stroke_for(stroke),
            Transform::identity(),
            None,
        );
    }

    fn fill_path(&mut self, points: &[ScreenPoint], color: ShapeColor) {
        let Some(path) = build_polyline(points, true) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint_for(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: ShapeColor) {
        let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        else {
            return;
        };
        let mut paint = paint_for(color);
        paint.anti_alias = false;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn snapshot(&self) -> Self::Frame {
        self.pixmap.clone()
    }

    fn restore(&mut self, frame: &Self::Frame) {
        if frame.width() == self.pixmap.width() && frame.height() == self.pixmap.height() {
            self.pixmap.data_mut().copy_from_slice(frame.data());
        } else {
            log::debug!(
                "Baseline size {}x{} differs from surface, replacing",
                frame.width(),
                frame.height()
            );
            self.pixmap = frame.clone();
        }
    }
}
