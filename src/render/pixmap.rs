//! Raster surface using tiny-skia
//!
//! Used for the raster export and for anything that wants pixels of a
//! rendered frame. Glyphs come from rusttype outlines filled as paths, so
//! text follows rotation and zoom like every other primitive.

use image::RgbaImage;
use rusttype::{OutlineBuilder, Scale, point};
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use super::context::{
    Color, DrawingContext, TextExtents, TextMeasure, TextStyle, TransformStack,
};
use crate::capture::image::RasterImage;
use crate::domain::Rect;
use crate::error::ExportError;
use crate::transform::Affine;

pub struct PixmapSurface {
    pixmap: Pixmap,
    path: PathBuilder,
    stack: TransformStack,
    measure: TextMeasure,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

fn to_skia(m: &Affine) -> Transform {
    Transform::from_row(
        m.a as f32, m.b as f32, m.c as f32, m.d as f32, m.e as f32, m.f as f32,
    )
}

fn solid(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Feeds rusttype glyph outlines into a tiny-skia path
struct GlyphPath<'a>(&'a mut PathBuilder);

impl OutlineBuilder for GlyphPath<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32, measure: TextMeasure) -> Result<Self, ExportError> {
        let pixmap = Pixmap::new(width, height).ok_or(ExportError::Surface { width, height })?;
        Ok(Self {
            pixmap,
            path: PathBuilder::new(),
            stack: TransformStack::default(),
            measure,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Copy the surface out as straight (non-premultiplied) RGBA
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(self.width(), self.height(), data)
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }
}

impl DrawingContext for PixmapSurface {
    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba_u8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        self.path = PathBuilder::new();
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.stack.translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.stack.scale(sx, sy);
    }

    fn rotate(&mut self, radians: f64) {
        self.stack.rotate(radians);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.stack.apply(x, y);
        self.path.move_to(x as f32, y as f32);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.stack.apply(x, y);
        self.path.line_to(x as f32, y as f32);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn stroke(&mut self, color: Color, width: f64) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width: (width * self.stack.line_scale()) as f32,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
    }

    fn fill(&mut self, color: Color) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        let Some(path) = builder.finish() else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &solid(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let Some(r) = tiny_skia::Rect::from_ltrb(
            rect.left as f32,
            rect.top as f32,
            rect.right as f32,
            rect.bottom as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        self.pixmap.fill_path(
            &path,
            &solid(color),
            FillRule::Winding,
            to_skia(&self.stack.current),
            None,
        );
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents {
        self.measure.measure(text, style.size)
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let Some(font) = self.measure.font() else {
            log::debug!("No font loaded, skipping text '{}'", text);
            return;
        };
        let mut builder = PathBuilder::new();
        for glyph in font.layout(text, Scale::uniform(style.size as f32), point(0.0, 0.0)) {
            glyph.build_outline(&mut GlyphPath(&mut builder));
        }
        let Some(path) = builder.finish() else {
            return;
        };
        let transform = to_skia(&self.stack.current.then_apply(Affine::translation(x, y)));
        self.pixmap
            .fill_path(&path, &solid(style.color), FillRule::Winding, transform, None);
    }

    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        let Some(size) = IntSize::from_wh(image.width(), image.height()) else {
            return;
        };
        // Opaque rasters are already premultiplied
        let Some(src) = Pixmap::from_vec(image.rgba.as_raw().clone(), size) else {
            return;
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        let transform = to_skia(&self.stack.current.then_apply(Affine::translation(x, y)));
        self.pixmap
            .draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_under_transform() {
        let mut surface = PixmapSurface::new(20, 20, TextMeasure::approximate()).unwrap();
        surface.clear(Color::WHITE);
        surface.translate(10.0, 10.0);
        surface.scale(2.0, 2.0);
        surface.fill_rect(Rect::from_xywh(0.0, 0.0, 2.0, 2.0), Color::BLACK);

        let img = surface.to_rgba_image();
        assert_eq!(img.get_pixel(12, 12).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(15, 15).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_draw_image_blits_pixels() {
        let mut rgba = RgbaImage::new(4, 4);
        for p in rgba.pixels_mut() {
            p.0 = [255, 0, 0, 255];
        }
        let raster = RasterImage::new(rgba);

        let mut surface = PixmapSurface::new(10, 10, TextMeasure::approximate()).unwrap();
        surface.clear(Color::WHITE);
        surface.draw_image(&raster, 3.0, 3.0);
        let img = surface.to_rgba_image();
        assert_eq!(img.get_pixel(4, 4).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(8, 8).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_size_surface_is_an_error() {
        assert!(matches!(
            PixmapSurface::new(0, 10, TextMeasure::approximate()),
            Err(ExportError::Surface { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_stroke_consumes_path() {
        let mut surface = PixmapSurface::new(10, 10, TextMeasure::approximate()).unwrap();
        surface.clear(Color::WHITE);
        surface.move_to(0.0, 5.0);
        surface.line_to(10.0, 5.0);
        surface.stroke(Color::BLACK, 2.0);
        // A second stroke has no path left to draw
        surface.stroke(Color::rgb(1.0, 0.0, 0.0), 2.0);
        let img = surface.to_rgba_image();
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0, 255]);
    }
}
