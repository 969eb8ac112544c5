//! SVG vector export surface
//!
//! Paths are flattened into device coordinates as they are built; text and
//! images keep the current matrix as an SVG `transform` so they stay
//! editable in vector tools.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use base64::Engine;

use super::context::{
    Color, DrawingContext, TextExtents, TextMeasure, TextStyle, TransformStack,
};
use crate::capture::image::RasterImage;
use crate::domain::Rect;
use crate::error::ExportError;
use crate::export::encode_png;
use crate::transform::Affine;

#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    view_box: Rect,
    elements: Vec<String>,
    path: String,
    stack: TransformStack,
    measure: TextMeasure,
}

impl SvgSurface {
    /// Surface covering a `width` x `height` device viewport
    pub fn new(width: f64, height: f64, measure: TextMeasure) -> Self {
        Self {
            width,
            height,
            view_box: Rect::from_xywh(0.0, 0.0, width, height),
            elements: Vec::new(),
            path: String::new(),
            stack: TransformStack::default(),
            measure,
        }
    }

    /// Restrict the visible document to `region` (device coordinates)
    pub fn set_view_box(&mut self, region: Rect) {
        self.view_box = region;
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the document
    pub fn finish(&self) -> String {
        let vb = self.view_box;
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            r#"<svg width="{:.3}" height="{:.3}" viewBox="{:.3} {:.3} {:.3} {:.3}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
            vb.width(),
            vb.height(),
            vb.left,
            vb.top,
            vb.width(),
            vb.height()
        );
        for element in &self.elements {
            let _ = writeln!(out, "  {}", element);
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), ExportError> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(self.finish().as_bytes())?;
        Ok(())
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        self.stack.apply(x, y)
    }

    fn take_path(&mut self) -> Option<String> {
        let d = std::mem::take(&mut self.path);
        let d = d.trim().to_string();
        (!d.is_empty()).then_some(d)
    }
}

fn paint(color: Color) -> String {
    let [r, g, b, _] = color.to_rgba_u8();
    if color.a >= 1.0 {
        format!("rgb({},{},{})", r, g, b)
    } else {
        format!("rgba({},{},{},{:.3})", r, g, b, color.a)
    }
}

fn matrix(m: &Affine) -> String {
    format!(
        "matrix({:.6} {:.6} {:.6} {:.6} {:.3} {:.3})",
        m.a, m.b, m.c, m.d, m.e, m.f
    )
}

/// Escape text for use inside an XML element or attribute
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl DrawingContext for SvgSurface {
    fn clear(&mut self, color: Color) {
        self.elements.clear();
        self.path.clear();
        self.elements.push(format!(
            r#"<rect x="0" y="0" width="{:.3}" height="{:.3}" fill="{}"/>"#,
            self.width,
            self.height,
            paint(color)
        ));
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
        let (x, y) = self.point(x, y);
        let _ = write!(self.path, "M {:.3} {:.3} ", x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.point(x, y);
        let _ = write!(self.path, "L {:.3} {:.3} ", x, y);
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    fn stroke(&mut self, color: Color, width: f64) {
        if let Some(d) = self.take_path() {
            self.elements.push(format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.3}"/>"#,
                d,
                paint(color),
                width * self.stack.line_scale()
            ));
        }
    }

    fn fill(&mut self, color: Color) {
        if let Some(d) = self.take_path() {
            self.elements
                .push(format!(r#"<path d="{}" fill="{}"/>"#, d, paint(color)));
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let [a, b, c, d] = rect.corners();
        self.path.clear();
        self.move_to(a.x, a.y);
        self.line_to(b.x, b.y);
        self.line_to(c.x, c.y);
        self.line_to(d.x, d.y);
        self.close_path();
        self.fill(color);
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents {
        self.measure.measure(text, style.size)
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.elements.push(format!(
            r#"<text transform="{}" x="{:.3}" y="{:.3}" font-family="{}" font-size="{:.3}" font-style="{}" font-weight="{}" fill="{}">{}</text>"#,
            matrix(&self.stack.current),
            x,
            y,
            escape_xml(&style.font.family),
            style.size,
            style.font.slant.css(),
            style.font.weight.css(),
            paint(style.color),
            escape_xml(text)
        ));
    }

    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        let png = match encode_png(image.width(), image.height(), image.rgba.as_raw()) {
            Ok(png) => png,
            Err(err) => {
                log::error!("Failed to embed image in SVG: {}", err);
                return;
            }
        };
        let data = base64::engine::general_purpose::STANDARD.encode(png);
        self.elements.push(format!(
            r#"<image transform="{}" x="{:.3}" y="{:.3}" width="{}" height="{}" xlink:href="data:image/png;base64,{}"/>"#,
            matrix(&self.stack.current),
            x,
            y,
            image.width(),
            image.height(),
            data
        ));
    }
}
