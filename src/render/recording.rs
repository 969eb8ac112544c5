//! Structured draw-command recorder
//!
//! Keeps every call made on it as a [`DrawCommand`] so frames can be
//! inspected without rasterizing.

use super::context::{Color, DrawingContext, TextExtents, TextMeasure, TextStyle};
use crate::capture::image::RasterImage;
use crate::domain::Rect;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    Rotate(f64),
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Stroke { color: Color, width: f64 },
    Fill(Color),
    FillRect { rect: Rect, color: Color },
    Text { x: f64, y: f64, text: String, size: f64 },
    Image { x: f64, y: f64, width: u32, height: u32 },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    measure: TextMeasure,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text runs in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl DrawingContext for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(DrawCommand::Scale(sx, sy));
    }

    fn rotate(&mut self, radians: f64) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke { color, width });
    }

    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents {
        self.measure.measure(text, style.size)
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            size: style.size,
        });
    }

    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        self.commands.push(DrawCommand::Image {
            x,
            y,
            width: image.width(),
            height: image.height(),
        });
    }
}
