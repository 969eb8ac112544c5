//! Annotation rendering module
//!
//! This module contains:
//! - The drawing-context capability and shared text measurement
//! - The frame renderer used for screen and export alike
//! - Render targets: tiny-skia pixmap, SVG document, command recorder

pub mod context;
pub mod pixmap;
pub mod recording;
pub mod scene;
pub mod svg;

pub use context::{Color, DrawingContext, HitTest, TextExtents, TextMeasure, TextStyle};
pub use scene::render;
