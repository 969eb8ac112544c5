//! Pure domain types with minimal dependencies
//!
//! This module contains the annotation data model: geometry, ladder
//! reference data, lane label styles and placed annotations. Types here
//! know nothing about rendering backends or input devices.

pub mod annotation;
pub mod geometry;
pub mod ladder;
pub mod labels;

pub use annotation::*;
pub use geometry::*;
pub use ladder::*;
pub use labels::*;
