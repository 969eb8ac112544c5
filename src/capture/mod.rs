//! Image acquisition
//!
//! The gel raster type and the image provider that decodes files and
//! applies colour transforms.

pub mod image;
