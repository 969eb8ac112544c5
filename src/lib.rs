//! Interactive annotation engine for gel-electrophoresis images
//!
//! Load a gel photo, place molecular-weight ladders, label lanes, crop and
//! export the result as SVG or PNG.

pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod render;
pub mod session;
pub mod solver;
pub mod transform;

pub use error::GelError;
