//! # curve-svg
//!
//! A Rust library for exporting 2D Bezier curve objects to SVG.
//!
//! ## Features
//!
//! - **Path data**: every spline becomes `M`/`C`/`Z` commands, closed splines included
//! - **Materials**: splines are grouped per material and filled with its sRGB color
//! - **Transforms**: object location, rotation and scale become an SVG `transform`
//! - **Fitted viewBox**: computed from the world-space bounding boxes of all objects
//!
//! ## Example
//!
//! ```rust,ignore
//! use curve_svg::curve::{ExportOptions, export_svg, parse_scene};
//!
//! let xml = std::fs::read_to_string("scene.xml").unwrap();
//! let scene = parse_scene(&xml).unwrap();
//! let svg = export_svg(&scene.objects, &ExportOptions::default()).unwrap();
//! std::fs::write("output.svg", svg).unwrap();
//! ```

pub mod curve;
pub mod error;

// Re-export commonly used items
pub use curve::{CurveObject, ExportOptions, Scene, export_svg, parse_scene};
pub use error::{ExportError, ParseError};
