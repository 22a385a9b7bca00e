//! Curve to SVG export module
//!
//! This module reads 2D Bezier curve objects from a scene file and
//! serializes them into an SVG document.

pub mod bounds;
pub mod color;
pub mod number;
pub mod options;
pub mod parser;
pub mod path;
pub mod svg;
pub mod transform;
pub mod types;

// Re-export main public API
pub use bounds::ViewBox;
pub use color::{col_to_hex, to_hex};
pub use options::ExportOptions;
pub use parser::parse_scene;
pub use path::{PathCommand, path_data, spline_to_path};
pub use svg::{Document, SvgNode, curve_to_svg, export_svg};
pub use transform::svg_transform;
pub use types::*;
