use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, warn};

use super::bounds::ViewBox;
use super::color::material_style;
use super::options::ExportOptions;
use super::path::{PathCommand, path_data, spline_to_path};
use super::transform::svg_transform;
use super::types::CurveObject;
use crate::error::ExportError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
// Spelled like the host's XML library writes it
const XML_DECL: &str = "xml version=\"1.0\" ";
const GENERATOR: &str = concat!(" Generated by curve-svg v", env!("CARGO_PKG_VERSION"), " ");

/// Element of the exported document tree
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Group {
        id: String,
        transform: Option<String>,
        children: Vec<SvgNode>,
    },
    Path {
        id: Option<String>,
        transform: Option<String>,
        style: Option<String>,
        d: String,
    },
}

impl SvgNode {
    pub fn id(&self) -> Option<&str> {
        match self {
            SvgNode::Group { id, .. } => Some(id),
            SvgNode::Path { id, .. } => id.as_deref(),
        }
    }

    pub fn transform(&self) -> Option<&str> {
        match self {
            SvgNode::Group { transform, .. } | SvgNode::Path { transform, .. } => {
                transform.as_deref()
            }
        }
    }
}

/// Convert a curve object to its SVG element.
///
/// Spline commands are grouped by material index in the order the indices
/// first appear. An object with material slots becomes a `<g>` holding one
/// `<path>` per index; an object without slots becomes a single `<path>`
/// drawing the splines of index 0.
pub fn curve_to_svg(obj: &CurveObject, precision: u32) -> SvgNode {
    let mut paths: Vec<(usize, Vec<PathCommand>)> = Vec::new();

    for spline in &obj.splines {
        let d = spline_to_path(spline, precision);
        match paths.iter_mut().find(|(idx, _)| *idx == spline.material_index) {
            Some((_, commands)) => commands.extend(d),
            None => paths.push((spline.material_index, d)),
        }
    }

    let transform = svg_transform(obj.location, obj.rotation_z, obj.scale, precision);
    let transform = (!transform.is_empty()).then_some(transform);

    if !obj.materials.is_empty() {
        let children = paths
            .into_iter()
            .map(|(idx, commands)| {
                let material = match obj.materials.get(idx) {
                    Some(slot) => slot.as_ref(),
                    None => {
                        warn!(
                            object = %obj.name,
                            index = idx,
                            slots = obj.materials.len(),
                            "material index out of range, path left unstyled"
                        );
                        None
                    }
                };

                SvgNode::Path {
                    id: material.map(|m| m.name.clone()),
                    transform: None,
                    style: material.map(material_style),
                    d: path_data(&commands),
                }
            })
            .collect();

        return SvgNode::Group {
            id: obj.name.clone(),
            transform,
            children,
        };
    }

    if paths.iter().any(|(idx, _)| *idx != 0) {
        debug!(
            object = %obj.name,
            "object has no materials, only splines of material index 0 are written"
        );
    }

    let d = paths
        .iter()
        .find(|(idx, _)| *idx == 0)
        .map(|(_, commands)| path_data(commands))
        .unwrap_or_default();

    SvgNode::Path {
        id: Some(obj.name.clone()),
        transform,
        style: None,
        d,
    }
}

/// SVG document under construction. One instance per export.
#[derive(Debug, Clone)]
pub struct Document {
    options: ExportOptions,
    view_box: ViewBox,
    elements: Vec<SvgNode>,
}

impl Document {
    pub fn new(options: ExportOptions) -> Result<Self, ExportError> {
        options.validate()?;
        Ok(Self {
            options,
            view_box: ViewBox::new(),
            elements: Vec::new(),
        })
    }

    /// Add an object's element and widen the document box around it
    pub fn add_object(&mut self, obj: &CurveObject) {
        let precision = self.options.precision;
        debug!(object = %obj.name, splines = obj.splines.len(), "exporting curve");

        self.elements.push(curve_to_svg(obj, precision));
        self.view_box.update(&obj.world_corners(), precision);
    }

    pub fn elements(&self) -> &[SvgNode] {
        &self.elements
    }

    /// Document box in output pixels
    pub fn view_box(&self) -> ViewBox {
        self.view_box
            .scaled(self.options.scale as f64, self.options.precision)
    }

    /// Serialize the document, pretty-printed with 2-space indentation or
    /// on a single line when minifying
    pub fn to_svg(&self) -> Result<String, ExportError> {
        let mut writer = if self.options.minify {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        };

        let decl = BytesDecl::from_start(BytesStart::from_content(XML_DECL, 3));
        writer.write_event(Event::Decl(decl))?;

        let view_box = self.view_box().to_attribute(self.options.precision);
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NS));
        svg.push_attribute(("version", "1.1"));
        svg.push_attribute(("viewBox", view_box.as_str()));
        writer.write_event(Event::Start(svg))?;
        writer.write_event(Event::Comment(BytesText::from_escaped(GENERATOR)))?;

        // The scene is Y-up, SVG is Y-down
        let flip = format!("scale({0} -{0})", self.options.scale);
        let mut container = BytesStart::new("g");
        container.push_attribute(("transform", flip.as_str()));

        if self.elements.is_empty() {
            writer.write_event(Event::Empty(container))?;
        } else {
            writer.write_event(Event::Start(container))?;
            for node in &self.elements {
                write_node(&mut writer, node)?;
            }
            writer.write_event(Event::End(BytesEnd::new("g")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("svg")))?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &SvgNode) -> Result<(), ExportError> {
    match node {
        SvgNode::Group {
            id,
            transform,
            children,
        } => {
            let mut el = BytesStart::new("g");
            el.push_attribute(("id", id.as_str()));
            if let Some(t) = transform {
                el.push_attribute(("transform", t.as_str()));
            }

            if children.is_empty() {
                writer.write_event(Event::Empty(el))?;
                return Ok(());
            }

            writer.write_event(Event::Start(el))?;
            for child in children {
                write_node(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new("g")))?;
        }
        SvgNode::Path {
            id,
            transform,
            style,
            d,
        } => {
            let mut el = BytesStart::new("path");
            if let Some(id) = id {
                el.push_attribute(("id", id.as_str()));
            }
            if let Some(t) = transform {
                el.push_attribute(("transform", t.as_str()));
            }
            if let Some(style) = style {
                el.push_attribute(("style", style.as_str()));
            }
            el.push_attribute(("d", d.as_str()));
            writer.write_event(Event::Empty(el))?;
        }
    }
    Ok(())
}

/// Export every 2D curve among `objects` into one SVG document string
pub fn export_svg(objects: &[CurveObject], options: &ExportOptions) -> Result<String, ExportError> {
    let mut doc = Document::new(*options)?;

    for obj in objects {
        if !obj.is_2d() {
            debug!(object = %obj.name, "skipping 3D curve");
            continue;
        }
        doc.add_object(obj);
    }

    doc.to_svg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::types::{BezierPoint, Dimensions, Material, Spline, Vec3};

    fn square(material_index: usize) -> Spline {
        Spline {
            bezier_points: vec![
                BezierPoint::new(0.0, 0.0),
                BezierPoint::new(1.0, 0.0),
                BezierPoint::new(1.0, 1.0),
                BezierPoint::new(0.0, 1.0),
            ],
            material_index,
            cyclic: true,
        }
    }

    fn material(name: &str, rgb: [f64; 3]) -> Option<Material> {
        Some(Material {
            name: name.to_string(),
            diffuse_color: rgb,
        })
    }

    #[test]
    fn test_object_without_materials_is_single_path() {
        let mut obj = CurveObject::new("Square");
        obj.splines.push(square(0));

        match curve_to_svg(&obj, 4) {
            SvgNode::Path {
                id,
                transform,
                style,
                d,
            } => {
                assert_eq!(id.as_deref(), Some("Square"));
                assert_eq!(transform, None);
                assert_eq!(style, None);
                assert!(d.starts_with("M 0,0 C"));
                assert!(d.ends_with(" Z"));
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_object_without_materials_or_splines_keeps_path() {
        let obj = CurveObject::new("Empty");
        let node = curve_to_svg(&obj, 4);
        assert_eq!(
            node,
            SvgNode::Path {
                id: Some("Empty".to_string()),
                transform: None,
                style: None,
                d: String::new(),
            }
        );
    }

    #[test]
    fn test_splines_sharing_index_are_concatenated() {
        let mut obj = CurveObject::new("Two");
        obj.splines.push(square(0));
        obj.splines.push(Spline {
            bezier_points: vec![BezierPoint::new(5.0, 5.0)],
            material_index: 0,
            cyclic: false,
        });

        let SvgNode::Path { d, .. } = curve_to_svg(&obj, 4) else {
            panic!("expected path");
        };
        assert_eq!(d.matches('M').count(), 2);
        assert!(d.ends_with("Z M 5,5"));
    }

    #[test]
    fn test_materials_make_group_in_encounter_order() {
        let mut obj = CurveObject::new("Colored");
        obj.materials.push(material("Red", [1.0, 0.0, 0.0]));
        obj.materials.push(material("Blue", [0.0, 0.0, 1.0]));
        obj.splines.push(square(1));
        obj.splines.push(square(0));
        obj.splines.push(square(1));

        let SvgNode::Group { id, children, .. } = curve_to_svg(&obj, 4) else {
            panic!("expected group");
        };
        assert_eq!(id, "Colored");
        assert_eq!(children.len(), 2);

        let SvgNode::Path { id, style, d, .. } = &children[0] else {
            panic!("expected path");
        };
        assert_eq!(id.as_deref(), Some("Blue"));
        assert_eq!(style.as_deref(), Some("fill: #0000ff"));
        assert_eq!(d.matches('Z').count(), 2);

        assert_eq!(children[1].id(), Some("Red"));
    }

    #[test]
    fn test_missing_material_leaves_path_unstyled() {
        let mut obj = CurveObject::new("Slots");
        obj.materials.push(None);
        obj.materials.push(material("Green", [0.0, 1.0, 0.0]));
        obj.splines.push(square(0));
        obj.splines.push(square(1));
        obj.splines.push(square(7));

        let SvgNode::Group { children, .. } = curve_to_svg(&obj, 4) else {
            panic!("expected group");
        };
        assert_eq!(children.len(), 3);
        for idx in [0, 2] {
            let SvgNode::Path { id, style, d, .. } = &children[idx] else {
                panic!("expected path");
            };
            assert_eq!(*id, None);
            assert_eq!(*style, None);
            assert!(!d.is_empty());
        }
        assert_eq!(children[1].id(), Some("Green"));
    }

    #[test]
    fn test_group_carries_object_transform() {
        let mut obj = CurveObject::new("Moved");
        obj.materials.push(material("Red", [1.0, 0.0, 0.0]));
        obj.splines.push(square(0));
        obj.location = Vec3::new(2.0, 3.0, 0.0);

        let node = curve_to_svg(&obj, 4);
        assert_eq!(node.transform(), Some("translate(2 3)"));
        let SvgNode::Group { children, .. } = node else {
            panic!("expected group");
        };
        assert_eq!(children[0].transform(), None);
    }

    #[test]
    fn test_document_view_box() {
        let mut obj = CurveObject::new("Square");
        obj.splines.push(square(0));

        let mut doc = Document::new(ExportOptions::default()).unwrap();
        doc.add_object(&obj);
        assert_eq!(doc.elements().len(), 1);
        assert_eq!(doc.view_box().to_attribute(4), "0 -10 10 10");
    }

    #[test]
    fn test_document_rejects_invalid_options() {
        let opts = ExportOptions {
            precision: 30,
            ..Default::default()
        };
        assert!(Document::new(opts).is_err());
    }

    #[test]
    fn test_pretty_output_layout() {
        let mut obj = CurveObject::new("Line");
        obj.splines.push(Spline {
            bezier_points: vec![BezierPoint::new(0.0, 0.0), BezierPoint::new(1.0, 0.0)],
            material_index: 0,
            cyclic: false,
        });
        let opts = ExportOptions {
            scale: 1,
            ..Default::default()
        };

        let svg = export_svg(&[obj], &opts).unwrap();
        let lines: Vec<&str> = svg.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" ?>"#);
        assert_eq!(
            lines[1],
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 1 0">"#
        );
        assert!(lines[2].starts_with("  <!-- Generated by curve-svg v"));
        assert_eq!(lines[3], r#"  <g transform="scale(1 -1)">"#);
        assert_eq!(lines[4], r#"    <path id="Line" d="M 0,0 C 0,0 1,0 1,0"/>"#);
        assert_eq!(lines[5], "  </g>");
        assert_eq!(lines[6], "</svg>");
    }

    #[test]
    fn test_minified_output_is_one_line() {
        let mut obj = CurveObject::new("Square");
        obj.splines.push(square(0));
        let opts = ExportOptions {
            minify: true,
            ..Default::default()
        };

        let svg = export_svg(&[obj], &opts).unwrap();
        assert!(!svg.contains('\n'));
        assert!(svg.starts_with(r#"<?xml version="1.0" ?><svg "#));
        assert!(svg.contains(r#"<g transform="scale(10 -10)"><path id="Square" d="M 0,0"#));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn test_export_skips_3d_curves() {
        let mut flat = CurveObject::new("Flat");
        flat.splines.push(square(0));
        let mut solid = CurveObject::new("Solid");
        solid.dimensions = Dimensions::ThreeD;
        solid.splines.push(square(0));

        let svg = export_svg(&[flat, solid], &ExportOptions::default()).unwrap();
        assert!(svg.contains(r#"id="Flat""#));
        assert!(!svg.contains(r#"id="Solid""#));
    }

    #[test]
    fn test_export_without_objects() {
        let svg = export_svg(&[], &ExportOptions::default()).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 0 0""#));
        assert!(svg.contains(r#"<g transform="scale(10 -10)"/>"#));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut obj = CurveObject::new("A&B <\"x\">");
        obj.splines.push(square(0));
        let svg = export_svg(&[obj], &ExportOptions::default()).unwrap();
        assert!(svg.contains(r#"id="A&amp;B &lt;&quot;x&quot;&gt;""#));
    }
}
