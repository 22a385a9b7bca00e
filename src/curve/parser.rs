//! Scene file parser.
//!
//! A scene file is an XML snapshot of the host's selected objects. Every
//! value lives in attributes:
//!
//! ```xml
//! <Scene>
//!   <Object Name="Shape" Type="CURVE" Dimensions="2D">
//!     <Location X="0" Y="0" Z="0"/>
//!     <Rotation Z="0.5"/>
//!     <Scale X="1" Y="1" Z="1"/>
//!     <MatrixWorld Values="1 0 0 0  0 1 0 0  0 0 1 0  0 0 0 1"/>
//!     <BoundBox Corners="24 numbers"/>
//!     <Material Name="Red" R="0.8" G="0" B="0"/>
//!     <Material/>
//!     <Spline MaterialIndex="0" Cyclic="1">
//!       <Point Co="0 0" Left="-1 0" Right="1 0" LeftType="ALIGNED" RightType="ALIGNED"/>
//!     </Spline>
//!   </Object>
//! </Scene>
//! ```

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info};

use super::types::*;
use crate::error::ParseError;

type Attrs = HashMap<String, String>;

fn xml_error(reader: &Reader<&[u8]>, source: quick_xml::Error) -> ParseError {
    ParseError::Xml {
        position: reader.buffer_position(),
        source,
    }
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Collect an element's attributes with entities resolved
fn attributes(e: &BytesStart) -> Result<Attrs, ParseError> {
    let mut attrs = HashMap::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|source| ParseError::Attribute {
            element: tag_name(e),
            source,
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map_err(|source| ParseError::Escape {
                element: tag_name(e),
                source,
            })?
            .into_owned();
        attrs.insert(key, value);
    }

    Ok(attrs)
}

fn number(element: &str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber {
            element: element.to_string(),
            value: value.to_string(),
        })
}

fn numbers(element: &str, value: &str) -> Result<Vec<f64>, ParseError> {
    value
        .split_whitespace()
        .map(|s| number(element, s))
        .collect()
}

fn number_attr(attrs: &Attrs, element: &str, key: &str, default: f64) -> Result<f64, ParseError> {
    match attrs.get(key) {
        Some(value) => number(element, value),
        None => Ok(default),
    }
}

fn vec3_attrs(attrs: &Attrs, element: &str, default: f64) -> Result<Vec3, ParseError> {
    Ok(Vec3::new(
        number_attr(attrs, element, "X", default)?,
        number_attr(attrs, element, "Y", default)?,
        number_attr(attrs, element, "Z", default)?,
    ))
}

/// Parse "x y" (or "x y z", the z is dropped)
fn point_attr(attrs: &Attrs, key: &'static str) -> Result<Option<Vec2>, ParseError> {
    let Some(value) = attrs.get(key) else {
        return Ok(None);
    };
    let parts = numbers("Point", value)?;
    if parts.len() != 2 && parts.len() != 3 {
        return Err(ParseError::WrongArity {
            element: "Point",
            expected: 2,
            found: parts.len(),
        });
    }
    Ok(Some(Vec2::new(parts[0], parts[1])))
}

fn handle_type_attr(attrs: &Attrs, key: &str) -> Result<HandleType, ParseError> {
    match attrs.get(key) {
        Some(name) => {
            HandleType::from_name(name).ok_or_else(|| ParseError::UnknownHandleType(name.clone()))
        }
        None => Ok(HandleType::default()),
    }
}

fn flag_attr(attrs: &Attrs, element: &'static str, key: &'static str) -> Result<bool, ParseError> {
    match attrs.get(key).map(|v| v.trim()) {
        None | Some("0" | "false" | "False") => Ok(false),
        Some("1" | "true" | "True") => Ok(true),
        Some(other) => Err(ParseError::InvalidFlag {
            element,
            key,
            value: other.to_string(),
        }),
    }
}

fn parse_point(e: &BytesStart) -> Result<BezierPoint, ParseError> {
    let attrs = attributes(e)?;
    let co = point_attr(&attrs, "Co")?.unwrap_or_default();

    Ok(BezierPoint {
        co,
        handle_left: point_attr(&attrs, "Left")?.unwrap_or(co),
        handle_right: point_attr(&attrs, "Right")?.unwrap_or(co),
        handle_left_type: handle_type_attr(&attrs, "LeftType")?,
        handle_right_type: handle_type_attr(&attrs, "RightType")?,
    })
}

fn spline_header(e: &BytesStart) -> Result<Spline, ParseError> {
    let attrs = attributes(e)?;
    let material_index = match attrs.get("MaterialIndex") {
        Some(value) => value.trim().parse().map_err(|_| ParseError::InvalidNumber {
            element: "Spline".to_string(),
            value: value.clone(),
        })?,
        None => 0,
    };

    Ok(Spline {
        bezier_points: Vec::new(),
        material_index,
        cyclic: flag_attr(&attrs, "Spline", "Cyclic")?,
    })
}

/// Read the points of a `<Spline>` up to its closing tag
fn parse_spline_inner(reader: &mut Reader<&[u8]>, mut spline: Spline) -> Result<Spline, ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                if e.name().as_ref() == b"Point" {
                    spline.bezier_points.push(parse_point(e)?);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"Point" {
                    spline.bezier_points.push(parse_point(e)?);
                }
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(spline)
}

fn parse_material(e: &BytesStart) -> Result<Option<Material>, ParseError> {
    let attrs = attributes(e)?;
    let Some(name) = attrs.get("Name") else {
        return Ok(None);
    };

    Ok(Some(Material {
        name: name.clone(),
        diffuse_color: [
            number_attr(&attrs, "Material", "R", 0.8)?,
            number_attr(&attrs, "Material", "G", 0.8)?,
            number_attr(&attrs, "Material", "B", 0.8)?,
        ],
    }))
}

/// Apply a leaf child of `<Object>` (everything but `<Spline>`)
fn apply_object_child(obj: &mut CurveObject, e: &BytesStart) -> Result<(), ParseError> {
    match e.name().as_ref() {
        b"Location" => obj.location = vec3_attrs(&attributes(e)?, "Location", 0.0)?,
        b"Rotation" => obj.rotation_z = number_attr(&attributes(e)?, "Rotation", "Z", 0.0)?,
        b"Scale" => obj.scale = vec3_attrs(&attributes(e)?, "Scale", 1.0)?,
        b"MatrixWorld" => {
            let attrs = attributes(e)?;
            let values = numbers("MatrixWorld", attrs.get("Values").map_or("", String::as_str))?;
            if values.len() != 16 {
                return Err(ParseError::WrongArity {
                    element: "MatrixWorld",
                    expected: 16,
                    found: values.len(),
                });
            }
            for (i, v) in values.into_iter().enumerate() {
                obj.matrix_world.rows[i / 4][i % 4] = v;
            }
        }
        b"BoundBox" => {
            let attrs = attributes(e)?;
            let values = numbers("BoundBox", attrs.get("Corners").map_or("", String::as_str))?;
            if values.len() != 24 {
                return Err(ParseError::WrongArity {
                    element: "BoundBox",
                    expected: 24,
                    found: values.len(),
                });
            }
            let mut corners = [Vec3::default(); 8];
            for (corner, xyz) in corners.iter_mut().zip(values.chunks_exact(3)) {
                *corner = Vec3::new(xyz[0], xyz[1], xyz[2]);
            }
            obj.bound_box = Some(corners);
        }
        b"Material" => obj.materials.push(parse_material(e)?),
        b"Point" => {
            return Err(ParseError::Misplaced {
                element: "Point".to_string(),
                parent: "Spline",
            });
        }
        other => debug!(
            element = %String::from_utf8_lossy(other),
            object = %obj.name,
            "ignoring unknown object element"
        ),
    }
    Ok(())
}

/// Read the content of an `<Object>` up to its closing tag
fn parse_object_inner(reader: &mut Reader<&[u8]>, mut obj: CurveObject) -> Result<CurveObject, ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"Spline" {
                    let spline = parse_spline_inner(reader, spline_header(e)?)?;
                    obj.splines.push(spline);
                } else {
                    depth += 1;
                    apply_object_child(&mut obj, e)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"Spline" {
                    obj.splines.push(spline_header(e)?);
                } else {
                    apply_object_child(&mut obj, e)?;
                }
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(obj)
}

/// Skip the rest of an element whose start tag was just read
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Build an empty object from the attributes of `<Object>`, or `None` when
/// the object is not a curve
fn object_header(e: &BytesStart) -> Result<(String, Option<CurveObject>), ParseError> {
    let attrs = attributes(e)?;
    let name = attrs.get("Name").cloned().unwrap_or_default();

    let kind = attrs.get("Type").map_or("CURVE", String::as_str);
    if kind != "CURVE" {
        return Ok((name, None));
    }

    let mut obj = CurveObject::new(name.clone());
    obj.dimensions = match attrs.get("Dimensions").map(String::as_str) {
        None | Some("2D") => Dimensions::TwoD,
        Some("3D") => Dimensions::ThreeD,
        Some(other) => return Err(ParseError::UnknownDimensions(other.to_string())),
    };

    Ok((name, Some(obj)))
}

/// Parse a scene file into curve objects
pub fn parse_scene(xml_string: &str) -> Result<Scene, ParseError> {
    let mut reader = Reader::from_str(xml_string);
    reader.config_mut().trim_text(true);

    let mut scene = Scene::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Object" => match object_header(e)? {
                    (_, Some(obj)) => scene.objects.push(parse_object_inner(&mut reader, obj)?),
                    (name, None) => {
                        info!(object = %name, "skipping object that is not a curve");
                        skip_element(&mut reader)?;
                        scene.skipped.push(name);
                    }
                },
                b"Spline" | b"Point" | b"Material" => {
                    return Err(ParseError::Misplaced {
                        element: tag_name(e),
                        parent: "Object",
                    });
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"Object" {
                    match object_header(e)? {
                        (_, Some(obj)) => scene.objects.push(obj),
                        (name, None) => {
                            info!(object = %name, "skipping object that is not a curve");
                            scene.skipped.push(name);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(scene)
}
