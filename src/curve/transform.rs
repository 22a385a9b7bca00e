use super::number::{fmt_num, round_to};
use super::types::Vec3;

/// Compose an object's location, Z rotation (radians) and scale into an SVG
/// `transform` value. Identity terms are left out; an object sitting at the
/// origin, unrotated and unscaled gets an empty string.
///
/// Terms come out as `rotate`, `translate`, `scale`. SVG applies them right
/// to left, so local geometry is scaled first, then moved, then turned
/// around the object's location.
pub fn svg_transform(location: Vec3, rotation_z: f64, scale: Vec3, precision: u32) -> String {
    let lx = round_to(location.x, precision);
    let ly = round_to(location.y, precision);
    let sx = round_to(scale.x, precision);
    let sy = round_to(scale.y, precision);
    let rot = round_to(rotation_z.to_degrees(), precision);

    let mut result = Vec::new();

    if rot != 0.0 {
        result.push(format!(
            "rotate({} {} {})",
            fmt_num(rot),
            fmt_num(lx),
            fmt_num(ly)
        ));
    }

    if lx != 0.0 || ly != 0.0 {
        result.push(format!("translate({} {})", fmt_num(lx), fmt_num(ly)));
    }

    if sx != 1.0 || sy != 1.0 {
        result.push(format!("scale({} {})", fmt_num(sx), fmt_num(sy)));
    }

    result.join(" ")
}
