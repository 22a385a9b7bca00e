use std::fmt;

use super::number::{fmt_num, round_to};
use super::types::{BezierPoint, Spline, Vec2};

/// A single path-data command. Only `M L C Z` are part of the output grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    /// Reserved: the generator always emits curves
    LineTo(Vec2),
    CurveTo { c1: Vec2, c2: Vec2, end: Vec2 },
    ClosePath,
}

struct Coord(Vec2);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", fmt_num(self.0.x), fmt_num(self.0.y))
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo(p) => write!(f, "M {}", Coord(p)),
            PathCommand::LineTo(p) => write!(f, "L {}", Coord(p)),
            PathCommand::CurveTo { c1, c2, end } => {
                write!(f, "C {} {} {}", Coord(c1), Coord(c2), Coord(end))
            }
            PathCommand::ClosePath => f.write_str("Z"),
        }
    }
}

fn round_point(p: Vec2, precision: u32) -> Vec2 {
    Vec2::new(round_to(p.x, precision), round_to(p.y, precision))
}

/// Push the next command for `point`, returning its rounded right handle
/// for the following segment
fn add_command(
    d: &mut Vec<PathCommand>,
    point: &BezierPoint,
    prev: Option<Vec2>,
    precision: u32,
) -> Vec2 {
    let co = round_point(point.co, precision);
    let right = round_point(point.handle_right, precision);

    match prev {
        None => d.push(PathCommand::MoveTo(co)),
        Some(prev_right) => d.push(PathCommand::CurveTo {
            c1: prev_right,
            c2: round_point(point.handle_left, precision),
            end: co,
        }),
    }

    right
}

/// Convert a spline into path commands: `M` to the first point, one `C` per
/// following point, and for a cyclic spline a closing `C` back to the first
/// point plus `Z`.
///
/// Point order is kept as is, even where a subpath winds the "wrong" way
/// relative to its neighbours.
pub fn spline_to_path(spline: &Spline, precision: u32) -> Vec<PathCommand> {
    let mut d = Vec::with_capacity(spline.bezier_points.len() + 2);
    let mut prev = None;

    for point in &spline.bezier_points {
        prev = Some(add_command(&mut d, point, prev, precision));
    }

    if spline.cyclic
        && let Some(first) = spline.bezier_points.first()
    {
        add_command(&mut d, first, prev, precision);
        d.push(PathCommand::ClosePath);
    }

    d
}

/// Render commands as the value of a `d` attribute
pub fn path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
