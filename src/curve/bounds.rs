use super::number::{fmt_num, round_to};
use super::types::{Vec2, Vec3};

/// Running document bounding box. Starts at the origin and only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ViewBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the box to fit an object's world-space bounding box corners.
    ///
    /// Corners follow the host order
    /// `(-x-y-z) (-x-y+z) (-x+y+z) (-x+y-z) (+x-y-z) (+x-y+z) (+x+y+z) (+x+y-z)`,
    /// so corners 0..4 are the low-x side, 4..8 the high-x side, {0,1,4,5}
    /// the low-y side and {2,3,6,7} the high-y side.
    pub fn update(&mut self, corners: &[Vec3; 8], precision: u32) {
        let c = corners.map(|p| Vec2::new(round_to(p.x, precision), round_to(p.y, precision)));

        self.min_x = [c[0].x, c[1].x, c[2].x, c[3].x]
            .into_iter()
            .fold(self.min_x, f64::min);
        self.min_y = [c[0].y, c[1].y, c[4].y, c[5].y]
            .into_iter()
            .fold(self.min_y, f64::min);
        self.max_x = [c[4].x, c[5].x, c[6].x, c[7].x]
            .into_iter()
            .fold(self.max_x, f64::max);
        self.max_y = [c[2].y, c[3].y, c[6].y, c[7].y]
            .into_iter()
            .fold(self.max_y, f64::max);
    }

    /// Box in output pixels
    pub fn scaled(&self, scale: f64, precision: u32) -> ViewBox {
        ViewBox {
            min_x: round_to(self.min_x * scale, precision),
            min_y: round_to(self.min_y * scale, precision),
            max_x: round_to(self.max_x * scale, precision),
            max_y: round_to(self.max_y * scale, precision),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `viewBox` attribute value. The Y axis is flipped in the output, so the
    /// top edge is `-max_y`. Width and height are rounded again since the
    /// difference of two rounded values can carry binary noise.
    pub fn to_attribute(&self, precision: u32) -> String {
        format!(
            "{} {} {} {}",
            fmt_num(self.min_x),
            fmt_num(-self.max_y),
            fmt_num(round_to(self.width(), precision)),
            fmt_num(round_to(self.height(), precision))
        )
    }
}

/// Parameter values in (0, 1) where a cubic Bezier reaches an extremum on
/// either axis
pub(crate) fn bezier_extrema(p0: Vec2, c0: Vec2, c1: Vec2, p1: Vec2) -> Vec<f64> {
    fn get_extrema(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
        let mut res = Vec::new();
        let aa = -a + 3.0 * b - 3.0 * c + d;
        let bb = 2.0 * (a - 2.0 * b + c);
        let cc = b - a;

        if aa.abs() < 1e-8 {
            if bb.abs() > 1e-8 {
                let t = -cc / bb;
                if t > 0.0 && t < 1.0 {
                    res.push(t);
                }
            }
        } else {
            let disc = bb * bb - 4.0 * aa * cc;
            if disc >= 0.0 {
                let sqrt_d = disc.sqrt();
                for t in [(-bb + sqrt_d) / (2.0 * aa), (-bb - sqrt_d) / (2.0 * aa)] {
                    if t > 0.0 && t < 1.0 {
                        res.push(t);
                    }
                }
            }
        }
        res
    }

    let mut result = get_extrema(p0.x, c0.x, c1.x, p1.x);
    result.extend(get_extrema(p0.y, c0.y, c1.y, p1.y));
    result.sort_by(|a, b| a.total_cmp(b));
    result.dedup_by(|a, b| (*a - *b).abs() < 1e-10);
    result
}

/// Evaluate a cubic Bezier curve at parameter t
pub(crate) fn bezier_point(t: f64, p0: Vec2, c0: Vec2, c1: Vec2, p1: Vec2) -> Vec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    let t2 = t * t;
    let t3 = t2 * t;

    Vec2::new(
        mt3 * p0.x + 3.0 * mt2 * t * c0.x + 3.0 * mt * t2 * c1.x + t3 * p1.x,
        mt3 * p0.y + 3.0 * mt2 * t * c0.y + 3.0 * mt * t2 * c1.y + t3 * p1.y,
    )
}
