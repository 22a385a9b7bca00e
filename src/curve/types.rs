use super::bounds::{bezier_extrema, bezier_point};

/// 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 3D coordinate, as handed over by the host scene
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }
}

/// Bezier handle type. Carried along with every point but not used to pick
/// path commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleType {
    #[default]
    Free,
    Vector,
    Aligned,
    Auto,
}

impl HandleType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FREE" => Some(HandleType::Free),
            "VECTOR" => Some(HandleType::Vector),
            "ALIGNED" => Some(HandleType::Aligned),
            "AUTO" => Some(HandleType::Auto),
            _ => None,
        }
    }
}

/// Control point of a spline with its two handles
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPoint {
    pub co: Vec2,
    pub handle_left: Vec2,
    pub handle_right: Vec2,
    pub handle_left_type: HandleType,
    pub handle_right_type: HandleType,
}

impl BezierPoint {
    /// Point with both handles sitting on the point itself
    pub fn new(x: f64, y: f64) -> Self {
        let co = Vec2::new(x, y);
        Self {
            co,
            handle_left: co,
            handle_right: co,
            handle_left_type: HandleType::Vector,
            handle_right_type: HandleType::Vector,
        }
    }

    pub fn with_handles(co: Vec2, handle_left: Vec2, handle_right: Vec2) -> Self {
        Self {
            co,
            handle_left,
            handle_right,
            handle_left_type: HandleType::Free,
            handle_right_type: HandleType::Free,
        }
    }
}

/// One continuous Bezier curve
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spline {
    pub bezier_points: Vec<BezierPoint>,
    pub material_index: usize,
    /// Closed spline: the last point connects back to the first
    pub cyclic: bool,
}

impl Spline {
    /// Cubic segments as (start, control 1, control 2, end), including the
    /// closing segment of a cyclic spline.
    pub fn segments(&self) -> Vec<(Vec2, Vec2, Vec2, Vec2)> {
        let points = &self.bezier_points;
        let mut segments: Vec<_> = points
            .windows(2)
            .map(|w| (w[0].co, w[0].handle_right, w[1].handle_left, w[1].co))
            .collect();

        if self.cyclic
            && let (Some(first), Some(last)) = (points.first(), points.last())
        {
            segments.push((last.co, last.handle_right, first.handle_left, first.co));
        }

        segments
    }
}

/// Material slot content
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Linear-light RGB, each channel normally in [0, 1]
    pub diffuse_color: [f64; 3],
}

/// Curve dimensionality; only 2D curves are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimensions {
    #[default]
    TwoD,
    ThreeD,
}

/// 4x4 affine matrix, row major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    pub rows: [[f64; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    pub fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Transform a point (w = 1)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let r = &self.rows;
        Vec3::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2] * p.z + r[0][3],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2] * p.z + r[1][3],
            r[2][0] * p.x + r[2][1] * p.y + r[2][2] * p.z + r[2][3],
        )
    }
}

/// A curve object snapshot taken from the host scene
#[derive(Debug, Clone, PartialEq)]
pub struct CurveObject {
    pub name: String,
    pub dimensions: Dimensions,
    pub splines: Vec<Spline>,
    /// Material slots; a slot may be empty
    pub materials: Vec<Option<Material>>,
    pub location: Vec3,
    /// Rotation around Z, radians
    pub rotation_z: f64,
    pub scale: Vec3,
    pub matrix_world: Matrix4,
    /// Local bounding box corners in host order, when the host supplied them
    pub bound_box: Option<[Vec3; 8]>,
}

impl CurveObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: Dimensions::TwoD,
            splines: Vec::new(),
            materials: Vec::new(),
            location: Vec3::default(),
            rotation_z: 0.0,
            scale: Vec3::splat(1.0),
            matrix_world: Matrix4::identity(),
            bound_box: None,
        }
    }

    pub fn is_2d(&self) -> bool {
        self.dimensions == Dimensions::TwoD
    }

    /// Local bounding box corners, derived from the splines when the host
    /// did not supply them.
    pub fn local_bound_box(&self) -> [Vec3; 8] {
        if let Some(bb) = self.bound_box {
            return bb;
        }

        let mut points: Vec<Vec2> = Vec::new();
        for spline in &self.splines {
            points.extend(spline.bezier_points.iter().map(|p| p.co));
            for (p0, c0, c1, p1) in spline.segments() {
                for t in bezier_extrema(p0, c0, c1, p1) {
                    points.push(bezier_point(t, p0, c0, c1, p1));
                }
            }
        }

        if points.is_empty() {
            return [Vec3::default(); 8];
        }

        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        // 2D curves are flat, so both z layers coincide
        [
            Vec3::new(min_x, min_y, 0.0),
            Vec3::new(min_x, min_y, 0.0),
            Vec3::new(min_x, max_y, 0.0),
            Vec3::new(min_x, max_y, 0.0),
            Vec3::new(max_x, min_y, 0.0),
            Vec3::new(max_x, min_y, 0.0),
            Vec3::new(max_x, max_y, 0.0),
            Vec3::new(max_x, max_y, 0.0),
        ]
    }

    /// Bounding box corners in world space
    pub fn world_corners(&self) -> [Vec3; 8] {
        self.local_bound_box()
            .map(|corner| self.matrix_world.transform_point(corner))
    }
}

/// Everything read from a scene file
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<CurveObject>,
    /// Names of objects that are not curves
    pub skipped: Vec<String>,
}

impl Scene {
    /// Objects the exporter will actually write
    pub fn curves_2d(&self) -> impl Iterator<Item = &CurveObject> {
        self.objects.iter().filter(|o| o.is_2d())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_identity_transform() {
        let p = Vec3::new(1.5, -2.0, 3.0);
        assert_eq!(Matrix4::identity().transform_point(p), p);
    }

    #[test]
    fn test_matrix_translation() {
        let mut m = Matrix4::identity();
        m.rows[0][3] = 2.0;
        m.rows[1][3] = -1.0;
        let p = m.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_handle_type_names() {
        assert_eq!(HandleType::from_name("ALIGNED"), Some(HandleType::Aligned));
        assert_eq!(HandleType::from_name("AUTO"), Some(HandleType::Auto));
        assert_eq!(HandleType::from_name("aligned"), None);
    }

    #[test]
    fn test_segments_open_and_cyclic() {
        let mut spline = Spline {
            bezier_points: vec![
                BezierPoint::new(0.0, 0.0),
                BezierPoint::new(1.0, 0.0),
                BezierPoint::new(1.0, 1.0),
            ],
            material_index: 0,
            cyclic: false,
        };
        assert_eq!(spline.segments().len(), 2);

        spline.cyclic = true;
        let segments = spline.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].0, Vec2::new(1.0, 1.0));
        assert_eq!(segments[2].3, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_derived_bound_box_includes_curve_extrema() {
        // Arc bulging up to y = 0.75 between two points on the x axis
        let mut obj = CurveObject::new("Arc");
        obj.splines.push(Spline {
            bezier_points: vec![
                BezierPoint::with_handles(
                    Vec2::new(0.0, 0.0),
                    Vec2::new(0.0, 0.0),
                    Vec2::new(0.0, 1.0),
                ),
                BezierPoint::with_handles(
                    Vec2::new(2.0, 0.0),
                    Vec2::new(2.0, 1.0),
                    Vec2::new(2.0, 0.0),
                ),
            ],
            material_index: 0,
            cyclic: false,
        });

        let bb = obj.local_bound_box();
        assert_eq!(bb[0], Vec3::new(0.0, 0.0, 0.0));
        assert!((bb[6].x - 2.0).abs() < 1e-12);
        assert!((bb[6].y - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_object_bound_box_is_degenerate() {
        let obj = CurveObject::new("Empty");
        assert!(obj.world_corners().iter().all(|c| *c == Vec3::default()));
    }

    #[test]
    fn test_world_corners_apply_matrix() {
        let mut obj = CurveObject::new("Moved");
        obj.splines.push(Spline {
            bezier_points: vec![BezierPoint::new(0.0, 0.0), BezierPoint::new(1.0, 1.0)],
            material_index: 0,
            cyclic: false,
        });
        obj.matrix_world.rows[0][3] = 5.0;

        let corners = obj.world_corners();
        assert_eq!(corners[0].x, 5.0);
        assert_eq!(corners[7].x, 6.0);
        assert_eq!(corners[7].y, 1.0);
    }
}
