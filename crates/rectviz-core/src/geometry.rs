/// A 2D point in plot data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Square box spanning `[lo, hi]` on both axes.
    pub fn square(lo: f64, hi: f64) -> Self {
        Self::new(Point::new(lo, lo), Point::new(hi, hi))
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Grow the box on every side by `fraction` of its larger span.
    pub fn padded(&self, fraction: f64) -> Self {
        let pad = fraction * self.width().max(self.height());
        Self {
            min: self.min.translate(-pad, -pad),
            max: self.max.translate(pad, pad),
        }
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// A closed polygon defined by a list of vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }

    /// Mean of the vertices. This is where a polygon's name label goes.
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Length of a `width` x `height` rectangle's diagonal.
pub fn diagonal_length(width: f64, height: f64) -> f64 {
    (width.powi(2) + height.powi(2)).sqrt()
}

/// A circumscribed circle known by its radius, its diameter, or both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSpec {
    pub radius: f64,
    pub diameter: f64,
}

impl CircleSpec {
    /// Fill in whichever of radius/diameter is missing. Returns `None` when
    /// neither is known.
    pub fn resolve(radius: Option<f64>, diameter: Option<f64>) -> Option<Self> {
        match (radius, diameter) {
            (Some(radius), Some(diameter)) => Some(Self { radius, diameter }),
            (Some(radius), None) => Some(Self {
                radius,
                diameter: radius * 2.0,
            }),
            (None, Some(diameter)) => Some(Self {
                radius: diameter / 2.0,
                diameter,
            }),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_3_4_5() {
        assert!((diagonal_length(3.0, 4.0) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_padded_uses_larger_span() {
        let b = BBox::new(Point::new(0.0, 0.0), Point::new(10.0, 4.0));
        let p = b.padded(0.1);
        assert_eq!(p.min, Point::new(-1.0, -1.0));
        assert_eq!(p.max, Point::new(11.0, 5.0));
    }

    #[test]
    fn test_polygon_centroid() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        assert_eq!(poly.centroid(), Some(Point::new(2.0, 1.0)));
        assert!(Polygon::new(Vec::new()).centroid().is_none());
    }

    #[test]
    fn test_circle_resolution() {
        let from_radius = CircleSpec::resolve(Some(2.5), None).unwrap();
        assert_eq!(from_radius.diameter, 5.0);
        let from_diameter = CircleSpec::resolve(None, Some(5.0)).unwrap();
        assert_eq!(from_diameter.radius, 2.5);
        assert!(CircleSpec::resolve(None, None).is_none());
    }

    #[test]
    fn test_polygon_bbox_union() {
        let a = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 1.0)]);
        let b = Polygon::new(vec![Point::new(2.0, -1.0), Point::new(3.0, 0.5), Point::new(2.5, 0.0)]);
        let u = a.bbox().unwrap().union(&b.bbox().unwrap());
        assert_eq!(u.min, Point::new(0.0, -1.0));
        assert_eq!(u.max, Point::new(3.0, 1.0));
        assert!(Polygon::new(Vec::new()).bbox().is_none());
    }
}
