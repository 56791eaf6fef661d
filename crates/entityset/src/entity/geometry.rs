//! Entity locations.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde::Deserialize;

/// A single coordinate. `z` is 0 unless a height was supplied.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Location of an entity.
///
/// Every variant goes over the wire as the entity's `path` array.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    /// At least two points.
    Path(Vec<Point>),
    /// At least three points.
    Polygon(Vec<Point>),
}

impl Geometry {
    /// The points making up this geometry, in order.
    pub fn points(&self) -> &[Point] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::Path(points) | Geometry::Polygon(points) => points,
        }
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let points = self.points();
        let mut seq = serializer.serialize_seq(Some(points.len()))?;
        for point in points {
            seq.serialize_element(point)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_serializes_as_single_element_path() {
        let geometry = Geometry::Point(Point::new(-8.6, 41.2, 0.0));
        assert_eq!(
            serde_json::to_value(&geometry).unwrap(),
            json!([{"x": -8.6, "y": 41.2, "z": 0.0}])
        );
    }

    #[test]
    fn test_polygon_points_keep_order() {
        let ring = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
        ];
        let geometry = Geometry::Polygon(ring.clone());
        assert_eq!(geometry.points(), ring.as_slice());
    }
}
