//! Piecewise-linear 1-D curve owned by the Curve node.
//!
//! Control points live in the unit square and stay sorted by `x`. Evaluation
//! holds the first/last point's value outside the covered range.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl CurvePoint {
    pub fn new(x: f32, y: f32) -> Self {
        CurvePoint {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurvePoint>", into = "Vec<CurvePoint>")]
pub struct CurveMapping {
    points: Vec<CurvePoint>,
}

impl Default for CurveMapping {
    fn default() -> Self {
        CurveMapping {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
        }
    }
}

impl CurveMapping {
    /// Build a mapping from arbitrary points. Fewer than two usable points
    /// yields the identity curve.
    pub fn new(points: impl IntoIterator<Item = CurvePoint>) -> Self {
        let mut points: Vec<CurvePoint> = points
            .into_iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| CurvePoint::new(p.x, p.y))
            .collect();
        if points.len() < 2 {
            return CurveMapping::default();
        }
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        CurveMapping { points }
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Insert a point keeping `x` order; returns its index.
    pub fn insert_point(&mut self, point: CurvePoint) -> usize {
        let point = CurvePoint::new(point.x, point.y);
        let index = self.points.partition_point(|p| p.x <= point.x);
        self.points.insert(index, point);
        index
    }

    /// Remove a point. The curve never drops below two points.
    pub fn remove_point(&mut self, index: usize) -> Option<CurvePoint> {
        if self.points.len() <= 2 || index >= self.points.len() {
            return None;
        }
        Some(self.points.remove(index))
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        let points = &self.points;
        let n = points.len();
        match n {
            0 => x.clamp(0.0, 1.0),
            1 => points[0].y,
            _ => {
                if x <= points[0].x {
                    return points[0].y;
                }
                if x >= points[n - 1].x {
                    return points[n - 1].y;
                }
                // First point strictly right of `x`; its predecessor opens the segment.
                let hi = points.partition_point(|p| p.x <= x).clamp(1, n - 1);
                let (a, b) = (points[hi - 1], points[hi]);
                let denom = (b.x - a.x).max(f32::EPSILON);
                let t = ((x - a.x) / denom).clamp(0.0, 1.0);
                a.y + (b.y - a.y) * t
            }
        }
    }
}

impl From<Vec<CurvePoint>> for CurveMapping {
    fn from(points: Vec<CurvePoint>) -> Self {
        CurveMapping::new(points)
    }
}

impl From<CurveMapping> for Vec<CurvePoint> {
    fn from(mapping: CurveMapping) -> Self {
        mapping.points
    }
}
