//! Planar points and the small set of vector operations the composer needs

use serde::{Deserialize, Serialize};

/// 2D point (also used as a plain vector)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Dot product with another point (as vectors from origin)
    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product z-component (for 2D)
    pub fn cross_z(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Vector from this point to another
    pub fn to(&self, other: &Point2D) -> Point2D {
        Point2D::new(other.x - self.x, other.y - self.y)
    }

    /// Componentwise sum
    pub fn add(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x + other.x, self.y + other.y)
    }

    /// Scale as a vector from origin
    pub fn scale(&self, k: f64) -> Point2D {
        Point2D::new(self.x * k, self.y * k)
    }

    /// Rotate about the origin by `angle` radians
    pub fn rotate(&self, angle: f64) -> Point2D {
        let (sin, cos) = angle.sin_cos();
        Point2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Euclidean length as a vector from origin
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle of this vector from the positive x-axis, in radians
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Coordinate-wise comparison within epsilon
    pub fn approx_eq(&self, other: &Point2D, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

/// Geometric predicates over raw points
pub mod ops {
    use super::*;

    /// Check if three points are collinear (using cross product)
    pub fn are_collinear(p1: Point2D, p2: Point2D, p3: Point2D, epsilon: f64) -> bool {
        let v1 = p1.to(&p2);
        let v2 = p1.to(&p3);
        v1.cross_z(&v2).abs() < epsilon
    }

    /// Check if two direction vectors point in exactly opposite directions
    pub fn are_anti_parallel(v1: Point2D, v2: Point2D, epsilon: f64) -> bool {
        v1.cross_z(&v2).abs() < epsilon && v1.dot(&v2) < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);

        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Point2D::new(1.0, 0.0);
        let r = p.rotate(std::f64::consts::FRAC_PI_2);

        assert!(r.approx_eq(&Point2D::new(0.0, 1.0), 1e-10));
    }

    #[test]
    fn test_collinearity() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(1.0, 1.0);
        let p3 = Point2D::new(2.0, 2.0);

        assert!(ops::are_collinear(p1, p2, p3, 1e-10));
        assert!(!ops::are_collinear(p1, p2, Point2D::new(2.0, 3.0), 1e-10));
    }

    #[test]
    fn test_anti_parallel() {
        let v1 = Point2D::new(2.0, 0.0);
        let v2 = Point2D::new(-3.0, 0.0);

        assert!(ops::are_anti_parallel(v1, v2, 1e-10));
        assert!(!ops::are_anti_parallel(v1, v1, 1e-10));
    }
}
