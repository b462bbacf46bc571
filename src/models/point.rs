//! Planar geometry.

use serde::{Deserialize, Serialize};

/// A position in the deployment plane, in meters.
///
/// The depot (base station) sits at the origin.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// assert_eq!(Point::DEPOT, a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// The depot location.
    pub const DEPOT: Point = Point { x: 0.0, y: 0.0 };

    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance to the depot.
    pub fn distance_to_depot(&self) -> f64 {
        self.distance_to(&Self::DEPOT)
    }

    /// Moves `fraction` of the way towards `other`.
    ///
    /// `fraction = 0` stays put, `fraction = 1` lands on `other`.
    pub fn toward(&self, other: &Point, fraction: f64) -> Point {
        Point::new(
            self.x + fraction * (other.x - self.x),
            self.y + fraction * (other.y - self.y),
        )
    }

    /// Returns `true` if both points are within `tol` meters.
    pub fn coincides(&self, other: &Point, tol: f64) -> bool {
        self.distance_to(other) <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }

    #[test]
    fn test_distance_to_depot() {
        let p = Point::new(100.0, 100.0);
        assert!((p.distance_to_depot() - 141.421_356_237).abs() < 1e-6);
    }

    #[test]
    fn test_toward() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -10.0);
        assert_eq!(a.toward(&b, 0.0), a);
        assert_eq!(a.toward(&b, 1.0), b);
        assert_eq!(a.toward(&b, 0.5), Point::new(5.0, -5.0));
    }

    #[test]
    fn test_coincides() {
        let a = Point::new(1.0, 1.0);
        assert!(a.coincides(&Point::new(1.0, 1.0001), 1e-3));
        assert!(!a.coincides(&Point::new(1.0, 1.1), 1e-3));
    }
}
