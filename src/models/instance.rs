//! Read-only data shared by every evaluation of one run.

use std::collections::HashSet;

use super::{Point, Target};
use crate::distance::{DistanceMatrix, NeighborTable};
use crate::error::{Error, Result};

/// Targets of one run with their precomputed distances.
///
/// Target index `i` sits at matrix location `i + 1`; location 0 is the
/// depot. The instance is immutable once built and is shared by reference
/// across worker threads.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{Instance, Point, Target};
///
/// let inst = Instance::new(vec![
///     Target::new(10, Point::new(3.0, 4.0), 20.0, 37.5),
///     Target::new(11, Point::new(6.0, 8.0), 20.0, 37.5),
/// ]).unwrap();
/// assert_eq!(inst.len(), 2);
/// assert!((inst.depot_distance(1) - 10.0).abs() < 1e-10);
/// assert_eq!(inst.nearest_target(Point::new(5.0, 7.0)), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    targets: Vec<Target>,
    matrix: DistanceMatrix,
    neighbors: NeighborTable,
}

impl Instance {
    /// Builds an instance, rejecting duplicate ids and non-finite values.
    pub fn new(targets: Vec<Target>) -> Result<Self> {
        let mut ids = HashSet::with_capacity(targets.len());
        for t in &targets {
            if !ids.insert(t.id()) {
                return Err(Error::InvalidInput(format!("duplicate target id {}", t.id())));
            }
            let p = t.position();
            if !(p.x().is_finite() && p.y().is_finite() && t.energy_deficit().is_finite()) {
                return Err(Error::InvalidInput(format!(
                    "target {} has non-finite data",
                    t.id()
                )));
            }
        }
        let points: Vec<Point> = targets.iter().map(Target::position).collect();
        let matrix = DistanceMatrix::from_points(&points);
        let neighbors = NeighborTable::new(&matrix);
        Ok(Self {
            targets,
            matrix,
            neighbors,
        })
    }

    /// All targets, by index.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Target at `index`.
    pub fn target(&self, index: usize) -> &Target {
        &self.targets[index]
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if there are no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Depot-first distance matrix.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Neighbour ranks between targets.
    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    /// Distance between two targets.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.matrix.get(a + 1, b + 1)
    }

    /// Distance from the depot to a target.
    pub fn depot_distance(&self, target: usize) -> f64 {
        self.matrix.get(0, target + 1)
    }

    /// Distance from an arbitrary location (0 = depot) to a target.
    pub fn distance_from(&self, location: Option<usize>, target: usize) -> f64 {
        match location {
            Some(from) => self.distance(from, target),
            None => self.depot_distance(target),
        }
    }

    /// Nearest target among `candidates` to a location (`None` = depot).
    ///
    /// Ties resolve to the earliest candidate.
    pub fn nearest_among(&self, from: Option<usize>, candidates: &[usize]) -> Option<usize> {
        let from = from.map_or(0, |i| i + 1);
        let locations: Vec<usize> = candidates.iter().map(|&c| c + 1).collect();
        self.matrix
            .nearest_neighbor(from, &locations)
            .map(|location| location - 1)
    }

    /// Index of the target closest to an arbitrary point.
    pub fn nearest_target(&self, point: Point) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, t) in self.targets.iter().enumerate() {
            let d = t.position().distance_to(&point);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the target with the given id.
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.targets.iter().position(|t| t.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<Target> {
        vec![
            Target::new(5, Point::new(1.0, 0.0), 10.0, 37.5),
            Target::new(6, Point::new(0.0, 3.0), 10.0, 37.5),
            Target::new(7, Point::new(4.0, 0.0), 10.0, 37.5),
        ]
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut t = targets();
        t.push(Target::new(5, Point::new(9.0, 9.0), 1.0, 2.0));
        assert!(matches!(Instance::new(t), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let t = vec![Target::new(0, Point::new(f64::NAN, 0.0), 1.0, 2.0)];
        assert!(Instance::new(t).is_err());
    }

    #[test]
    fn test_distances() {
        let inst = Instance::new(targets()).unwrap();
        assert!((inst.distance(0, 2) - 3.0).abs() < 1e-10);
        assert!((inst.depot_distance(1) - 3.0).abs() < 1e-10);
        assert!((inst.distance_from(None, 2) - 4.0).abs() < 1e-10);
        assert!((inst.distance_from(Some(0), 1) - 10f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_nearest_among() {
        let inst = Instance::new(targets()).unwrap();
        assert_eq!(inst.nearest_among(None, &[1, 2]), Some(1));
        assert_eq!(inst.nearest_among(Some(2), &[0, 1]), Some(0));
        assert_eq!(inst.nearest_among(None, &[]), None);
    }

    #[test]
    fn test_nearest_among_tie_keeps_first() {
        let inst = Instance::new(vec![
            Target::new(0, Point::new(2.0, 0.0), 1.0, 2.0),
            Target::new(1, Point::new(0.0, 2.0), 1.0, 2.0),
        ])
        .unwrap();
        assert_eq!(inst.nearest_among(None, &[1, 0]), Some(1));
        assert_eq!(inst.nearest_among(None, &[0, 1]), Some(0));
    }

    #[test]
    fn test_nearest_target_and_index() {
        let inst = Instance::new(targets()).unwrap();
        assert_eq!(inst.nearest_target(Point::new(3.6, 0.2)), Some(2));
        assert_eq!(inst.index_of(6), Some(1));
        assert_eq!(inst.index_of(99), None);
    }
}
