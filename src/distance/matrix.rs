//! Depot-anchored distance matrix.

use crate::models::Point;

/// Pairwise flight distances between the depot and every target.
///
/// Location 0 is the depot; location `i + 1` is target index `i`.
/// Distances are Euclidean, so the matrix is symmetric with a zero diagonal.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::Point;
/// use pdv_routing::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_points(&[Point::new(3.0, 4.0), Point::new(6.0, 8.0)]);
/// assert_eq!(dm.size(), 3);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.get(1, 2) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the matrix for the depot followed by `points`.
    pub fn from_points(points: &[Point]) -> Self {
        let size = points.len() + 1;
        let location = |i: usize| if i == 0 { Point::DEPOT } else { points[i - 1] };
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = location(i).distance_to(&location(j));
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self { data, size }
    }

    /// Distance between two locations.
    ///
    /// # Panics
    ///
    /// Panics if either location is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations, depot included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Closest location to `from` among `candidates`.
    ///
    /// Ties resolve to the earliest candidate; `None` when there are none.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .fold(None, |best: Option<(usize, f64)>, c| {
                let d = self.get(from, c);
                match best {
                    Some((_, bd)) if d >= bd => best,
                    _ => Some((c, d)),
                }
            })
            .map(|(c, _)| c)
    }
}
