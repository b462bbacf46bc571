//! Per-target neighbour ranks.

use super::DistanceMatrix;

/// For every target, the other targets sorted by increasing distance.
///
/// Rank 0 is the nearest other target. Indices are target indices (not
/// matrix locations), so a rank maps straight to a stable identity that
/// mutation operators can locate and swap.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::Point;
/// use pdv_routing::distance::{DistanceMatrix, NeighborTable};
///
/// let points = [Point::new(0.0, 1.0), Point::new(0.0, 5.0), Point::new(0.0, 2.0)];
/// let table = NeighborTable::new(&DistanceMatrix::from_points(&points));
/// assert_eq!(table.ranked(0), &[2, 1]);
/// assert_eq!(table.neighbor(1, 0), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct NeighborTable {
    ranks: Vec<Vec<usize>>,
}

impl NeighborTable {
    /// Builds the table from a depot-first distance matrix.
    pub fn new(matrix: &DistanceMatrix) -> Self {
        let n = matrix.size().saturating_sub(1);
        let ranks = (0..n)
            .map(|i| {
                let mut others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
                others.sort_by(|&a, &b| {
                    matrix
                        .get(i + 1, a + 1)
                        .total_cmp(&matrix.get(i + 1, b + 1))
                        .then(a.cmp(&b))
                });
                others
            })
            .collect();
        Self { ranks }
    }

    /// Other targets ordered by distance from `target`.
    pub fn ranked(&self, target: usize) -> &[usize] {
        &self.ranks[target]
    }

    /// The `rank`-th nearest other target.
    pub fn neighbor(&self, target: usize, rank: usize) -> Option<usize> {
        self.ranks.get(target).and_then(|r| r.get(rank)).copied()
    }

    /// Number of targets covered.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns `true` if the table covers no targets.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn test_ranks_exclude_self() {
        let points = [Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(4.0, 0.0)];
        let t = NeighborTable::new(&DistanceMatrix::from_points(&points));
        assert_eq!(t.len(), 3);
        assert_eq!(t.ranked(0), &[1, 2]);
        assert_eq!(t.ranked(2), &[1, 0]);
        assert!(t.ranked(1).iter().all(|&j| j != 1));
    }

    #[test]
    fn test_out_of_range_rank() {
        let points = [Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        let t = NeighborTable::new(&DistanceMatrix::from_points(&points));
        assert_eq!(t.neighbor(0, 0), Some(1));
        assert_eq!(t.neighbor(0, 1), None);
        assert_eq!(t.neighbor(5, 0), None);
    }

    #[test]
    fn test_single_target() {
        let t = NeighborTable::new(&DistanceMatrix::from_points(&[Point::new(1.0, 1.0)]));
        assert!(t.ranked(0).is_empty());
    }
}
