//! Nearest- and farthest-neighbour tours over a target subset.
//!
//! Every tour starts and ends at the depot.
//!
//! # Complexity
//!
//! O(m²) where m = number of members.

use crate::models::Instance;

/// Orders `members` by repeatedly flying to the nearest remaining one.
///
/// Ties resolve to the member listed first.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{Instance, Point, Target};
/// use pdv_routing::constructive::nearest_neighbor_order;
///
/// let inst = Instance::new(vec![
///     Target::new(0, Point::new(3.0, 0.0), 1.0, 1.0),
///     Target::new(1, Point::new(1.0, 0.0), 1.0, 1.0),
///     Target::new(2, Point::new(2.0, 0.0), 1.0, 1.0),
/// ]).unwrap();
/// assert_eq!(nearest_neighbor_order(&inst, &[0, 1, 2]), vec![1, 2, 0]);
/// ```
pub fn nearest_neighbor_order(instance: &Instance, members: &[usize]) -> Vec<usize> {
    let mut pending = members.to_vec();
    let mut order = Vec::with_capacity(members.len());
    let mut current = None;
    while let Some(next) = instance.nearest_among(current, &pending) {
        pending.retain(|&t| t != next);
        order.push(next);
        current = Some(next);
    }
    order
}

/// Length of a closed tour visiting `order` in sequence.
pub fn tour_length(instance: &Instance, order: &[usize]) -> f64 {
    let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
        return 0.0;
    };
    let inner: f64 = order
        .windows(2)
        .map(|w| instance.distance(w[0], w[1]))
        .sum();
    instance.depot_distance(first) + inner + instance.depot_distance(last)
}

/// Length of the tour that always flies to the farthest remaining member.
///
/// Used as the pessimistic bound of the distance term.
pub fn farthest_neighbor_tour(instance: &Instance, members: &[usize]) -> f64 {
    let mut pending = members.to_vec();
    let mut order = Vec::with_capacity(members.len());
    let mut current: Option<usize> = None;
    while !pending.is_empty() {
        let mut best = 0;
        let mut best_d = f64::NEG_INFINITY;
        for (i, &t) in pending.iter().enumerate() {
            let d = instance.distance_from(current, t);
            if d > best_d {
                best = i;
                best_d = d;
            }
        }
        let next = pending.remove(best);
        order.push(next);
        current = Some(next);
    }
    tour_length(instance, &order)
}

/// Out-and-back distance to the member farthest from the depot.
///
/// No closed tour over `members` is shorter.
pub fn radial_lower_bound(instance: &Instance, members: &[usize]) -> f64 {
    2.0 * members
        .iter()
        .map(|&t| instance.depot_distance(t))
        .fold(0.0, f64::max)
}
