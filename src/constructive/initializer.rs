//! Randomized nearest-k population seeding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::models::{Instance, Solution};

/// Builds diverse, locally greedy partitions of the target set.
///
/// Each route takes `targets / vehicles` targets. Every pick is drawn
/// uniformly among the `neighborhood` nearest remaining targets to the
/// cursor, which starts at the depot for each route and follows the picks.
/// When the count does not divide evenly, the last route takes all
/// leftovers by plain nearest-neighbour selection.
///
/// # Examples
///
/// ```
/// use pdv_routing::constructive::PopulationInitializer;
/// use pdv_routing::models::{Instance, Point, Target};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let inst = Instance::new(
///     (0..7).map(|i| Target::new(i, Point::new(i as f64 + 1.0, 2.0), 20.0, 37.5)).collect(),
/// ).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let s = PopulationInitializer::new(3).build(&inst, 2, &mut rng);
/// assert_eq!(s.num_routes(), 2);
/// assert_eq!(s.route(0).len(), 3);
/// assert_eq!(s.route(1).len(), 4);
/// assert!(s.check_partition(7).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PopulationInitializer {
    neighborhood: usize,
}

impl PopulationInitializer {
    /// Creates an initializer drawing among the `neighborhood` nearest targets.
    pub fn new(neighborhood: usize) -> Self {
        Self {
            neighborhood: neighborhood.max(1),
        }
    }

    /// Neighbourhood bound.
    pub fn neighborhood(&self) -> usize {
        self.neighborhood
    }

    /// Builds one unevaluated partition into `vehicles` routes.
    pub fn build<R: Rng + ?Sized>(&self, instance: &Instance, vehicles: usize, rng: &mut R) -> Solution {
        let n = instance.len();
        let vehicles = vehicles.max(1);
        let quota = n / vehicles;
        let uneven = n % vehicles != 0;
        let mut pending: Vec<usize> = (0..n).collect();
        let mut routes = Vec::with_capacity(vehicles);

        for v in 0..vehicles {
            if uneven && v == vehicles - 1 {
                break;
            }
            let mut route = Vec::with_capacity(quota);
            let mut cursor: Option<usize> = None;
            for _ in 0..quota {
                let Some(pick) = self.pick_near(instance, cursor, &pending, rng) else {
                    break;
                };
                pending.retain(|&t| t != pick);
                route.push(pick);
                cursor = Some(pick);
            }
            routes.push(route);
        }

        if uneven {
            let mut route = Vec::with_capacity(pending.len());
            let mut cursor: Option<usize> = None;
            while let Some(next) = instance.nearest_among(cursor, &pending) {
                pending.retain(|&t| t != next);
                route.push(next);
                cursor = Some(next);
            }
            routes.push(route);
        }

        Solution::new(routes)
    }

    /// Builds `size` unevaluated partitions.
    ///
    /// Each member gets its own generator seeded from `rng`, so the result
    /// does not depend on thread scheduling.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        vehicles: usize,
        size: usize,
        rng: &mut R,
    ) -> Vec<Solution> {
        let seeds: Vec<u64> = (0..size).map(|_| rng.random()).collect();
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut local = StdRng::seed_from_u64(seed);
                self.build(instance, vehicles, &mut local)
            })
            .collect()
    }

    fn pick_near<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        cursor: Option<usize>,
        pending: &[usize],
        rng: &mut R,
    ) -> Option<usize> {
        if pending.is_empty() {
            return None;
        }
        let mut ranked = pending.to_vec();
        ranked.sort_by(|&a, &b| {
            instance
                .distance_from(cursor, a)
                .total_cmp(&instance.distance_from(cursor, b))
                .then(a.cmp(&b))
        });
        let k = self.neighborhood.min(ranked.len());
        Some(ranked[rng.random_range(0..k)])
    }
}

impl Default for PopulationInitializer {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, Target};
    use proptest::prelude::*;

    fn grid(n: usize) -> Instance {
        Instance::new(
            (0..n)
                .map(|i| {
                    Target::new(
                        i,
                        Point::new((i % 5) as f64 * 10.0 + 5.0, (i / 5) as f64 * 10.0 + 5.0),
                        20.0,
                        37.5,
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_vehicle_takes_all() {
        let inst = grid(4);
        let mut rng = StdRng::seed_from_u64(1);
        let s = PopulationInitializer::default().build(&inst, 1, &mut rng);
        assert_eq!(s.num_routes(), 1);
        let mut ids = s.route(0).to_vec();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_neighborhood_one_is_greedy() {
        let inst = grid(10);
        let init = PopulationInitializer::new(1);
        let a = init.build(&inst, 2, &mut StdRng::seed_from_u64(1));
        let b = init.build(&inst, 2, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_neighborhood_clamped() {
        assert_eq!(PopulationInitializer::new(0).neighborhood(), 1);
    }

    #[test]
    fn test_initialize_deterministic() {
        let inst = grid(12);
        let init = PopulationInitializer::new(4);
        let a = init.initialize(&inst, 3, 6, &mut StdRng::seed_from_u64(5));
        let b = init.initialize(&inst, 3, 6, &mut StdRng::seed_from_u64(5));
        assert_eq!(a.len(), 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_more_vehicles_than_targets() {
        let inst = grid(2);
        let s = PopulationInitializer::default().build(&inst, 3, &mut StdRng::seed_from_u64(0));
        assert_eq!(s.num_routes(), 3);
        assert!(s.check_partition(2).is_ok());
    }

    proptest! {
        #[test]
        fn prop_partition_valid(n in 1usize..40, vehicles in 1usize..8, k in 1usize..8, seed in any::<u64>()) {
            let inst = grid(n);
            let s = PopulationInitializer::new(k).build(&inst, vehicles, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(s.num_routes(), vehicles);
            prop_assert!(s.check_partition(n).is_ok());
            let quota = n / vehicles;
            if n % vehicles == 0 {
                prop_assert!(s.routes().iter().all(|r| r.len() == quota));
            } else {
                prop_assert!(s.routes()[..vehicles - 1].iter().all(|r| r.len() == quota));
            }
        }
    }
}
