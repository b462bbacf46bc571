//! Partition-preserving move operators shared by the strategies.
//!
//! Every operator swaps two targets between the slots that hold them, so a
//! solution keeps partitioning the target set after any sequence of moves.

use rand::Rng;

use crate::models::{Instance, Point, Solution};

/// Draws one `u64` seed per parallel task from the run's generator.
pub fn task_seeds<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.random()).collect()
}

/// Picks a member index other than `exclude`, or `exclude` itself if it
/// is the only member.
pub fn random_other<R: Rng + ?Sized>(len: usize, exclude: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return exclude;
    }
    let pick = rng.random_range(0..len - 1);
    if pick >= exclude {
        pick + 1
    } else {
        pick
    }
}

/// Swaps `target` with a neighbour of uniformly random rank below
/// `neighborhood`.
///
/// Returns the vehicle slots touched, or `None` if nothing moved.
pub fn neighbor_swap<R: Rng + ?Sized>(
    solution: &mut Solution,
    instance: &Instance,
    target: usize,
    neighborhood: usize,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let ranked = instance.neighbors().ranked(target);
    let k = neighborhood.min(ranked.len());
    if k == 0 {
        return None;
    }
    let other = ranked[rng.random_range(0..k)];
    solution.swap_targets(target, other)
}

/// Pulls `target` a random fraction of the way toward `attractor`, then
/// swaps in whichever target lies nearest to the pulled position.
pub fn attract<R: Rng + ?Sized>(
    solution: &mut Solution,
    instance: &Instance,
    target: usize,
    attractor: Point,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let from = instance.target(target).position();
    let pulled = from.toward(&attractor, rng.random::<f64>());
    let nearest = instance.nearest_target(pulled)?;
    solution.swap_targets(target, nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Target;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line(n: usize) -> Instance {
        Instance::new(
            (0..n)
                .map(|i| Target::new(i, Point::new(10.0 * (i + 1) as f64, 0.0), 20.0, 37.5))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_random_other_never_self() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let j = random_other(4, 2, &mut rng);
            assert_ne!(j, 2);
            assert!(j < 4);
        }
        assert_eq!(random_other(1, 0, &mut rng), 0);
    }

    #[test]
    fn test_neighbor_swap_rank_zero() {
        let inst = line(4);
        let mut s = Solution::new(vec![vec![0, 1], vec![2, 3]]);
        let mut rng = StdRng::seed_from_u64(0);
        // neighbourhood 1 always takes the nearest: target 3's is 2
        let touched = neighbor_swap(&mut s, &inst, 3, 1, &mut rng);
        assert_eq!(touched, Some((1, 1)));
        assert_eq!(s.route(1), &[3, 2]);
        assert!(s.check_partition(4).is_ok());
    }

    #[test]
    fn test_neighbor_swap_single_target() {
        let inst = line(1);
        let mut s = Solution::new(vec![vec![0]]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(neighbor_swap(&mut s, &inst, 0, 5, &mut rng), None);
    }

    #[test]
    fn test_attract_keeps_partition() {
        let inst = line(6);
        let mut s = Solution::new(vec![vec![0, 1, 2], vec![3, 4, 5]]);
        let mut rng = StdRng::seed_from_u64(11);
        for t in 0..6 {
            attract(&mut s, &inst, t, inst.target(5 - t).position(), &mut rng);
            assert!(s.check_partition(6).is_ok());
        }
    }

    #[test]
    fn test_attract_onto_self_position() {
        let inst = line(3);
        let mut s = Solution::new(vec![vec![0, 1, 2]]);
        let mut rng = StdRng::seed_from_u64(1);
        let p = inst.target(1).position();
        assert_eq!(attract(&mut s, &inst, 1, p, &mut rng), None);
        assert_eq!(s.route(0), &[0, 1, 2]);
    }

    #[test]
    fn test_task_seeds_deterministic() {
        let a = task_seeds(&mut StdRng::seed_from_u64(9), 5);
        let b = task_seeds(&mut StdRng::seed_from_u64(9), 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }
}
