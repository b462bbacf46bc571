//! Greedy fleet sizing.
//!
//! One vehicle flies nearest-neighbour from the depot until the next stop
//! no longer fits its budget; then a fresh vehicle takes over from the
//! depot. The number of vehicles opened is the fleet size.

use tracing::debug;

use crate::energy::EnergyCostModel;
use crate::error::{Error, Result};
use crate::models::{Instance, VehicleState};

/// Estimates how many vehicles are needed to serve every target.
///
/// Uses the same affordability test as route evaluation: leg, transfer,
/// flight home and reserve must fit the remaining budget. Always returns
/// at least 1.
///
/// # Errors
///
/// [`Error::InfeasibleTarget`] if a target cannot be served even by a
/// fresh vehicle leaving the depot.
///
/// # Examples
///
/// ```
/// use pdv_routing::constructive::estimate_fleet_size;
/// use pdv_routing::energy::PdvEnergyModel;
/// use pdv_routing::models::{Instance, Point, Target};
///
/// let inst = Instance::new(
///     (1..=4)
///         .map(|i| {
///             let c = 100.0 * i as f64;
///             Target::new(i, Point::new(c, c), 24.0, 37.5)
///         })
///         .collect(),
/// ).unwrap();
/// assert_eq!(estimate_fleet_size(&inst, &PdvEnergyModel::default()).unwrap(), 1);
/// ```
pub fn estimate_fleet_size<M: EnergyCostModel + ?Sized>(
    instance: &Instance,
    model: &M,
) -> Result<usize> {
    let mut pending: Vec<usize> = (0..instance.len()).collect();
    let mut vehicles = 1;
    let mut vehicle = VehicleState::at_depot(model.capacity());
    let mut current: Option<usize> = None;

    while let Some(next) = instance.nearest_among(current, &pending) {
        let target = instance.target(next);
        let leg = model.leg_cost(instance.distance_from(current, next));
        let charge = model.charge_cost(&vehicle, target);
        let home = model.leg_cost(instance.depot_distance(next));
        let required = leg.energy + charge.energy + home.energy + model.reserve();
        let available = model.remaining_budget(&vehicle);

        if required > available {
            if current.is_none() {
                return Err(Error::InfeasibleTarget {
                    id: target.id(),
                    required,
                    available,
                });
            }
            vehicles += 1;
            vehicle = VehicleState::at_depot(model.capacity());
            current = None;
            continue;
        }

        vehicle.advance(target.position(), leg.distance, leg.time);
        vehicle.consume(leg.energy);
        vehicle.wait(charge.time);
        vehicle.consume(charge.energy);
        pending.retain(|&t| t != next);
        current = Some(next);
    }

    debug!(vehicles, targets = instance.len(), "fleet size estimated");
    Ok(vehicles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::PdvEnergyModel;
    use crate::models::{Point, Target};
    use proptest::prelude::*;

    fn ring(n: usize, radius: f64) -> Instance {
        Instance::new(
            (0..n)
                .map(|i| {
                    let a = i as f64 * std::f64::consts::TAU / n as f64;
                    Target::new(i, Point::new(radius * a.cos(), radius * a.sin()), 24.0, 37.5)
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_instance_needs_one() {
        let inst = Instance::new(vec![]).unwrap();
        assert_eq!(estimate_fleet_size(&inst, &PdvEnergyModel::default()).unwrap(), 1);
    }

    #[test]
    fn test_tight_budget_opens_more_vehicles() {
        let inst = ring(8, 400.0);
        let model = PdvEnergyModel::default().with_capacity(40.0);
        let loose = estimate_fleet_size(&inst, &PdvEnergyModel::default()).unwrap();
        let tight = estimate_fleet_size(&inst, &model).unwrap();
        assert_eq!(loose, 1);
        assert!(tight > 1);
        assert!(tight <= inst.len());
    }

    #[test]
    fn test_unreachable_target() {
        let inst = Instance::new(vec![Target::new(42, Point::new(20_000.0, 0.0), 24.0, 37.5)])
            .unwrap();
        let err = estimate_fleet_size(&inst, &PdvEnergyModel::default()).unwrap_err();
        assert!(matches!(err, Error::InfeasibleTarget { id: 42, .. }));
    }

    #[test]
    fn test_flight_home_is_the_only_margin() {
        // out, charge and back come to about 177.3 Wh of the 187 Wh budget
        let inst = Instance::new(vec![Target::new(1, Point::new(5200.0, 0.0), 24.0, 37.5)])
            .unwrap();
        assert_eq!(estimate_fleet_size(&inst, &PdvEnergyModel::default()).unwrap(), 1);

        let strict = PdvEnergyModel::default().with_reserve(20.0);
        let err = estimate_fleet_size(&inst, &strict).unwrap_err();
        match err {
            Error::InfeasibleTarget { id, required, available } => {
                assert_eq!(id, 1);
                assert!((required - 197.26).abs() < 0.01);
                assert_eq!(available, 187.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_fleet_within_bounds(
            coords in prop::collection::vec((-1500.0f64..1500.0, -1500.0f64..1500.0), 1..20),
        ) {
            let targets: Vec<Target> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Target::new(i, Point::new(x, y), 24.0, 37.5))
                .collect();
            let inst = Instance::new(targets).unwrap();
            let v = estimate_fleet_size(&inst, &PdvEnergyModel::default()).unwrap();
            prop_assert!(v >= 1);
            prop_assert!(v <= inst.len());
        }
    }
}
