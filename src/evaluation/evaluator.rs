//! Energy-simulating route evaluator.

use super::{complement, saturate, FitnessWeights, INFEASIBLE_FITNESS, RECHARGE_SATURATION};
use crate::constructive::{farthest_neighbor_tour, nearest_neighbor_order, radial_lower_bound};
use crate::energy::{ChargingMode, EnergyCostModel};
use crate::models::{Instance, Point, RoutePlan, Solution, VehicleState, Visit};

/// Outcome of flying one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEvaluation {
    fitness: f64,
    feasible: bool,
    order: Vec<usize>,
    assigned: usize,
    vehicle: VehicleState,
    charged_energy: f64,
}

impl RouteEvaluation {
    /// Route fitness, or [`INFEASIBLE_FITNESS`].
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether every assigned target was reached within budget.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Target indices actually visited, in flight order.
    pub fn visited(&self) -> &[usize] {
        &self.order
    }

    /// Number of targets assigned to the route.
    pub fn assigned(&self) -> usize {
        self.assigned
    }

    /// Vehicle state after returning to the depot.
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// Energy delivered to sensors, side charges included [J].
    pub fn charged_energy(&self) -> f64 {
        self.charged_energy
    }

    /// Fraction of assigned targets visited.
    pub fn served_ratio(&self) -> f64 {
        if self.assigned == 0 {
            1.0
        } else {
            self.order.len() as f64 / self.assigned as f64
        }
    }
}

/// Scores routes by simulating a vehicle flying them.
///
/// The stored route is a set assignment: the visiting order is rebuilt by
/// nearest-neighbour selection from the depot. Before each stop the
/// vehicle must afford the leg, the transfer, the flight home and the
/// reserve; otherwise the route is infeasible and scoring stops there.
///
/// # Examples
///
/// ```
/// use pdv_routing::energy::PdvEnergyModel;
/// use pdv_routing::evaluation::{FitnessWeights, RouteFitnessEvaluator};
/// use pdv_routing::models::{Instance, Point, Target};
///
/// let inst = Instance::new(vec![
///     Target::new(0, Point::new(100.0, 100.0), 24.0, 37.5),
///     Target::new(1, Point::new(200.0, 200.0), 24.0, 37.5),
/// ]).unwrap();
/// let model = PdvEnergyModel::default();
/// let evaluator = RouteFitnessEvaluator::new(&inst, &model, FitnessWeights::default());
///
/// let eval = evaluator.evaluate(&[1, 0]);
/// assert!(eval.is_feasible());
/// assert_eq!(eval.visited(), &[0, 1]);
/// assert!(eval.fitness() > 0.0 && eval.fitness() <= 100.0);
/// ```
pub struct RouteFitnessEvaluator<'a, M: EnergyCostModel + ?Sized> {
    instance: &'a Instance,
    model: &'a M,
    weights: FitnessWeights,
    mode: ChargingMode,
    clusters: Vec<Vec<(usize, f64)>>,
}

impl<'a, M: EnergyCostModel + ?Sized> RouteFitnessEvaluator<'a, M> {
    /// Creates an evaluator with acoustic side charges enabled.
    pub fn new(instance: &'a Instance, model: &'a M, weights: FitnessWeights) -> Self {
        let mut evaluator = Self {
            instance,
            model,
            weights,
            mode: ChargingMode::InductiveAndAcoustic,
            clusters: Vec::new(),
        };
        evaluator.build_clusters();
        evaluator
    }

    /// Sets the charging mode.
    pub fn with_charging(mut self, mode: ChargingMode) -> Self {
        self.mode = mode;
        self.build_clusters();
        self
    }

    fn build_clusters(&mut self) {
        let targets = self.instance.targets();
        self.clusters = match self.mode {
            ChargingMode::InductiveOnly => vec![Vec::new(); targets.len()],
            ChargingMode::InductiveAndAcoustic => targets
                .iter()
                .map(|center| {
                    self.model
                        .acoustic_cluster_of(center, targets)
                        .into_iter()
                        .map(|j| {
                            let d = center.position().distance_to(&targets[j].position());
                            (j, self.model.acoustic_delivery(d))
                        })
                        .collect()
                })
                .collect(),
        };
    }

    /// Shared run data.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Energy model in use.
    pub fn model(&self) -> &'a M {
        self.model
    }

    /// Fitness weights.
    pub fn weights(&self) -> FitnessWeights {
        self.weights
    }

    /// Charging mode.
    pub fn charging(&self) -> ChargingMode {
        self.mode
    }

    /// Acoustic neighbours of a target with the energy each receives [J].
    pub fn cluster(&self, target: usize) -> &[(usize, f64)] {
        &self.clusters[target]
    }

    /// Flies a route and scores it.
    pub fn evaluate(&self, route: &[usize]) -> RouteEvaluation {
        self.simulate(route, None)
    }

    /// Fitness of a route.
    pub fn fitness(&self, route: &[usize]) -> f64 {
        self.evaluate(route).fitness()
    }

    /// Evaluates every route of a solution and caches the results.
    pub fn evaluate_solution(&self, solution: &mut Solution) {
        let fitness = solution.routes().iter().map(|r| self.fitness(r)).collect();
        solution.set_fitness(fitness);
    }

    /// Re-evaluates the given vehicle slots only.
    ///
    /// Returns `false` if any of them became infeasible.
    pub fn reevaluate(&self, solution: &mut Solution, vehicles: &[usize]) -> bool {
        let mut feasible = true;
        for (i, &v) in vehicles.iter().enumerate() {
            if vehicles[..i].contains(&v) {
                continue;
            }
            let f = self.fitness(solution.route(v));
            feasible &= f > INFEASIBLE_FITNESS;
            solution.set_route_fitness(v, f);
        }
        feasible
    }

    /// Flies a route and records the stops for reporting.
    pub fn plan(&self, vehicle: usize, route: &[usize]) -> RoutePlan {
        let mut plan = RoutePlan::new(vehicle);
        let eval = self.simulate(route, Some(&mut plan));
        let state = eval.vehicle();
        plan.set_totals(state.distance(), state.time(), state.energy_used());
        plan.set_outcome(
            eval.charged_energy(),
            eval.served_ratio(),
            eval.fitness(),
            eval.is_feasible(),
        );
        plan
    }

    fn direct_credit(&self, target: usize) -> f64 {
        let deficit = self.instance.target(target).energy_deficit();
        let relay = self.model.acoustic_sent();
        if self.clusters[target].is_empty() || relay <= 0.0 {
            deficit
        } else {
            (deficit - relay).max(0.0)
        }
    }

    fn simulate(&self, route: &[usize], mut recorder: Option<&mut RoutePlan>) -> RouteEvaluation {
        let mut vehicle = VehicleState::at_depot(self.model.capacity());
        if route.is_empty() {
            return RouteEvaluation {
                fitness: 0.0,
                feasible: true,
                order: Vec::new(),
                assigned: 0,
                vehicle,
                charged_energy: 0.0,
            };
        }

        let mut visited = Vec::with_capacity(route.len());
        let mut current: Option<usize> = None;
        let mut feasible = true;
        let mut charged = 0.0;
        let mut theoretical = 0.0;

        for next in nearest_neighbor_order(self.instance, route) {
            let target = self.instance.target(next);
            let leg = self
                .model
                .leg_cost(self.instance.distance_from(current, next));
            let charge = self.model.charge_cost(&vehicle, target);
            let home = self.model.leg_cost(self.instance.depot_distance(next));
            let required = leg.energy + charge.energy + home.energy + self.model.reserve();
            if required > self.model.remaining_budget(&vehicle) {
                feasible = false;
                break;
            }

            vehicle.advance(target.position(), leg.distance, leg.time);
            vehicle.consume(leg.energy);
            let arrival = vehicle.time();
            vehicle.wait(charge.time);
            vehicle.consume(charge.energy);

            let mut stop_energy = self.direct_credit(next);
            theoretical += target.energy_capacity();
            for &(_, delivered) in &self.clusters[next] {
                stop_energy += delivered;
            }
            charged += stop_energy;

            if let Some(plan) = recorder.as_deref_mut() {
                plan.push_visit(Visit {
                    target_id: target.id(),
                    arrival_time: arrival,
                    remaining_energy: vehicle.remaining_energy(),
                    charged_energy: stop_energy,
                    acoustic_neighbors: self.clusters[next]
                        .iter()
                        .map(|&(j, _)| self.instance.target(j).id())
                        .collect(),
                });
            }

            visited.push(next);
            current = Some(next);
        }

        if let Some(last) = current {
            let home = self.model.leg_cost(self.instance.depot_distance(last));
            vehicle.advance(Point::DEPOT, home.distance, home.time);
            vehicle.consume(home.energy);
        }

        let fitness = if feasible {
            self.score(route, &vehicle, charged, theoretical)
        } else {
            INFEASIBLE_FITNESS
        };

        RouteEvaluation {
            fitness,
            feasible,
            order: visited,
            assigned: route.len(),
            vehicle,
            charged_energy: charged,
        }
    }

    fn score(&self, route: &[usize], vehicle: &VehicleState, charged: f64, theoretical: f64) -> f64 {
        let w = &self.weights;
        let recharge_ratio = if theoretical > 0.0 {
            charged / (RECHARGE_SATURATION * theoretical)
        } else {
            0.0
        };
        let capacity = vehicle.capacity();
        let energy_ratio = if capacity > 0.0 {
            vehicle.energy_used() / capacity
        } else {
            0.0
        };

        let mut fitness =
            w.recharge * saturate(recharge_ratio) + w.vehicle_energy * complement(energy_ratio);

        if w.distance > 0.0 {
            let best = radial_lower_bound(self.instance, route);
            let worst = farthest_neighbor_tour(self.instance, route);
            let span = worst - best;
            let ratio = if span > f64::EPSILON {
                (vehicle.distance() - best) / span
            } else {
                0.0
            };
            fitness += w.distance * complement(ratio);
        }
        fitness
    }
}
