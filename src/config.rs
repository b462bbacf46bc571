//! Optimizer configuration.
//!
//! Every field has a default, so a partial JSON/TOML document deserializes
//! into a usable configuration. Presets mirror the choices an operator
//! makes interactively: what to optimize for ([`ObjectiveMode`]), how much
//! time to spend ([`EffortLevel`]) and how aggressively to perturb
//! candidates ([`Randomness`]).

use serde::{Deserialize, Serialize};

use crate::energy::{AcousticParameters, ChargingMode, PdvParameters};
use crate::error::{Error, Result};
use crate::evaluation::FitnessWeights;
use crate::search::{
    BlackHoleSearch, GeneticSearch, SimulatedAnnealingSearch, Strategy, StrategyKind,
};

/// Strategy selection with its own parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Genetic search.
    Genetic {
        /// Generation budget.
        generations: usize,
        /// Per-slot crossover probability.
        crossover_rate: f64,
    },
    /// Black-hole search.
    BlackHole {
        /// Generation budget.
        generations: usize,
        /// Per-slot attraction probability.
        attraction_rate: f64,
    },
    /// Simulated annealing.
    Annealing {
        /// Starting temperature.
        initial_temperature: f64,
        /// Stop temperature.
        min_temperature: f64,
        /// Geometric cooling factor in (0, 1).
        cooling_factor: f64,
        /// Scale applied to fitness differences.
        acceptance_scale: f64,
    },
}

impl StrategyConfig {
    /// Strategy identifier.
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::Genetic { .. } => StrategyKind::Genetic,
            StrategyConfig::BlackHole { .. } => StrategyKind::BlackHole,
            StrategyConfig::Annealing { .. } => StrategyKind::Annealing,
        }
    }

    /// Genetic search at the given effort and randomness.
    pub fn genetic(effort: EffortLevel, randomness: Randomness) -> Self {
        StrategyConfig::Genetic {
            generations: effort.generations(),
            crossover_rate: randomness.probability(),
        }
    }

    /// Black-hole search at the given effort and randomness.
    pub fn black_hole(effort: EffortLevel, randomness: Randomness) -> Self {
        StrategyConfig::BlackHole {
            generations: effort.generations(),
            attraction_rate: randomness.probability(),
        }
    }

    /// Simulated annealing at the given effort.
    pub fn annealing(effort: EffortLevel) -> Self {
        let (initial_temperature, min_temperature, cooling_factor) = effort.schedule();
        StrategyConfig::Annealing {
            initial_temperature,
            min_temperature,
            cooling_factor,
            acceptance_scale: 500.0,
        }
    }

    /// Builds the runnable strategy.
    pub fn build(&self) -> Strategy {
        match *self {
            StrategyConfig::Genetic {
                generations,
                crossover_rate,
            } => Strategy::Genetic(GeneticSearch::new(generations, crossover_rate)),
            StrategyConfig::BlackHole {
                generations,
                attraction_rate,
            } => Strategy::BlackHole(BlackHoleSearch::new(generations, attraction_rate)),
            StrategyConfig::Annealing {
                initial_temperature,
                min_temperature,
                cooling_factor,
                acceptance_scale,
            } => Strategy::Annealing(
                SimulatedAnnealingSearch::new(initial_temperature, min_temperature, cooling_factor)
                    .with_acceptance_scale(acceptance_scale),
            ),
        }
    }

    fn validate(&self) -> Result<()> {
        let rate = |name: &str, r: f64| {
            if (0.0..=1.0).contains(&r) {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} {r} outside [0, 1]")))
            }
        };
        match *self {
            StrategyConfig::Genetic { crossover_rate, .. } => rate("crossover rate", crossover_rate),
            StrategyConfig::BlackHole {
                attraction_rate, ..
            } => rate("attraction rate", attraction_rate),
            StrategyConfig::Annealing {
                initial_temperature,
                min_temperature,
                cooling_factor,
                acceptance_scale,
            } => {
                if !(initial_temperature > 0.0 && initial_temperature.is_finite()) {
                    return Err(Error::InvalidConfig(format!(
                        "initial temperature {initial_temperature} must be positive"
                    )));
                }
                if !(min_temperature > 0.0) {
                    return Err(Error::InvalidConfig(format!(
                        "minimum temperature {min_temperature} must be positive"
                    )));
                }
                if !(cooling_factor > 0.0 && cooling_factor < 1.0) {
                    return Err(Error::InvalidConfig(format!(
                        "cooling factor {cooling_factor} outside (0, 1)"
                    )));
                }
                if !(acceptance_scale > 0.0 && acceptance_scale.is_finite()) {
                    return Err(Error::InvalidConfig(format!(
                        "acceptance scale {acceptance_scale} must be positive"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::genetic(EffortLevel::Medium, Randomness::Medium)
    }
}

/// What the fitness emphasizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// Short flights.
    ShortestFlight,
    /// Low vehicle energy.
    MinimumVehicleEnergy,
    /// High recharged energy.
    MaximumRecharge,
    /// All three terms weighted equally.
    Balanced,
}

impl ObjectiveMode {
    /// Weights for this objective.
    pub fn weights(&self) -> FitnessWeights {
        match self {
            ObjectiveMode::ShortestFlight => FitnessWeights::new(15.0, 15.0, 70.0),
            ObjectiveMode::MinimumVehicleEnergy => FitnessWeights::new(15.0, 70.0, 15.0),
            ObjectiveMode::MaximumRecharge => FitnessWeights::new(70.0, 15.0, 15.0),
            ObjectiveMode::Balanced => {
                let third = 100.0 / 3.0;
                FitnessWeights::new(third, third, third)
            }
        }
    }
}

/// Search budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    /// Quickest.
    VeryLow,
    /// Quick.
    Low,
    /// Default.
    Medium,
    /// Thorough.
    High,
    /// Most thorough.
    VeryHigh,
}

impl EffortLevel {
    /// Generations for generational strategies.
    pub fn generations(&self) -> usize {
        match self {
            EffortLevel::VeryLow => 20,
            EffortLevel::Low => 50,
            EffortLevel::Medium => 100,
            EffortLevel::High => 150,
            EffortLevel::VeryHigh => 200,
        }
    }

    /// Population size for generational strategies.
    pub fn population(&self) -> usize {
        match self {
            EffortLevel::VeryLow => 20,
            EffortLevel::Low => 50,
            EffortLevel::Medium => 100,
            EffortLevel::High => 150,
            EffortLevel::VeryHigh => 300,
        }
    }

    /// `(initial, min, cooling factor)` annealing schedule.
    pub fn schedule(&self) -> (f64, f64, f64) {
        match self {
            EffortLevel::VeryLow => (1e4, 1e-5, 0.95),
            EffortLevel::Low => (3e4, 1e-5, 0.96),
            EffortLevel::Medium => (5e4, 1e-5, 0.97),
            EffortLevel::High => (7e4, 1e-5, 0.98),
            EffortLevel::VeryHigh => (1e5, 1e-5, 0.99),
        }
    }

    /// Population size for annealing.
    pub fn annealing_population(&self) -> usize {
        match self {
            EffortLevel::VeryLow => 10,
            EffortLevel::Low => 20,
            EffortLevel::Medium => 30,
            EffortLevel::High => 40,
            EffortLevel::VeryHigh => 50,
        }
    }
}

/// Per-slot perturbation probability for crossover or attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Randomness {
    /// Never perturb.
    None,
    /// 25 %.
    Low,
    /// 50 %.
    Medium,
    /// 75 %.
    High,
    /// Always perturb.
    Always,
}

impl Randomness {
    /// Probability in `[0, 1]`.
    pub fn probability(&self) -> f64 {
        match self {
            Randomness::None => 0.0,
            Randomness::Low => 0.25,
            Randomness::Medium => 0.5,
            Randomness::High => 0.75,
            Randomness::Always => 1.0,
        }
    }
}

/// Complete optimizer configuration.
///
/// # Examples
///
/// ```
/// use pdv_routing::config::{EffortLevel, ObjectiveMode, OptimizerConfig, StrategyConfig};
///
/// let config = OptimizerConfig::default()
///     .with_objective(ObjectiveMode::MaximumRecharge)
///     .with_strategy(StrategyConfig::annealing(EffortLevel::Low))
///     .with_population_size(20)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.weights.recharge, 70.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Vehicle parameters.
    pub vehicle: PdvParameters,
    /// Acoustic side-charge parameters.
    pub acoustic: AcousticParameters,
    /// Charging mode at each stop.
    pub charging: ChargingMode,
    /// Fitness weights.
    pub weights: FitnessWeights,
    /// Solutions per population.
    pub population_size: usize,
    /// Neighbourhood bound for randomized nearest-k choices.
    pub neighborhood: usize,
    /// Fewer requests than this skip planning.
    pub min_requests: usize,
    /// Search strategy.
    pub strategy: StrategyConfig,
    /// Master seed; `None` draws one from the operating system.
    pub seed: Option<u64>,
    /// Full runs attempted while the best solution stays infeasible.
    pub max_attempts: usize,
    /// Wall-clock limit for a run, in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            vehicle: PdvParameters::default(),
            acoustic: AcousticParameters::default(),
            charging: ChargingMode::default(),
            weights: FitnessWeights::default(),
            population_size: 50,
            neighborhood: 5,
            min_requests: 30,
            strategy: StrategyConfig::default(),
            seed: None,
            max_attempts: 1,
            time_limit_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Sets the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the weights from an objective preset.
    pub fn with_objective(mut self, objective: ObjectiveMode) -> Self {
        self.weights = objective.weights();
        self
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Applies an effort preset to the current strategy kind, population included.
    pub fn with_effort(mut self, effort: EffortLevel) -> Self {
        match self.strategy {
            StrategyConfig::Genetic {
                ref mut generations,
                ..
            }
            | StrategyConfig::BlackHole {
                ref mut generations,
                ..
            } => {
                *generations = effort.generations();
                self.population_size = effort.population();
            }
            StrategyConfig::Annealing {
                ref mut initial_temperature,
                ref mut min_temperature,
                ref mut cooling_factor,
                ..
            } => {
                let (t0, tmin, factor) = effort.schedule();
                *initial_temperature = t0;
                *min_temperature = tmin;
                *cooling_factor = factor;
                self.population_size = effort.annealing_population();
            }
        }
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the neighbourhood bound.
    pub fn with_neighborhood(mut self, k: usize) -> Self {
        self.neighborhood = k;
        self
    }

    /// Sets the demand threshold.
    pub fn with_min_requests(mut self, min: usize) -> Self {
        self.min_requests = min;
        self
    }

    /// Sets the charging mode.
    pub fn with_charging(mut self, mode: ChargingMode) -> Self {
        self.charging = mode;
        self
    }

    /// Sets the vehicle parameters.
    pub fn with_vehicle(mut self, vehicle: PdvParameters) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Fixes the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how many full runs may be attempted.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets a wall-clock limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig("population size must be positive".into()));
        }
        if self.neighborhood == 0 {
            return Err(Error::InvalidConfig("neighborhood must be positive".into()));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max attempts must be positive".into()));
        }
        if !(self.vehicle.capacity > 0.0 && self.vehicle.capacity.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "vehicle capacity {} must be positive",
                self.vehicle.capacity
            )));
        }
        if !(self.vehicle.speed > 0.0) || self.vehicle.power < 0.0 || self.vehicle.reserve < 0.0 {
            return Err(Error::InvalidConfig(
                "vehicle speed must be positive, power and reserve non-negative".into(),
            ));
        }
        if !(self.vehicle.ipt_efficiency > 0.0 && self.vehicle.ipt_efficiency <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "inductive efficiency {} outside (0, 1]",
                self.vehicle.ipt_efficiency
            )));
        }
        if !self.weights.is_valid() {
            return Err(Error::InvalidConfig(
                "fitness weights must be finite and non-negative".into(),
            ));
        }
        self.strategy.validate()
    }
}
