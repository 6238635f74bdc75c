//! Ecosystem state, monthly trajectories and the multi-year simulation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    engine::{EngineSettings, SystemContext},
    error::ModelError,
    params::{SimulationParameters, MAX_YEARS},
    systems,
};

pub const STATE_LEN: usize = 4;
pub const SAMPLES_PER_YEAR: u32 = 12;

/// Rate constants of the decay dynamics, per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcosystemRates {
    #[serde(default = "default_biodiversity_decay")]
    pub biodiversity_decay: f64,
    #[serde(default = "default_crop_decay")]
    pub crop_decay: f64,
    #[serde(default = "default_wild_plant_decay")]
    pub wild_plant_decay: f64,
    #[serde(default = "default_recovery")]
    pub recovery: f64,
}

fn default_biodiversity_decay() -> f64 {
    0.05
}

fn default_crop_decay() -> f64 {
    0.08
}

fn default_wild_plant_decay() -> f64 {
    0.03
}

fn default_recovery() -> f64 {
    0.02
}

impl Default for EcosystemRates {
    fn default() -> Self {
        Self {
            biodiversity_decay: default_biodiversity_decay(),
            crop_decay: default_crop_decay(),
            wild_plant_decay: default_wild_plant_decay(),
            recovery: default_recovery(),
        }
    }
}

impl EcosystemRates {
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("biodiversity_decay", self.biodiversity_decay),
            ("crop_decay", self.crop_decay),
            ("wild_plant_decay", self.wild_plant_decay),
            ("recovery", self.recovery),
        ] {
            ModelError::check_range(name, value, 0.0, f64::MAX)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Biodiversity,
    CropProduction,
    WildPlants,
    BeePopulation,
}

impl Variable {
    pub fn index(self) -> usize {
        match self {
            Variable::Biodiversity => 0,
            Variable::CropProduction => 1,
            Variable::WildPlants => 2,
            Variable::BeePopulation => 3,
        }
    }
}

/// State vector as fractions of the baseline (1.0 = 100%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcosystemState {
    pub biodiversity: f64,
    pub crop_production: f64,
    pub wild_plants: f64,
    pub bee_population: f64,
}

impl EcosystemState {
    /// Everything at baseline except the bee population.
    pub fn initial(bee_fraction: f64) -> Self {
        Self {
            biodiversity: 1.0,
            crop_production: 1.0,
            wild_plants: 1.0,
            bee_population: bee_fraction,
        }
    }

    pub fn get(&self, variable: Variable) -> f64 {
        self.to_array()[variable.index()]
    }

    pub fn to_array(self) -> [f64; STATE_LEN] {
        [
            self.biodiversity,
            self.crop_production,
            self.wild_plants,
            self.bee_population,
        ]
    }

    pub fn from_array(values: [f64; STATE_LEN]) -> Self {
        let [biodiversity, crop_production, wild_plants, bee_population] = values;
        Self {
            biodiversity,
            crop_production,
            wild_plants,
            bee_population,
        }
    }

    /// Shortfall of the bee population against the baseline.
    pub fn bee_deficit(&self) -> f64 {
        1.0 - self.bee_population
    }
}

/// One monthly row of a trajectory, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub biodiversity: f64,
    pub crop_production: f64,
    pub wild_plants: f64,
    pub bee_population: f64,
}

impl TrajectorySample {
    pub fn from_state(time: f64, state: &EcosystemState) -> Self {
        Self {
            time,
            biodiversity: state.biodiversity * 100.0,
            crop_production: state.crop_production * 100.0,
            wild_plants: state.wild_plants * 100.0,
            bee_population: state.bee_population * 100.0,
        }
    }

    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Biodiversity => self.biodiversity,
            Variable::CropProduction => self.crop_production,
            Variable::WildPlants => self.wild_plants,
            Variable::BeePopulation => self.bee_population,
        }
    }
}

/// Ordered monthly samples produced by one simulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EcosystemTrajectory {
    samples: Vec<TrajectorySample>,
}

impl EcosystemTrajectory {
    pub fn new(samples: Vec<TrajectorySample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// Column for one variable, in sample order.
    pub fn series(&self, variable: Variable) -> Vec<f64> {
        self.samples.iter().map(|s| s.get(variable)).collect()
    }
}

impl<'a> IntoIterator for &'a EcosystemTrajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Sample times: `years * 12` evenly spaced points from 0 to `years`, both
/// endpoints included.
pub fn monthly_grid(years: u32) -> Result<Vec<f64>, ModelError> {
    if years < 1 {
        return Err(ModelError::DegenerateInput(
            "simulation horizon must be at least one year".into(),
        ));
    }
    ModelError::check_range("years", f64::from(years), 1.0, f64::from(MAX_YEARS))?;
    let count = years as usize * SAMPLES_PER_YEAR as usize;
    let last = (count - 1) as f64;
    let horizon = years as f64;
    Ok((0..count)
        .map(|i| {
            if i + 1 == count {
                horizon
            } else {
                horizon * i as f64 / last
            }
        })
        .collect())
}

/// Run the ecosystem model with the default rate constants.
pub fn simulate_ecosystem(
    params: &SimulationParameters,
) -> Result<EcosystemTrajectory, ModelError> {
    simulate_with_rates(params, &EcosystemRates::default(), &EngineSettings::default())
}

/// Run the ecosystem model with explicit rate constants and solver settings.
pub fn simulate_with_rates(
    params: &SimulationParameters,
    rates: &EcosystemRates,
    settings: &EngineSettings,
) -> Result<EcosystemTrajectory, ModelError> {
    params.validate()?;
    rates.validate()?;
    let times = monthly_grid(params.years)?;
    debug!(
        bee = params.bee_population_percentage,
        resilience = params.ecosystem_resilience,
        years = params.years,
        samples = times.len(),
        "simulating ecosystem"
    );

    let engine = systems::standard_engine(rates, settings.clone());
    let ctx = SystemContext {
        resilience: params.ecosystem_resilience,
    };
    engine.run(&ctx, EcosystemState::initial(params.bee_fraction()), &times)
}

/// Long-run biodiversity fraction where decay and recovery balance.
///
/// With no bee deficit the state never leaves the baseline; with no
/// resilience it decays all the way to zero.
pub fn biodiversity_equilibrium(params: &SimulationParameters, rates: &EcosystemRates) -> f64 {
    let decay = rates.biodiversity_decay * (1.0 - params.bee_fraction());
    let recovery = rates.recovery * params.ecosystem_resilience;
    if decay + recovery == 0.0 {
        1.0
    } else {
        recovery / (decay + recovery)
    }
}
