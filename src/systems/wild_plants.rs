use crate::{
    ecosystem::{EcosystemRates, EcosystemState, Variable},
    engine::{System, SystemContext},
};

pub struct WildPlantSystem {
    decay_rate: f64,
}

impl WildPlantSystem {
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }
}

impl Default for WildPlantSystem {
    fn default() -> Self {
        Self::new(EcosystemRates::default().wild_plant_decay)
    }
}

impl System for WildPlantSystem {
    fn name(&self) -> &str {
        "wild_plants"
    }

    fn variable(&self) -> Variable {
        Variable::WildPlants
    }

    fn rate(&self, _ctx: &SystemContext, state: &EcosystemState) -> f64 {
        -self.decay_rate * state.bee_deficit() * state.wild_plants
    }
}
