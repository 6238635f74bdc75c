use crate::{
    ecosystem::{EcosystemRates, EcosystemState, Variable},
    engine::{System, SystemContext},
};

/// Crop production decays with the bee deficit and has no recovery term.
pub struct CropSystem {
    decay_rate: f64,
}

impl CropSystem {
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }
}

impl Default for CropSystem {
    fn default() -> Self {
        Self::new(EcosystemRates::default().crop_decay)
    }
}

impl System for CropSystem {
    fn name(&self) -> &str {
        "crops"
    }

    fn variable(&self) -> Variable {
        Variable::CropProduction
    }

    fn rate(&self, _ctx: &SystemContext, state: &EcosystemState) -> f64 {
        -self.decay_rate * state.bee_deficit() * state.crop_production
    }
}
