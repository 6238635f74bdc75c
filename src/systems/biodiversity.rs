use crate::{
    ecosystem::{EcosystemRates, EcosystemState, Variable},
    engine::{System, SystemContext},
};

/// Biodiversity loses ground in proportion to the bee deficit and recovers
/// towards the baseline at a pace set by ecosystem resilience.
pub struct BiodiversitySystem {
    decay_rate: f64,
    recovery_rate: f64,
}

impl BiodiversitySystem {
    pub fn new(decay_rate: f64, recovery_rate: f64) -> Self {
        Self {
            decay_rate,
            recovery_rate,
        }
    }
}

impl Default for BiodiversitySystem {
    fn default() -> Self {
        let rates = EcosystemRates::default();
        Self::new(rates.biodiversity_decay, rates.recovery)
    }
}

impl System for BiodiversitySystem {
    fn name(&self) -> &str {
        "biodiversity"
    }

    fn variable(&self) -> Variable {
        Variable::Biodiversity
    }

    fn rate(&self, ctx: &SystemContext, state: &EcosystemState) -> f64 {
        let loss = self.decay_rate * state.bee_deficit() * state.biodiversity;
        let recovery = ctx.resilience * self.recovery_rate * (1.0 - state.biodiversity);
        recovery - loss
    }
}
