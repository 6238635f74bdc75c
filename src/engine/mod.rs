//! Fixed-step RK4 engine that integrates the rates contributed by a set of
//! systems and reports the state at caller-chosen sample times.

use tracing::trace;

use crate::{
    ecosystem::{EcosystemState, EcosystemTrajectory, TrajectorySample, Variable, STATE_LEN},
    error::ModelError,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// RK4 steps taken between two consecutive sample times.
    pub substeps_per_sample: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            substeps_per_sample: 8,
        }
    }
}

pub struct SystemContext {
    pub resilience: f64,
}

/// A contribution to the rate of change of one state variable.
///
/// Rates of systems driving the same variable are summed. Variables without
/// a system stay constant.
pub trait System: Send + Sync {
    fn name(&self) -> &str;
    fn variable(&self) -> Variable;
    fn rate(&self, ctx: &SystemContext, state: &EcosystemState) -> f64;
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            settings: self.settings,
            systems: self.systems,
        }
    }
}

pub struct Engine {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl Engine {
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    pub fn derivatives(&self, ctx: &SystemContext, state: &EcosystemState) -> [f64; STATE_LEN] {
        let mut rates = [0.0; STATE_LEN];
        for system in &self.systems {
            rates[system.variable().index()] += system.rate(ctx, state);
        }
        rates
    }

    /// Integrate from `initial` at `times[0]` and hand every sample to `hook`.
    ///
    /// Returns the state at the last sample time.
    pub fn run_with_hook<F>(
        &self,
        ctx: &SystemContext,
        initial: EcosystemState,
        times: &[f64],
        mut hook: F,
    ) -> Result<EcosystemState, ModelError>
    where
        F: FnMut(TrajectorySample),
    {
        let Some((&start, rest)) = times.split_first() else {
            return Err(ModelError::DegenerateInput("empty time grid".into()));
        };
        if self.settings.substeps_per_sample == 0 {
            return Err(ModelError::DegenerateInput(
                "engine needs at least one step per sample".into(),
            ));
        }

        let rhs = |y: &[f64; STATE_LEN], _t: f64| self.derivatives(ctx, &EcosystemState::from_array(*y));
        let mut y = initial.to_array();
        let mut t = start;
        hook(TrajectorySample::from_state(t, &initial));

        for &next in rest {
            if next.is_nan() || next <= t {
                return Err(ModelError::DegenerateInput(format!(
                    "sample times must increase ({t} then {next})"
                )));
            }
            let substeps = self.settings.substeps_per_sample;
            let dt = (next - t) / substeps as f64;
            for step in 0..substeps {
                y = rk4_step(&rhs, &y, t + dt * step as f64, dt);
            }
            t = next;
            trace!(time = t, state = ?y, "sample");
            hook(TrajectorySample::from_state(t, &EcosystemState::from_array(y)));
        }
        Ok(EcosystemState::from_array(y))
    }

    pub fn run(
        &self,
        ctx: &SystemContext,
        initial: EcosystemState,
        times: &[f64],
    ) -> Result<EcosystemTrajectory, ModelError> {
        let mut samples = Vec::with_capacity(times.len());
        self.run_with_hook(ctx, initial, times, |sample| samples.push(sample))?;
        Ok(EcosystemTrajectory::new(samples))
    }
}

/// One classical Runge-Kutta step of `dy/dt = f(y, t)`.
pub fn rk4_step<const N: usize, F>(f: &F, y: &[f64; N], t: f64, dt: f64) -> [f64; N]
where
    F: Fn(&[f64; N], f64) -> [f64; N],
{
    let half_dt = 0.5 * dt;
    let offset = |k: &[f64; N], h: f64| -> [f64; N] {
        let mut out = *y;
        for (yi, ki) in out.iter_mut().zip(k) {
            *yi = h.mul_add(*ki, *yi);
        }
        out
    };

    let k1 = f(y, t);
    let k2 = f(&offset(&k1, half_dt), t + half_dt);
    let k3 = f(&offset(&k2, half_dt), t + half_dt);
    let k4 = f(&offset(&k3, dt), t + dt);

    let sixth_dt = dt / 6.0;
    let mut next = *y;
    for i in 0..N {
        let slope = 2.0f64.mul_add(k2[i] + k3[i], k1[i] + k4[i]);
        next[i] = sixth_dt.mul_add(slope, y[i]);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantDrain;

    impl System for ConstantDrain {
        fn name(&self) -> &str {
            "drain"
        }

        fn variable(&self) -> Variable {
            Variable::WildPlants
        }

        fn rate(&self, _ctx: &SystemContext, _state: &EcosystemState) -> f64 {
            -0.1
        }
    }

    #[test]
    fn rk4_solves_exponential_decay() {
        let f = |y: &[f64; 1], _t: f64| [-0.5 * y[0]];
        let mut y = [1.0];
        let dt = 0.01;
        for step in 0..1000 {
            y = rk4_step(&f, &y, step as f64 * dt, dt);
        }
        let expected = (-0.5_f64 * 10.0).exp();
        assert!((y[0] - expected).abs() < 1e-8, "got {}", y[0]);
    }

    #[test]
    fn rates_of_shared_variable_are_summed() {
        let engine = EngineBuilder::new(EngineSettings::default())
            .with_system(ConstantDrain)
            .with_system(ConstantDrain)
            .build();
        let ctx = SystemContext { resilience: 0.0 };
        let rates = engine.derivatives(&ctx, &EcosystemState::initial(1.0));
        assert_eq!(rates, [0.0, 0.0, -0.2, 0.0]);
        assert_eq!(engine.system_names(), vec!["drain", "drain"]);
    }

    #[test]
    fn hook_sees_every_sample() {
        let engine = EngineBuilder::new(EngineSettings::default())
            .with_system(ConstantDrain)
            .build();
        let ctx = SystemContext { resilience: 0.0 };
        let mut times = Vec::new();
        let last = engine
            .run_with_hook(&ctx, EcosystemState::initial(1.0), &[0.0, 1.0, 2.0], |s| {
                times.push(s.time)
            })
            .unwrap();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert!((last.wild_plants - 0.8).abs() < 1e-12);
        assert_eq!(last.biodiversity, 1.0);
    }

    #[test]
    fn rejects_empty_and_unordered_grids() {
        let engine = EngineBuilder::new(EngineSettings::default()).build();
        let ctx = SystemContext { resilience: 0.0 };
        let initial = EcosystemState::initial(1.0);
        assert!(engine.run(&ctx, initial, &[]).is_err());
        assert!(engine.run(&ctx, initial, &[0.0, 0.0]).is_err());
    }
}
