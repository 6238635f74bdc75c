use approx::assert_relative_eq;
use pollinator_impact::{
    ecosystem::{biodiversity_equilibrium, EcosystemRates, Variable},
    simulate_ecosystem, ModelError, SimulationParameters,
};

fn run(bee: f64, years: u32, resilience: f64) -> pollinator_impact::EcosystemTrajectory {
    let params = SimulationParameters::new(bee, resilience, years).expect("valid parameters");
    simulate_ecosystem(&params).expect("simulation runs")
}

#[test]
fn full_population_keeps_baseline() {
    for resilience in [0.0, 0.6, 1.0] {
        let trajectory = run(100.0, 5, resilience);
        for sample in &trajectory {
            assert_eq!(sample.bee_population, 100.0);
            assert_eq!(sample.biodiversity, 100.0);
            assert_eq!(sample.crop_production, 100.0);
            assert_eq!(sample.wild_plants, 100.0);
        }
    }
}

#[test]
fn half_population_erodes_crops() {
    let trajectory = run(50.0, 10, 0.6);
    let crops = trajectory.series(Variable::CropProduction);
    assert!(crops.windows(2).all(|w| w[1] < w[0]));
    let first = trajectory.first().unwrap();
    let last = trajectory.last().unwrap();
    assert_eq!(last.time, 10.0);
    assert!(last.crop_production < first.crop_production);
    assert!(trajectory.iter().all(|s| s.bee_population == 50.0));
}

#[test]
fn trajectory_is_monthly_over_full_horizon() {
    for years in [1, 2, 10, 25] {
        let trajectory = run(70.0, years, 0.4);
        assert_eq!(trajectory.len(), years as usize * 12);
        let times = trajectory.times();
        assert_eq!(times[0], 0.0);
        assert_eq!(*times.last().unwrap(), f64::from(years));
        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }
}

#[test]
fn matches_closed_form_solution() {
    let resilience = 0.8;
    let trajectory = run(30.0, 20, resilience);
    let rates = EcosystemRates::default();
    let deficit = 1.0 - 30.0 / 100.0;
    let decay = rates.biodiversity_decay * deficit;
    let recovery = rates.recovery * resilience;
    let equilibrium = recovery / (decay + recovery);

    for sample in &trajectory {
        let t = sample.time;
        let crops = 100.0 * (-rates.crop_decay * deficit * t).exp();
        let wild = 100.0 * (-rates.wild_plant_decay * deficit * t).exp();
        let bio = 100.0 * (equilibrium + (1.0 - equilibrium) * (-(decay + recovery) * t).exp());
        assert_relative_eq!(sample.crop_production, crops, max_relative = 1e-9);
        assert_relative_eq!(sample.wild_plants, wild, max_relative = 1e-9);
        assert_relative_eq!(sample.biodiversity, bio, max_relative = 1e-9);
    }
}

#[test]
fn biodiversity_settles_at_equilibrium() {
    let params = SimulationParameters::new(40.0, 0.5, 400).unwrap();
    let trajectory = simulate_ecosystem(&params).unwrap();
    let expected = biodiversity_equilibrium(&params, &EcosystemRates::default()) * 100.0;
    let last = trajectory.last().unwrap();
    assert_relative_eq!(last.biodiversity, expected, epsilon = 1e-3);
    assert!(last.wild_plants < 0.1);
}

#[test]
fn resilience_slows_biodiversity_loss_only() {
    let fragile = run(30.0, 15, 0.0);
    let robust = run(30.0, 15, 1.0);
    let fragile_last = fragile.last().unwrap();
    let robust_last = robust.last().unwrap();
    assert!(robust_last.biodiversity > fragile_last.biodiversity);
    assert_eq!(robust_last.crop_production, fragile_last.crop_production);
    assert_eq!(robust_last.wild_plants, fragile_last.wild_plants);
}

#[test]
fn repeated_runs_are_identical() {
    let a = run(35.0, 12, 0.7);
    let b = run(35.0, 12, 0.7);
    assert_eq!(a, b);
}

#[test]
fn zero_years_is_degenerate() {
    let params = SimulationParameters {
        bee_population_percentage: 50.0,
        ecosystem_resilience: 0.5,
        years: 0,
    };
    assert!(matches!(
        simulate_ecosystem(&params),
        Err(ModelError::DegenerateInput(_))
    ));
}

#[test]
fn out_of_domain_parameters_are_rejected() {
    let params = SimulationParameters {
        bee_population_percentage: -5.0,
        ecosystem_resilience: 0.5,
        years: 3,
    };
    assert!(matches!(
        simulate_ecosystem(&params),
        Err(ModelError::Domain { .. })
    ));
}
