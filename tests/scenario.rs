use std::path::PathBuf;

use pollinator_impact::{
    params::{CropFocus, ResilienceSetting},
    report::{ImpactReport, ReportWriter},
    scenario::{Overrides, ScenarioLoader},
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/colombia.yaml")
}

#[test]
fn scenario_loader_reads_fixture() {
    let scenario = scenario_loader().load(scenario_path()).expect("scenario parses");
    assert_eq!(scenario.name, "colombia");
    assert_eq!(scenario.crop_focus, CropFocus::Cafe);
    assert_eq!(scenario.region.as_deref(), Some("Zona Cafetera"));
    let params = scenario.parameters().unwrap();
    assert_eq!(params.bee_population_percentage, 50.0);
    assert_eq!(params.ecosystem_resilience, 0.6);
    assert_eq!(params.years, 10);
}

#[test]
fn numeric_resilience_fixture_loads() {
    let scenario = scenario_loader()
        .load("scenarios/collapse.yaml")
        .expect("scenario parses");
    let params = scenario.parameters().unwrap();
    assert_eq!(params.ecosystem_resilience, 0.2);
    assert_eq!(params.years, 30);
    assert!(scenario.region.is_none());
}

#[test]
fn missing_file_reports_path() {
    let err = scenario_loader().load("scenarios/missing.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("missing.yaml"));
}

#[test]
fn command_line_overrides_replace_file_values() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let resilience: ResilienceSetting = "muy alta".parse().unwrap();
    let params = scenario
        .parameters_with(&Overrides {
            bee_population_percentage: Some(20.0),
            years: None,
            resilience: Some(resilience),
        })
        .unwrap();
    assert_eq!(params.bee_population_percentage, 20.0);
    assert_eq!(params.ecosystem_resilience, 1.0);
    assert_eq!(params.years, 10);

    let rejected = scenario.parameters_with(&Overrides {
        years: Some(0),
        ..Overrides::default()
    });
    assert!(rejected.is_err());
    assert_eq!(scenario.log_level(None), "info");
    assert_eq!(scenario.log_level(Some("debug")), "debug");
}

#[test]
fn scenario_report_is_written() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let params = scenario
        .parameters_with(&Overrides {
            years: Some(3),
            ..Overrides::default()
        })
        .unwrap();
    let report = ImpactReport::build(
        &scenario.name,
        &params,
        &scenario.rates,
        scenario.crop_focus,
        scenario.region.as_deref(),
    )
    .unwrap();

    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(scenario.report.clone()).with_output_dir(temp_dir.path());
    let path = writer.write(&report).unwrap().expect("reporting enabled");

    let expected = temp_dir.path().join("colombia").join("report_3y.json");
    assert_eq!(path, expected);
    let data = std::fs::read_to_string(expected).unwrap();
    assert!(
        data.contains("\"scenario\": \"colombia\""),
        "report should contain scenario metadata"
    );
    assert!(data.contains("\"Zona Cafetera\""));
}
