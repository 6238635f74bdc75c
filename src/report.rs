use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{
    analysis::{self, ImpactTier},
    ecosystem::{self, EcosystemRates, EcosystemTrajectory},
    engine::EngineSettings,
    error::ModelError,
    params::{CropFocus, SimulationParameters},
    regions::{self, RegionExposure},
    response::{biodiversity_response, crop_production_response},
    scenario::ReportSettings,
};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("report encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionalView {
    pub name: String,
    pub biodiversity: f64,
}

/// Everything computed for one parameter set.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    pub scenario: String,
    pub generated_at: DateTime<Utc>,
    pub parameters: SimulationParameters,
    pub biodiversity: f64,
    pub biodiversity_tier: ImpactTier,
    pub crop_production: f64,
    pub crop_focus: CropFocus,
    pub crop_production_focused: f64,
    pub crop_tier: ImpactTier,
    pub region: Option<RegionalView>,
    pub regional_exposure: Vec<RegionExposure>,
    pub trajectory: EcosystemTrajectory,
}

impl ImpactReport {
    pub fn build(
        scenario: &str,
        params: &SimulationParameters,
        rates: &EcosystemRates,
        crop_focus: CropFocus,
        region: Option<&str>,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        let bee = params.bee_population_percentage;
        let resilience = params.ecosystem_resilience;
        let biodiversity = biodiversity_response(bee, resilience);
        let crop_production = crop_production_response(bee);
        let crop_production_focused = analysis::crop_production_for(bee, crop_focus);
        let trajectory = ecosystem::simulate_with_rates(params, rates, &EngineSettings::default())?;

        Ok(Self {
            scenario: scenario.to_string(),
            generated_at: Utc::now(),
            parameters: *params,
            biodiversity,
            biodiversity_tier: ImpactTier::classify(biodiversity),
            crop_production,
            crop_focus,
            crop_production_focused,
            crop_tier: ImpactTier::classify(crop_production_focused),
            region: region.map(|name| RegionalView {
                name: name.to_string(),
                biodiversity: analysis::regional_biodiversity(bee, resilience, name),
            }),
            regional_exposure: regions::exposure_ranking(bee),
            trajectory,
        })
    }
}

pub struct ReportWriter {
    settings: ReportSettings,
}

impl ReportWriter {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.settings.output_dir = dir.as_ref().display().to_string();
        self
    }

    /// Write `report` as pretty JSON under `<output_dir>/<scenario>/`.
    ///
    /// Returns `Ok(None)` when reporting is disabled.
    pub fn write(&self, report: &ImpactReport) -> Result<Option<PathBuf>, ReportError> {
        if !self.settings.enabled {
            return Ok(None);
        }

        let dir = Path::new(&self.settings.output_dir).join(&report.scenario);
        fs::create_dir_all(&dir)?;
        let file_path = dir.join(format!("report_{}y.json", report.parameters.years));
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&file_path, json)?;
        info!(path = %file_path.display(), "report written");
        Ok(Some(file_path))
    }
}
