use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    ecosystem::EcosystemRates,
    error::ModelError,
    params::{CropFocus, ResilienceSetting, SimulationParameters},
    regions,
};

fn default_bee_percentage() -> f64 {
    100.0
}

fn default_years() -> u32 {
    10
}

fn default_report_dir() -> String {
    "reports".to_string()
}

fn default_report_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_bee_percentage")]
    pub bee_population_percentage: f64,
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default)]
    pub resilience: ResilienceSetting,
    #[serde(default)]
    pub crop_focus: CropFocus,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub rates: EcosystemRates,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
    #[serde(default = "default_report_enabled")]
    pub enabled: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
            enabled: default_report_enabled(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bee_population_percentage: Option<f64>,
    pub years: Option<u32>,
    pub resilience: Option<ResilienceSetting>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::DegenerateInput(
                "scenario must define a name".into(),
            ));
        }
        // The name becomes a report directory.
        if self.name.contains(['/', '\\']) || self.name.contains("..") {
            return Err(ModelError::DegenerateInput(format!(
                "scenario name '{}' must not contain path separators or '..'",
                self.name
            )));
        }
        self.parameters()?;
        self.rates.validate()?;
        if let Some(region) = &self.region {
            if regions::find(region).is_none() {
                return Err(ModelError::DegenerateInput(format!(
                    "unknown region '{region}'"
                )));
            }
        }
        Ok(())
    }

    /// Log filter to install: an explicit request wins over the file.
    pub fn log_level<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.logging.level)
    }

    pub fn parameters(&self) -> Result<SimulationParameters, ModelError> {
        SimulationParameters::new(
            self.bee_population_percentage,
            self.resilience.value(),
            self.years,
        )
    }

    /// Apply overrides and return the validated parameters.
    pub fn parameters_with(&self, overrides: &Overrides) -> Result<SimulationParameters, ModelError> {
        SimulationParameters::new(
            overrides
                .bee_population_percentage
                .unwrap_or(self.bee_population_percentage),
            overrides.resilience.unwrap_or(self.resilience).value(),
            overrides.years.unwrap_or(self.years),
        )
    }
}
