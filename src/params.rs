use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub const MAX_BEE_PERCENTAGE: f64 = 100.0;
pub const MAX_RESILIENCE: f64 = 1.0;
/// Longest horizon accepted. Bounds the trajectory at `MAX_YEARS * 12` samples.
pub const MAX_YEARS: u32 = 500;

/// Inputs shared by the three model functions.
///
/// Plain value type: callers build it from a scenario file, CLI flags or a
/// query string and pass it by value. Nothing in the model keeps a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub bee_population_percentage: f64,
    pub ecosystem_resilience: f64,
    pub years: u32,
}

impl SimulationParameters {
    /// Build and validate in one step.
    pub fn new(
        bee_population_percentage: f64,
        ecosystem_resilience: f64,
        years: u32,
    ) -> Result<Self, ModelError> {
        let params = Self {
            bee_population_percentage,
            ecosystem_resilience,
            years,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        ModelError::check_range(
            "bee_population_percentage",
            self.bee_population_percentage,
            0.0,
            MAX_BEE_PERCENTAGE,
        )?;
        ModelError::check_range(
            "ecosystem_resilience",
            self.ecosystem_resilience,
            0.0,
            MAX_RESILIENCE,
        )?;
        if self.years < 1 {
            return Err(ModelError::DegenerateInput(
                "simulation horizon must be at least one year".into(),
            ));
        }
        ModelError::check_range("years", f64::from(self.years), 1.0, f64::from(MAX_YEARS))?;
        Ok(())
    }

    /// Bee population as a fraction of the baseline.
    pub fn bee_fraction(&self) -> f64 {
        self.bee_population_percentage / MAX_BEE_PERCENTAGE
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            bee_population_percentage: MAX_BEE_PERCENTAGE,
            ecosystem_resilience: ResilienceLevel::default().value(),
            years: 10,
        }
    }
}

/// Named resilience bands offered to users instead of a raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResilienceLevel {
    MuyBaja,
    Baja,
    #[default]
    Media,
    Alta,
    MuyAlta,
}

impl ResilienceLevel {
    pub const ALL: [ResilienceLevel; 5] = [
        ResilienceLevel::MuyBaja,
        ResilienceLevel::Baja,
        ResilienceLevel::Media,
        ResilienceLevel::Alta,
        ResilienceLevel::MuyAlta,
    ];

    pub fn value(self) -> f64 {
        match self {
            ResilienceLevel::MuyBaja => 0.2,
            ResilienceLevel::Baja => 0.4,
            ResilienceLevel::Media => 0.6,
            ResilienceLevel::Alta => 0.8,
            ResilienceLevel::MuyAlta => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResilienceLevel::MuyBaja => "Muy baja",
            ResilienceLevel::Baja => "Baja",
            ResilienceLevel::Media => "Media",
            ResilienceLevel::Alta => "Alta",
            ResilienceLevel::MuyAlta => "Muy alta",
        }
    }
}

/// Resilience as written in a scenario: either a number or a named level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResilienceSetting {
    Value(f64),
    Level(ResilienceLevel),
}

impl ResilienceSetting {
    pub fn value(self) -> f64 {
        match self {
            ResilienceSetting::Value(value) => value,
            ResilienceSetting::Level(level) => level.value(),
        }
    }
}

impl Default for ResilienceSetting {
    fn default() -> Self {
        ResilienceSetting::Level(ResilienceLevel::default())
    }
}

impl FromStr for ResilienceSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<f64>() {
            return Ok(ResilienceSetting::Value(value));
        }
        let normalized = trimmed.to_lowercase().replace([' ', '-'], "_");
        ResilienceLevel::ALL
            .into_iter()
            .find(|level| level.label().to_lowercase().replace(' ', "_") == normalized)
            .map(ResilienceSetting::Level)
            .ok_or_else(|| format!("unknown resilience '{s}'"))
    }
}

/// Crop family a caller wants the production index weighted towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropFocus {
    #[default]
    Todos,
    Cafe,
    Frutales,
    Hortalizas,
    Cereales,
}

impl CropFocus {
    pub const ALL: [CropFocus; 5] = [
        CropFocus::Todos,
        CropFocus::Cafe,
        CropFocus::Frutales,
        CropFocus::Hortalizas,
        CropFocus::Cereales,
    ];

    /// Relative pollinator sensitivity of the crop family.
    pub fn modifier(self) -> f64 {
        match self {
            CropFocus::Todos => 1.0,
            CropFocus::Cafe => 1.2,
            CropFocus::Frutales => 1.15,
            CropFocus::Hortalizas => 0.9,
            CropFocus::Cereales => 0.6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CropFocus::Todos => "todos",
            CropFocus::Cafe => "cafe",
            CropFocus::Frutales => "frutales",
            CropFocus::Hortalizas => "hortalizas",
            CropFocus::Cereales => "cereales",
        }
    }
}

impl fmt::Display for CropFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CropFocus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('é', "e");
        CropFocus::ALL
            .into_iter()
            .find(|focus| focus.as_str() == normalized)
            .ok_or_else(|| format!("unknown crop focus '{s}'"))
    }
}
