//! Derived views over the response functions: qualitative tiers, crop and
//! regional adjustments, per-ecosystem breakdowns and parameter sweeps.
//!
//! Nothing here feeds back into the model core. Every value is obtained by
//! calling [`biodiversity_response`] or [`crop_production_response`].

use serde::Serialize;

use crate::{
    params::CropFocus,
    regions,
    response::{biodiversity_response, crop_production_response},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTier {
    Critical,
    Severe,
    Moderate,
    Mild,
    Minimal,
}

impl ImpactTier {
    pub fn classify(index: f64) -> Self {
        if index >= 90.0 {
            ImpactTier::Minimal
        } else if index >= 75.0 {
            ImpactTier::Mild
        } else if index >= 60.0 {
            ImpactTier::Moderate
        } else if index >= 40.0 {
            ImpactTier::Severe
        } else {
            ImpactTier::Critical
        }
    }

    pub fn biodiversity_text(self) -> &'static str {
        match self {
            ImpactTier::Minimal => {
                "Mínimo impacto en la biodiversidad. Los ecosistemas mantienen su funcionalidad."
            }
            ImpactTier::Mild => "Impacto leve. Algunas especies sensibles pueden verse afectadas.",
            ImpactTier::Moderate => {
                "Impacto moderado. Reducción notable en la diversidad de plantas con flores."
            }
            ImpactTier::Severe => {
                "Impacto severo. Múltiples especies en riesgo de extinción local."
            }
            ImpactTier::Critical => {
                "Impacto crítico. Colapso potencial de ecosistemas y pérdida masiva de biodiversidad."
            }
        }
    }

    pub fn crop_text(self) -> &'static str {
        match self {
            ImpactTier::Minimal => "Producción agrícola óptima. Sin pérdidas significativas.",
            ImpactTier::Mild => {
                "Ligera reducción en rendimientos de cultivos dependientes de polinizadores."
            }
            ImpactTier::Moderate => {
                "Reducción moderada. Algunos cultivos muestran déficit de polinización."
            }
            ImpactTier::Severe => {
                "Reducción severa. Cultivos como almendras, manzanas y fresas en niveles críticos."
            }
            ImpactTier::Critical => {
                "Crisis agrícola. Escasez significativa de alimentos y aumento dramático de precios."
            }
        }
    }
}

/// Crop production index weighted towards one crop family, capped at 100.
pub fn crop_production_for(bee_percentage: f64, focus: CropFocus) -> f64 {
    (crop_production_response(bee_percentage) * focus.modifier()).min(100.0)
}

/// Biodiversity index adjusted for a named region, capped at 100.
pub fn regional_biodiversity(bee_percentage: f64, resilience: f64, region: &str) -> f64 {
    (biodiversity_response(bee_percentage, resilience) * regions::biodiversity_modifier(region))
        .min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemType {
    BosqueTemplado,
    Pradera,
    BosqueTropical,
    ZonaAgricola,
    Humedal,
    EcosistemaUrbano,
}

impl EcosystemType {
    pub const ALL: [EcosystemType; 6] = [
        EcosystemType::BosqueTemplado,
        EcosystemType::Pradera,
        EcosystemType::BosqueTropical,
        EcosystemType::ZonaAgricola,
        EcosystemType::Humedal,
        EcosystemType::EcosistemaUrbano,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EcosystemType::BosqueTemplado => "Bosque templado",
            EcosystemType::Pradera => "Pradera",
            EcosystemType::BosqueTropical => "Bosque tropical",
            EcosystemType::ZonaAgricola => "Zona agrícola",
            EcosystemType::Humedal => "Humedal",
            EcosystemType::EcosistemaUrbano => "Ecosistema urbano",
        }
    }

    pub fn resilience_modifier(self) -> f64 {
        match self {
            EcosystemType::BosqueTemplado => 1.2,
            EcosystemType::Pradera => 0.9,
            EcosystemType::BosqueTropical => 1.1,
            EcosystemType::ZonaAgricola => 0.7,
            EcosystemType::Humedal => 1.3,
            EcosystemType::EcosistemaUrbano => 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EcosystemImpact {
    pub ecosystem: EcosystemType,
    pub label: &'static str,
    pub resilience: f64,
    pub biodiversity: f64,
    pub tier: ImpactTier,
}

/// Biodiversity per ecosystem type, each with its own scaled resilience.
pub fn ecosystem_breakdown(bee_percentage: f64, resilience: f64) -> Vec<EcosystemImpact> {
    EcosystemType::ALL
        .into_iter()
        .map(|ecosystem| {
            let adjusted = (resilience * ecosystem.resilience_modifier()).clamp(0.0, 1.0);
            let biodiversity = biodiversity_response(bee_percentage, adjusted);
            EcosystemImpact {
                ecosystem,
                label: ecosystem.label(),
                resilience: adjusted,
                biodiversity,
                tier: ImpactTier::classify(biodiversity),
            }
        })
        .collect()
}

/// Heuristic long-run loss applied on top of the instantaneous crop index.
///
/// Separate from the ODE dynamics: it only applies below 50% bees and never
/// removes more than half of production.
pub fn crop_time_decay_factor(bee_percentage: f64, time: f64, years: f64) -> f64 {
    if bee_percentage >= 50.0 || years <= 0.0 {
        return 1.0;
    }
    (1.0 - (time / years) * (0.1 * (50.0 - bee_percentage) / 50.0)).max(0.5)
}

/// Row-major grid of values over two axes.
#[derive(Debug, Clone, Serialize)]
pub struct Surface {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// `z[j][i]` is the value at `(x[i], y[j])`.
    pub z: Vec<Vec<f64>>,
}

impl Surface {
    fn sample(x: Vec<f64>, y: Vec<f64>, f: impl Fn(f64, f64) -> f64) -> Self {
        let z = y
            .iter()
            .map(|&yj| x.iter().map(|&xi| f(xi, yj)).collect())
            .collect();
        Self { x, y, z }
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Biodiversity over bee percentage (x) and resilience (y).
pub fn biodiversity_surface(bee_points: usize, resilience_points: usize) -> Surface {
    Surface::sample(
        linspace(10.0, 100.0, bee_points),
        linspace(0.2, 1.0, resilience_points),
        biodiversity_response,
    )
}

/// Crop production over bee percentage (x) and time in years (y), with the
/// long-run decay heuristic applied.
pub fn crop_surface(years: u32, bee_points: usize, time_points: usize) -> Surface {
    let horizon = f64::from(years);
    Surface::sample(
        linspace(0.0, 100.0, bee_points),
        linspace(0.0, horizon, time_points),
        |bee, time| crop_production_response(bee) * crop_time_decay_factor(bee, time, horizon),
    )
}
