//! Static reference data for Colombian regions and the exposure of each one
//! to pollinator decline.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Bajo,
    Medio,
    Alto,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Bajo => "Bajo",
            RiskTier::Medio => "Medio",
            RiskTier::Alto => "Alto",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub risk: RiskTier,
    pub crops: &'static str,
    /// Share of local production that depends on pollinators, in percent.
    pub dependency: u8,
    pub description: &'static str,
}

pub const REGIONS: [Region; 15] = [
    Region {
        name: "Zona Cafetera",
        lat: 5.0122,
        lon: -75.4151,
        risk: RiskTier::Alto,
        crops: "Café, plátano, aguacate",
        dependency: 85,
        description: "Alta dependencia de polinizadores para producción de café de calidad",
    },
    Region {
        name: "Valle del Cauca",
        lat: 3.4516,
        lon: -76.5320,
        risk: RiskTier::Alto,
        crops: "Caña de azúcar, frutas, cacao",
        dependency: 75,
        description: "Importante zona agrícola con cultivos de alto valor dependientes de polinizadores",
    },
    Region {
        name: "Antioquia",
        lat: 6.2476,
        lon: -75.5658,
        risk: RiskTier::Alto,
        crops: "Café, frutas, aguacate, cacao",
        dependency: 80,
        description: "Gran diversidad de cultivos con fuerte dependencia de polinizadores",
    },
    Region {
        name: "Santander",
        lat: 7.1254,
        lon: -73.1198,
        risk: RiskTier::Alto,
        crops: "Cacao, frutas, café",
        dependency: 78,
        description: "Cultivos de cacao altamente dependientes de polinizadores especializados",
    },
    Region {
        name: "Boyacá",
        lat: 5.5395,
        lon: -73.3621,
        risk: RiskTier::Medio,
        crops: "Papa, frutas, hortalizas",
        dependency: 60,
        description: "Mezcla de cultivos con variada dependencia de polinizadores",
    },
    Region {
        name: "Cundinamarca",
        lat: 4.6486,
        lon: -74.0821,
        risk: RiskTier::Medio,
        crops: "Flores, frutas, hortalizas",
        dependency: 65,
        description: "Importante producción de flores para exportación con alta dependencia",
    },
    Region {
        name: "Huila",
        lat: 2.4448,
        lon: -75.7492,
        risk: RiskTier::Medio,
        crops: "Café, frutas, arroz",
        dependency: 70,
        description: "Zona cafetera con dependencia significativa de polinizadores",
    },
    Region {
        name: "Cauca",
        lat: 2.4448,
        lon: -76.6147,
        risk: RiskTier::Alto,
        crops: "Café, caña, frutas",
        dependency: 75,
        description: "Ecosistemas diversos con cultivos altamente dependientes",
    },
    Region {
        name: "Tolima",
        lat: 4.0925,
        lon: -75.1545,
        risk: RiskTier::Medio,
        crops: "Arroz, café, frutas",
        dependency: 65,
        description: "Combinación de cultivos con dependencia variable de polinizadores",
    },
    Region {
        name: "Nariño",
        lat: 1.2136,
        lon: -77.2811,
        risk: RiskTier::Medio,
        crops: "Papa, café, hortalizas",
        dependency: 55,
        description: "Diversidad de cultivos en diferentes pisos térmicos",
    },
    Region {
        name: "Córdoba",
        lat: 8.7536,
        lon: -75.8836,
        risk: RiskTier::Bajo,
        crops: "Maíz, arroz, ganado",
        dependency: 35,
        description: "Predominio de cultivos con menor dependencia de polinizadores",
    },
    Region {
        name: "Magdalena",
        lat: 11.2404,
        lon: -74.1990,
        risk: RiskTier::Medio,
        crops: "Banano, palma, frutas",
        dependency: 60,
        description: "Cultivos de exportación con dependencia moderada",
    },
    Region {
        name: "Amazonia",
        lat: -0.7893,
        lon: -71.8996,
        risk: RiskTier::Alto,
        crops: "Frutales amazónicos, cacao, caucho",
        dependency: 90,
        description: "Alta biodiversidad con fuerte dependencia de polinizadores nativos",
    },
    Region {
        name: "Guajira",
        lat: 11.5444,
        lon: -72.9072,
        risk: RiskTier::Bajo,
        crops: "Arroz, yuca, ovino-caprino",
        dependency: 30,
        description: "Condiciones áridas con cultivos de menor dependencia",
    },
    Region {
        name: "Meta",
        lat: 4.1420,
        lon: -73.6256,
        risk: RiskTier::Medio,
        crops: "Palma, arroz, frutales",
        dependency: 50,
        description: "Cultivos extensivos con dependencia moderada",
    },
];

/// Case-insensitive lookup by region name.
pub fn find(name: &str) -> Option<&'static Region> {
    let wanted = name.trim().to_lowercase();
    REGIONS.iter().find(|r| r.name.to_lowercase() == wanted)
}

/// How much a bee deficit amplifies regional risk. Never below 0.1.
pub fn risk_multiplier(bee_percentage: f64) -> f64 {
    ((100.0 - bee_percentage) / 100.0 * 2.0).max(0.1)
}

impl Region {
    /// Exposure in `[0, 1]` of this region at the given bee population.
    pub fn exposure(&self, bee_percentage: f64) -> f64 {
        (f64::from(self.dependency) / 100.0 * risk_multiplier(bee_percentage)).min(1.0)
    }

    /// Multiplier applied to the national biodiversity index when the region
    /// is selected. Regions outside the table use 1.0.
    pub fn biodiversity_modifier(&self) -> f64 {
        biodiversity_modifier(self.name)
    }
}

pub fn biodiversity_modifier(region: &str) -> f64 {
    match region {
        "Zona Cafetera" => 1.15,
        "Valle del Cauca" => 1.1,
        "Antioquia" => 1.2,
        "Amazonia" => 1.3,
        _ => 1.0,
    }
}

/// A region's full record together with its exposure at one bee level.
#[derive(Debug, Clone, Serialize)]
pub struct RegionExposure {
    #[serde(flatten)]
    pub region: Region,
    pub exposure: f64,
}

/// Every region with its exposure, most exposed first. Ties keep table order.
pub fn exposure_ranking(bee_percentage: f64) -> Vec<RegionExposure> {
    let mut ranking: Vec<RegionExposure> = REGIONS
        .iter()
        .map(|region| RegionExposure {
            region: *region,
            exposure: region.exposure(bee_percentage),
        })
        .collect();
    ranking.sort_by(|a, b| b.exposure.total_cmp(&a.exposure));
    ranking
}
