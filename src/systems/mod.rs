mod biodiversity;
mod crops;
mod wild_plants;

pub use biodiversity::BiodiversitySystem;
pub use crops::CropSystem;
pub use wild_plants::WildPlantSystem;

use crate::{
    ecosystem::EcosystemRates,
    engine::{Engine, EngineBuilder, EngineSettings},
};

/// Engine wired with the three decaying variables. The bee population has no
/// system and is held constant.
pub fn standard_engine(rates: &EcosystemRates, settings: EngineSettings) -> Engine {
    EngineBuilder::new(settings)
        .with_system(BiodiversitySystem::new(
            rates.biodiversity_decay,
            rates.recovery,
        ))
        .with_system(CropSystem::new(rates.crop_decay))
        .with_system(WildPlantSystem::new(rates.wild_plant_decay))
        .build()
}
