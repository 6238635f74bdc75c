pub mod analysis;
pub mod ecosystem;
pub mod engine;
pub mod error;
pub mod params;
pub mod regions;
pub mod report;
pub mod response;
pub mod scenario;
pub mod systems;
pub mod web;

pub use ecosystem::{simulate_ecosystem, EcosystemTrajectory, TrajectorySample};
pub use error::ModelError;
pub use params::SimulationParameters;
pub use response::{biodiversity_response, crop_production_response};
pub use scenario::{Scenario, ScenarioLoader};
