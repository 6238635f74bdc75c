//! JSON API over the model functions.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    analysis::{self, EcosystemImpact, ImpactTier, Surface},
    ecosystem::{simulate_ecosystem, EcosystemTrajectory},
    error::ModelError,
    params::{CropFocus, SimulationParameters, MAX_BEE_PERCENTAGE, MAX_RESILIENCE, MAX_YEARS},
    regions::{self, RegionExposure},
    response::{biodiversity_response, crop_production_response},
};

pub struct WebServerConfig {
    pub host: String,
    pub port: u16,
}

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/biodiversity", get(biodiversity))
        .route("/api/crop", get(crop))
        .route("/api/simulation", get(simulation))
        .route("/api/regions", get(region_exposure))
        .route("/api/ecosystems", get(ecosystems))
        .route("/api/surface/biodiversity", get(biodiversity_surface))
        .route("/api/surface/crop", get(crop_surface))
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid address {}:{}", config.host, config.port))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "pollinator impact API listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down API");
}

#[derive(Debug)]
pub enum ApiError {
    /// Rejected input, reported as 400.
    Model(ModelError),
    /// The blocking integration task failed to complete.
    Internal(String),
}

impl From<ModelError> for ApiError {
    fn from(value: ModelError) -> Self {
        ApiError::Model(value)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Model(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

fn check_bee(bee: f64) -> Result<(), ModelError> {
    ModelError::check_range("bee", bee, 0.0, MAX_BEE_PERCENTAGE)
}

fn check_resilience(resilience: f64) -> Result<(), ModelError> {
    ModelError::check_range("resilience", resilience, 0.0, MAX_RESILIENCE)
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[derive(Debug, Deserialize)]
pub struct BiodiversityQuery {
    pub bee: f64,
    pub resilience: f64,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub index: f64,
    pub tier: ImpactTier,
    pub description: &'static str,
}

pub async fn biodiversity(
    Query(query): Query<BiodiversityQuery>,
) -> Result<Json<IndexResponse>, ApiError> {
    check_bee(query.bee)?;
    check_resilience(query.resilience)?;
    let index = biodiversity_response(query.bee, query.resilience);
    let tier = ImpactTier::classify(index);
    Ok(Json(IndexResponse {
        index,
        tier,
        description: tier.biodiversity_text(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CropQuery {
    pub bee: f64,
    #[serde(default)]
    pub focus: CropFocus,
}

#[derive(Debug, Serialize)]
pub struct CropResponse {
    pub index: f64,
    pub focus: CropFocus,
    pub focused_index: f64,
    pub tier: ImpactTier,
    pub description: &'static str,
}

pub async fn crop(Query(query): Query<CropQuery>) -> Result<Json<CropResponse>, ApiError> {
    check_bee(query.bee)?;
    let focused_index = analysis::crop_production_for(query.bee, query.focus);
    let tier = ImpactTier::classify(focused_index);
    Ok(Json(CropResponse {
        index: crop_production_response(query.bee),
        focus: query.focus,
        focused_index,
        tier,
        description: tier.crop_text(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SimulationQuery {
    pub bee: f64,
    pub years: u32,
    pub resilience: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub parameters: SimulationParameters,
    pub samples: usize,
    pub trajectory: EcosystemTrajectory,
}

pub async fn simulation(
    Query(query): Query<SimulationQuery>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let parameters = SimulationParameters::new(query.bee, query.resilience, query.years)?;
    let trajectory = tokio::task::spawn_blocking(move || simulate_ecosystem(&parameters))
        .await
        .map_err(|err| ApiError::Internal(format!("simulation task failed: {err}")))??;
    Ok(Json(SimulationResponse {
        parameters,
        samples: trajectory.len(),
        trajectory,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BeeQuery {
    pub bee: f64,
}

pub async fn region_exposure(
    Query(query): Query<BeeQuery>,
) -> Result<Json<Vec<RegionExposure>>, ApiError> {
    check_bee(query.bee)?;
    Ok(Json(regions::exposure_ranking(query.bee)))
}

pub async fn ecosystems(
    Query(query): Query<BiodiversityQuery>,
) -> Result<Json<Vec<EcosystemImpact>>, ApiError> {
    check_bee(query.bee)?;
    check_resilience(query.resilience)?;
    Ok(Json(analysis::ecosystem_breakdown(query.bee, query.resilience)))
}

/// Upper bound on grid points per surface axis.
pub const MAX_SURFACE_POINTS: usize = 200;

fn default_surface_points() -> usize {
    30
}

fn check_points(parameter: &'static str, points: usize) -> Result<(), ModelError> {
    ModelError::check_range(parameter, points as f64, 2.0, MAX_SURFACE_POINTS as f64)
}

#[derive(Debug, Deserialize)]
pub struct BiodiversitySurfaceQuery {
    #[serde(default = "default_surface_points")]
    pub bee_points: usize,
    #[serde(default = "default_surface_points")]
    pub resilience_points: usize,
}

pub async fn biodiversity_surface(
    Query(query): Query<BiodiversitySurfaceQuery>,
) -> Result<Json<Surface>, ApiError> {
    check_points("bee_points", query.bee_points)?;
    check_points("resilience_points", query.resilience_points)?;
    Ok(Json(analysis::biodiversity_surface(
        query.bee_points,
        query.resilience_points,
    )))
}

#[derive(Debug, Deserialize)]
pub struct CropSurfaceQuery {
    pub years: u32,
    #[serde(default = "default_surface_points")]
    pub bee_points: usize,
    #[serde(default = "default_surface_points")]
    pub time_points: usize,
}

pub async fn crop_surface(
    Query(query): Query<CropSurfaceQuery>,
) -> Result<Json<Surface>, ApiError> {
    ModelError::check_range("years", f64::from(query.years), 1.0, f64::from(MAX_YEARS))?;
    check_points("bee_points", query.bee_points)?;
    check_points("time_points", query.time_points)?;
    Ok(Json(analysis::crop_surface(
        query.years,
        query.bee_points,
        query.time_points,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn biodiversity_endpoint_classifies() {
        let Json(body) = biodiversity(Query(BiodiversityQuery {
            bee: 100.0,
            resilience: 1.0,
        }))
        .await
        .unwrap();
        assert!(body.index > 98.0);
        assert_eq!(body.tier, ImpactTier::Minimal);
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request() {
        let err = biodiversity(Query(BiodiversityQuery {
            bee: 150.0,
            resilience: 0.5,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn crop_endpoint_applies_focus() {
        let Json(body) = crop(Query(CropQuery {
            bee: 0.0,
            focus: CropFocus::Cereales,
        }))
        .await
        .unwrap();
        assert_eq!(body.index, 65.0);
        assert!((body.focused_index - 39.0).abs() < 1e-9);
        assert_eq!(body.tier, ImpactTier::Critical);
    }

    #[tokio::test]
    async fn simulation_endpoint_returns_monthly_samples() {
        let Json(body) = simulation(Query(SimulationQuery {
            bee: 50.0,
            years: 3,
            resilience: 0.6,
        }))
        .await
        .unwrap();
        assert_eq!(body.samples, 36);
        assert_eq!(body.trajectory.len(), 36);
    }

    #[tokio::test]
    async fn simulation_rejects_zero_years() {
        let result = simulation(Query(SimulationQuery {
            bee: 50.0,
            years: 0,
            resilience: 0.6,
        }))
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn simulation_rejects_unbounded_horizon() {
        let err = simulation(Query(SimulationQuery {
            bee: 50.0,
            years: u32::MAX,
            resilience: 0.5,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn regions_endpoint_ranks_by_exposure() {
        let Json(body) = region_exposure(Query(BeeQuery { bee: 60.0 }))
            .await
            .unwrap();
        assert_eq!(body.len(), regions::REGIONS.len());
        assert_eq!(body[0].region.name, "Amazonia");
        assert!(body.windows(2).all(|w| w[0].exposure >= w[1].exposure));
        let guajira = body.iter().find(|e| e.region.name == "Guajira").unwrap();
        assert!((guajira.exposure - 0.24).abs() < 1e-12);
    }

    #[tokio::test]
    async fn regions_endpoint_rejects_negative_bees() {
        let err = region_exposure(Query(BeeQuery { bee: -1.0 }))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn surfaces_have_requested_shape() {
        let Json(bio) = biodiversity_surface(Query(BiodiversitySurfaceQuery {
            bee_points: 10,
            resilience_points: 5,
        }))
        .await
        .unwrap();
        assert_eq!(bio.x.len(), 10);
        assert_eq!(bio.z.len(), 5);

        let Json(crops) = crop_surface(Query(CropSurfaceQuery {
            years: 20,
            bee_points: 11,
            time_points: 4,
        }))
        .await
        .unwrap();
        assert_eq!(*crops.y.last().unwrap(), 20.0);
        // bee 0 at the horizon: 65% base times the 0.9 decay floor
        assert!((crops.z[3][0] - 58.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn surfaces_reject_oversized_grids() {
        let err = biodiversity_surface(Query(BiodiversitySurfaceQuery {
            bee_points: MAX_SURFACE_POINTS + 1,
            resilience_points: 5,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = crop_surface(Query(CropSurfaceQuery {
            years: 0,
            bee_points: 10,
            time_points: 10,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ecosystems_endpoint_lists_six_types() {
        let Json(body) = ecosystems(Query(BiodiversityQuery {
            bee: 70.0,
            resilience: 0.6,
        }))
        .await
        .unwrap();
        assert_eq!(body.len(), 6);
    }
}
