//! openrouteservice HTTP adapter for geocoding and route optimization.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{GeocodeError, OptimizeError};
use crate::model::{Coordinate, OptimizationRequest, PlannedStep, StepKind};
use crate::traits::{Geocoder, VehicleRouter};

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub profile: String,
    pub geocode_timeout_secs: u64,
    pub optimize_timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            profile: "driving-car".to_string(),
            geocode_timeout_secs: 10,
            optimize_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        // Per-request timeouts are set on each call; this one only bounds connects.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(config.geocode_timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn profile(&self) -> &str {
        &self.config.profile
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

impl Geocoder for OrsClient {
    fn geocode(&self, text: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let body = self
            .client
            .get(self.url("geocode/search"))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("text", text),
                ("size", "1"),
            ])
            .timeout(Duration::from_secs(self.config.geocode_timeout_secs))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<GeocodeResponse>())?;

        let Some(feature) = body.features.into_iter().next() else {
            return Ok(None);
        };

        match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => {
                debug!("Geocoded '{}' to {}, {}", text, lat, lon);
                Ok(Some(Coordinate::new(*lon, *lat)))
            }
            other => Err(GeocodeError::Malformed(format!(
                "expected [lon, lat], got {} values",
                other.len()
            ))),
        }
    }
}

impl VehicleRouter for OrsClient {
    fn optimize(&self, request: &OptimizationRequest) -> Result<Vec<PlannedStep>, OptimizeError> {
        info!(
            "Sending optimization request: {} jobs, {} vehicles",
            request.jobs.len(),
            request.vehicles.len()
        );

        let response = self
            .client
            .post(self.url("optimization"))
            .header(reqwest::header::AUTHORIZATION, self.config.api_key.as_str())
            .json(request)
            .timeout(Duration::from_secs(self.config.optimize_timeout_secs))
            .send()?;

        info!("Optimization response status: {}", response.status());
        let body = response.error_for_status()?.json::<OptimizationResponse>()?;

        if body.code != 0 {
            return Err(OptimizeError::Service {
                code: body.code,
                message: body.error.unwrap_or_default(),
            });
        }

        let route = body.routes.into_iter().next().ok_or(OptimizeError::NoRoute)?;

        Ok(route
            .steps
            .into_iter()
            .map(|step| PlannedStep {
                kind: step.kind,
                job_id: step.id.or(step.job),
                duration_secs: step.duration,
                distance_m: step.distance,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OptimizationResponse {
    #[serde(default)]
    code: i64,
    error: Option<String>,
    #[serde(default)]
    routes: Vec<OptimizedRoute>,
}

#[derive(Debug, Deserialize)]
struct OptimizedRoute {
    #[serde(default)]
    steps: Vec<OptimizedStep>,
}

#[derive(Debug, Deserialize)]
struct OptimizedStep {
    #[serde(rename = "type")]
    kind: StepKind,
    id: Option<u64>,
    /// Older service versions report the job id here.
    job: Option<u64>,
    duration: Option<f64>,
    distance: Option<f64>,
}
