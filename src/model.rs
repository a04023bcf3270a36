//! Data model shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// Free-text street address as read from a label.
pub type Address = String;

/// A geographic point. Serialized as `[lon, lat]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// An address that geocoded successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// `loc_<index>` where index is the position in the input address list.
    pub id: String,
    pub name: Address,
    pub coordinate: Coordinate,
}

impl Location {
    pub fn new(index: usize, name: impl Into<Address>, coordinate: Coordinate) -> Self {
        Self {
            id: format!("loc_{index}"),
            name: name.into(),
            coordinate,
        }
    }
}

/// One visit in an optimization request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: u64,
    pub location: [f64; 2],
    pub description: Address,
}

/// The single vehicle of an optimization request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: u64,
    pub profile: String,
    pub start: [f64; 2],
    pub end: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationOptions {
    /// Ask the service for route geometry, which also fills in step distances.
    pub g: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationRequest {
    pub jobs: Vec<Job>,
    pub vehicles: Vec<Vehicle>,
    pub options: OptimizationOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Start,
    Job,
    End,
    #[serde(other)]
    Other,
}

/// A step of the optimized vehicle route, in visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub kind: StepKind,
    /// Job id for `StepKind::Job` steps.
    pub job_id: Option<u64>,
    /// Cumulative travel time in seconds at this step, if reported.
    pub duration_secs: Option<f64>,
    /// Cumulative travel distance in meters at this step, if reported.
    pub distance_m: Option<f64>,
}

/// A stop of the final route with metrics for the leg that reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub address: Address,
    pub distance_km: f64,
    pub time_min: f64,
}

/// Gate code row as stored in the backend table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCode {
    #[serde(rename = "Address")]
    pub address: Address,
    #[serde(rename = "Gate Code")]
    pub code: String,
}

impl GateCode {
    pub fn new(address: impl Into<Address>, code: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            code: code.into(),
        }
    }
}
