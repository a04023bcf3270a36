//! Mock capabilities shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use routemind::error::{GeocodeError, OcrError, OptimizeError, StoreError};
use routemind::model::{Coordinate, GateCode, OptimizationRequest, PlannedStep, StepKind};
use routemind::traits::{GateCodeStore, Geocoder, TextRecognizer, VehicleRouter};

use super::tucson_addresses::all_stops;

/// Geocodes from a fixed table; unknown addresses are "not found".
pub struct TableGeocoder {
    table: HashMap<String, Coordinate>,
    /// Addresses that fail with a transport-style error.
    failing: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl TableGeocoder {
    pub fn tucson() -> Self {
        let table = all_stops()
            .into_iter()
            .map(|stop| (stop.address.to_string(), Coordinate::new(stop.lon, stop.lat)))
            .collect();
        Self {
            table,
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, address: &str, lon: f64, lat: f64) -> Self {
        self.table.insert(address.to_string(), Coordinate::new(lon, lat));
        self
    }

    pub fn failing_on(mut self, address: &str) -> Self {
        self.failing.push(address.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, text: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.failing.iter().any(|a| a == text) {
            return Err(GeocodeError::Malformed("simulated failure".into()));
        }
        Ok(self.table.get(text).copied())
    }
}

/// How a [`ScriptedRouter`] answers.
pub enum Script {
    /// Visit jobs in reverse id order with cumulative metrics.
    Reverse,
    /// Visit jobs in the given id order, no metrics.
    Order(Vec<u64>),
    Fail,
}

/// Router mock that records the last request it was given.
pub struct ScriptedRouter {
    script: Script,
    pub last_request: Mutex<Option<OptimizationRequest>>,
}

impl ScriptedRouter {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            last_request: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<OptimizationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

fn step(kind: StepKind, job_id: Option<u64>, cumulative: Option<(f64, f64)>) -> PlannedStep {
    PlannedStep {
        kind,
        job_id,
        duration_secs: cumulative.map(|c| c.1),
        distance_m: cumulative.map(|c| c.0),
    }
}

impl VehicleRouter for ScriptedRouter {
    fn optimize(&self, request: &OptimizationRequest) -> Result<Vec<PlannedStep>, OptimizeError> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.script {
            Script::Fail => Err(OptimizeError::NoRoute),
            Script::Order(ids) => {
                let mut steps = vec![step(StepKind::Start, None, None)];
                steps.extend(ids.iter().map(|id| step(StepKind::Job, Some(*id), None)));
                steps.push(step(StepKind::End, None, None));
                Ok(steps)
            }
            Script::Reverse => {
                // Each leg is 1 km and 2 minutes.
                let mut steps = vec![step(StepKind::Start, None, Some((0.0, 0.0)))];
                for (leg, job) in request.jobs.iter().rev().enumerate() {
                    let n = (leg + 1) as f64;
                    steps.push(step(StepKind::Job, Some(job.id), Some((n * 1000.0, n * 120.0))));
                }
                steps.push(step(StepKind::End, None, None));
                Ok(steps)
            }
        }
    }
}

/// Recognizer returning the same lines for every image.
pub struct FixedLines(pub Vec<&'static str>);

impl TextRecognizer for FixedLines {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        if image == b"corrupt" {
            return Err(OcrError::Failed {
                status: "exit status: 1".into(),
                stderr: "Error in pixReadMem: Unknown format".into(),
            });
        }
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

/// Gate code store that can be switched into a failing state.
pub struct MemoryStore {
    codes: Vec<GateCode>,
    pub down: Mutex<bool>,
}

impl MemoryStore {
    pub fn new(codes: Vec<GateCode>) -> Self {
        Self {
            codes,
            down: Mutex::new(false),
        }
    }

    pub fn set_down(&self, down: bool) {
        *self.down.lock().unwrap() = down;
    }
}

impl GateCodeStore for MemoryStore {
    fn list_gate_codes(&self) -> Result<Vec<GateCode>, StoreError> {
        if *self.down.lock().unwrap() {
            let err = serde_json::from_str::<Vec<GateCode>>("<html>502</html>").unwrap_err();
            return Err(StoreError::Json(err));
        }
        Ok(self.codes.clone())
    }
}
