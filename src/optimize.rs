//! Service-backed route optimization.
//!
//! Addresses are geocoded one by one, turned into jobs for a single vehicle
//! anchored at the first and last geocoded location, and submitted to a
//! [`VehicleRouter`]. Any failure falls back to the input order; addresses are
//! never lost.

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::model::{
    Address, Job, Location, OptimizationOptions, OptimizationRequest, PlannedStep, StepKind,
    Vehicle,
};
use crate::traits::{Geocoder, VehicleRouter};

/// Why optimization did not reorder the input.
#[derive(Debug, Clone, PartialEq)]
pub enum BypassReason {
    /// Fewer than two addresses were supplied.
    TooFewAddresses,
    /// Fewer than two addresses could be geocoded.
    TooFewLocations { geocoded: usize },
    /// The optimization service failed; the message is the logged error.
    ServiceFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Optimized,
    Bypassed(BypassReason),
}

impl RouteOutcome {
    pub fn is_optimized(&self) -> bool {
        matches!(self, RouteOutcome::Optimized)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizedRoute {
    /// Visiting order. Always a subset of the input addresses.
    pub addresses: Vec<Address>,
    /// Every address that geocoded, in input order.
    pub locations: Vec<Location>,
    /// Job steps of the service route, parallel to `addresses` when optimized.
    pub steps: Vec<PlannedStep>,
    pub outcome: RouteOutcome,
}

impl OptimizedRoute {
    fn bypassed(addresses: &[Address], locations: Vec<Location>, reason: BypassReason) -> Self {
        Self {
            addresses: addresses.to_vec(),
            locations,
            steps: Vec::new(),
            outcome: RouteOutcome::Bypassed(reason),
        }
    }
}

/// Geocodes each address in order, skipping the ones that fail.
pub fn geocode_all<G: Geocoder>(addresses: &[Address], geocoder: &G) -> Vec<Location> {
    let mut locations = Vec::with_capacity(addresses.len());

    for (i, address) in addresses.iter().enumerate() {
        info!("Geocoding address {}: {}", i + 1, address);
        match geocoder.geocode(address) {
            Ok(Some(coordinate)) => locations.push(Location::new(i, address.clone(), coordinate)),
            Ok(None) => warn!("No geocode results for: {}", address),
            Err(err) => error!("Geocoding failed for {}: {}", address, err),
        }
    }

    locations
}

/// One job per location (ids from 1) and one vehicle anchored at the first
/// and last location. Expects at least one location.
pub fn build_request(locations: &[Location], profile: &str) -> OptimizationRequest {
    let jobs = locations
        .iter()
        .enumerate()
        .map(|(i, location)| Job {
            id: i as u64 + 1,
            location: location.coordinate.to_lon_lat(),
            description: location.name.clone(),
        })
        .collect();

    let vehicles = match (locations.first(), locations.last()) {
        (Some(start), Some(end)) => vec![Vehicle {
            id: 1,
            profile: profile.to_string(),
            start: start.coordinate.to_lon_lat(),
            end: end.coordinate.to_lon_lat(),
        }],
        _ => Vec::new(),
    };

    OptimizationRequest {
        jobs,
        vehicles,
        options: OptimizationOptions { g: true },
    }
}

/// Optimizes the visiting order of `addresses`.
pub fn optimize_route<G, R>(
    addresses: &[Address],
    geocoder: &G,
    router: &R,
    profile: &str,
) -> OptimizedRoute
where
    G: Geocoder,
    R: VehicleRouter,
{
    if addresses.len() < 2 {
        return OptimizedRoute::bypassed(addresses, Vec::new(), BypassReason::TooFewAddresses);
    }

    info!("Starting optimization for {} addresses", addresses.len());
    let locations = geocode_all(addresses, geocoder);

    if locations.len() < 2 {
        warn!("Not enough successfully geocoded addresses (need at least 2)");
        let geocoded = locations.len();
        return OptimizedRoute::bypassed(
            addresses,
            locations,
            BypassReason::TooFewLocations { geocoded },
        );
    }

    let request = build_request(&locations, profile);
    let planned = match router.optimize(&request) {
        Ok(steps) => steps,
        Err(err) => {
            error!("Optimization failed: {}", err);
            return OptimizedRoute::bypassed(
                addresses,
                locations,
                BypassReason::ServiceFailed(err.to_string()),
            );
        }
    };

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let mut steps = Vec::new();

    for step in planned {
        if step.kind != StepKind::Job {
            continue;
        }
        let Some(job_id) = step.job_id else {
            warn!("Ignoring job step without an id");
            continue;
        };
        let location = usize::try_from(job_id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| locations.get(index));
        let Some(location) = location else {
            warn!("Ignoring unknown job id {}", job_id);
            continue;
        };
        if !seen.insert(job_id) {
            warn!("Ignoring repeated job id {}", job_id);
            continue;
        }
        order.push(location.name.clone());
        steps.push(step);
    }

    if order.is_empty() {
        error!("Optimization returned a route without jobs");
        return OptimizedRoute::bypassed(
            addresses,
            locations,
            BypassReason::ServiceFailed("route contains no jobs".to_string()),
        );
    }

    info!("Optimized route: {:?}", order);

    OptimizedRoute {
        addresses: order,
        locations,
        steps,
        outcome: RouteOutcome::Optimized,
    }
}
