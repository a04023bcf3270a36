//! Route planning: picks the configured optimizer and attaches leg metrics.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{info, warn};

use crate::approximate::approximate_route;
use crate::haversine::HaversineEstimate;
use crate::model::{Address, Coordinate, Location, RouteStep};
use crate::optimize::{optimize_route, OptimizedRoute, RouteOutcome};
use crate::traits::{Geocoder, VehicleRouter};

/// Which optimizer produces the visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerMode {
    /// Geocode and call the optimization service.
    Service,
    /// Offline lexicographic order with hash-derived pseudo metrics.
    #[default]
    Approximate,
}

impl fmt::Display for OptimizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerMode::Service => f.write_str("service"),
            OptimizerMode::Approximate => f.write_str("approximate"),
        }
    }
}

impl FromStr for OptimizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "service" => Ok(OptimizerMode::Service),
            "approximate" => Ok(OptimizerMode::Approximate),
            other => Err(format!("unknown optimizer '{other}' (expected service or approximate)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub mode: OptimizerMode,
    /// Vehicle profile sent to the optimization service.
    pub profile: String,
    /// Speed used for straight-line leg estimates.
    pub speed_kmh: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            mode: OptimizerMode::default(),
            profile: "driving-car".to_string(),
            speed_kmh: crate::haversine::DEFAULT_SPEED_KMH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutePlan {
    /// Visiting order.
    pub order: Vec<Address>,
    /// One step per stop in `order`.
    pub steps: Vec<RouteStep>,
    pub mode: OptimizerMode,
    /// `None` for the approximate optimizer, which cannot fail.
    pub outcome: Option<RouteOutcome>,
}

impl RoutePlan {
    /// True when metrics are hash-derived rather than geographic.
    pub fn is_approximate(&self) -> bool {
        self.mode == OptimizerMode::Approximate
    }
}

/// Owns the geocoding and routing capabilities for the lifetime of the app.
pub struct RoutePlanner<G, R> {
    geocoder: G,
    router: R,
    options: PlanOptions,
}

impl<G, R> RoutePlanner<G, R>
where
    G: Geocoder,
    R: VehicleRouter,
{
    pub fn new(geocoder: G, router: R, options: PlanOptions) -> Self {
        Self {
            geocoder,
            router,
            options,
        }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    pub fn plan(&self, addresses: &[Address], depot: &str) -> RoutePlan {
        match self.options.mode {
            OptimizerMode::Approximate => {
                info!("Using approximate optimizer for {} addresses", addresses.len());
                let steps = approximate_route(addresses);
                RoutePlan {
                    order: steps.iter().map(|step| step.address.clone()).collect(),
                    steps,
                    mode: OptimizerMode::Approximate,
                    outcome: None,
                }
            }
            OptimizerMode::Service => {
                let route = optimize_route(addresses, &self.geocoder, &self.router, &self.options.profile);
                let steps = self.leg_metrics(&route, depot);
                RoutePlan {
                    order: route.addresses,
                    steps,
                    mode: OptimizerMode::Service,
                    outcome: Some(route.outcome),
                }
            }
        }
    }

    /// Per-leg metrics: service-reported when available, else straight-line.
    fn leg_metrics(&self, route: &OptimizedRoute, depot: &str) -> Vec<RouteStep> {
        if let Some(steps) = service_legs(route) {
            return steps;
        }

        let estimate = HaversineEstimate::new(self.options.speed_kmh);
        let depot_coordinate = if route.addresses.is_empty() {
            None
        } else {
            self.geocode_depot(depot)
        };
        estimated_legs(&route.addresses, &route.locations, depot_coordinate, &estimate)
    }

    fn geocode_depot(&self, depot: &str) -> Option<Coordinate> {
        match self.geocoder.geocode(depot) {
            Ok(found) => found,
            Err(err) => {
                warn!("Geocoding failed for depot {}: {}", depot, err);
                None
            }
        }
    }
}

/// Differences of the cumulative duration/distance the service reported.
fn service_legs(route: &OptimizedRoute) -> Option<Vec<RouteStep>> {
    if !route.outcome.is_optimized() || route.steps.len() != route.addresses.len() {
        return None;
    }

    let mut previous = (0.0, 0.0);
    let mut steps = Vec::with_capacity(route.steps.len());
    for (address, planned) in route.addresses.iter().zip(&route.steps) {
        let distance_m = planned.distance_m?;
        let duration_secs = planned.duration_secs?;
        steps.push(RouteStep {
            address: address.clone(),
            distance_km: ((distance_m - previous.0) / 1000.0).max(0.0),
            time_min: ((duration_secs - previous.1) / 60.0).max(0.0),
        });
        previous = (distance_m, duration_secs);
    }
    Some(steps)
}

/// Straight-line legs from the depot through each stop.
///
/// A leg touching a stop without a coordinate is reported as zero.
pub fn estimated_legs(
    order: &[Address],
    locations: &[Location],
    depot: Option<Coordinate>,
    estimate: &HaversineEstimate,
) -> Vec<RouteStep> {
    let mut previous = depot;
    order
        .iter()
        .map(|address| {
            let here = locations
                .iter()
                .find(|location| location.name == *address)
                .map(|location| location.coordinate);
            let (distance_km, time_min) = match (previous, here) {
                (Some(from), Some(to)) => estimate.leg(from, to),
                _ => (0.0, 0.0),
            };
            previous = here;
            RouteStep {
                address: address.clone(),
                distance_km,
                time_min,
            }
        })
        .collect()
}
