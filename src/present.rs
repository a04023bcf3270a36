//! Presentation of a planned route: table, totals, overview and map link.
//!
//! Nothing here mutates route steps; it only aggregates and formats.

use std::fmt;

use serde::Serialize;

use crate::model::{Address, GateCode, RouteStep};

pub const NO_GATE_CODE: &str = "No gate code found";

pub const DEFAULT_MAPS_BASE: &str = "https://www.google.com/maps";

/// Case-insensitive exact match of `address` against stored gate codes.
pub fn lookup_gate_code<'a>(codes: &'a [GateCode], address: &str) -> Option<&'a str> {
    let wanted = address.to_lowercase();
    codes
        .iter()
        .find(|row| row.address.to_lowercase() == wanted)
        .map(|row| row.code.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRow {
    pub stop: usize,
    pub address: Address,
    pub distance_km: f64,
    pub time_min: f64,
    pub gate_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub rows: Vec<RouteRow>,
    pub total_distance_km: f64,
    pub total_time_min: f64,
}

impl RouteSummary {
    pub fn build(steps: &[RouteStep], gate_codes: &[GateCode]) -> Self {
        let rows: Vec<RouteRow> = steps
            .iter()
            .enumerate()
            .map(|(i, step)| RouteRow {
                stop: i + 1,
                address: step.address.clone(),
                distance_km: step.distance_km,
                time_min: step.time_min,
                gate_code: lookup_gate_code(gate_codes, &step.address)
                    .unwrap_or(NO_GATE_CODE)
                    .to_string(),
            })
            .collect();

        Self {
            total_distance_km: steps.iter().map(|step| step.distance_km).sum(),
            total_time_min: steps.iter().map(|step| step.time_min).sum(),
            rows,
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|row| row.address.chars().count())
            .max()
            .unwrap_or(0)
            .max("Address".len());

        writeln!(
            f,
            "{:>4}  {:<width$}  {:>13}  {:>10}  Gate Code",
            "Stop", "Address", "Distance (km)", "Time (min)"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>4}  {:<width$}  {:>13.2}  {:>10.2}  {}",
                row.stop, row.address, row.distance_km, row.time_min, row.gate_code
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total Distance: {:.2} km", self.total_distance_km)?;
        write!(f, "Total Time: {:.2} minutes", self.total_time_min)
    }
}

/// Depot plus per-stop leg description.
pub fn route_overview(depot: &str, steps: &[RouteStep]) -> String {
    let mut out = format!("Depot: {depot}\n");
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!(
            "Stop {}: {}\n  - Distance from previous: {:.2} km\n  - Estimated time: {:.2} minutes\n",
            i + 1,
            step.address,
            step.distance_km,
            step.time_min
        ));
    }
    out
}

fn plus_spaces(text: &str) -> String {
    text.replace(' ', "+")
}

/// Directions link from the depot through `route` in order.
///
/// The last stop is the destination; earlier stops become waypoints.
pub fn directions_url(maps_base: &str, depot: &str, route: &[Address]) -> Option<String> {
    let (destination, waypoints) = route.split_last()?;

    let mut url = format!(
        "{}/dir/?api=1&origin={}&destination={}",
        maps_base.trim_end_matches('/'),
        plus_spaces(depot),
        plus_spaces(destination)
    );
    if !waypoints.is_empty() {
        let joined = waypoints
            .iter()
            .map(|stop| plus_spaces(stop))
            .collect::<Vec<_>>()
            .join("|");
        url.push_str("&waypoints=");
        url.push_str(&joined);
    }
    Some(url)
}
