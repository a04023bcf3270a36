//! Approximate route for environments without the optimization service.
//!
//! This is NOT a routing computation. Stops are ordered lexicographically and
//! each gets a pseudo-distance and pseudo-time derived from a stable hash of
//! its address. The numbers are reproducible across runs and machines but
//! carry no geographic meaning.

use sha2::{Digest, Sha256};

use crate::model::{Address, RouteStep};

/// Pseudo-distance range in km: `[MIN_DISTANCE_KM, MIN_DISTANCE_KM + DISTANCE_SPAN)`.
pub const MIN_DISTANCE_KM: u64 = 5;
pub const DISTANCE_SPAN: u64 = 16;

/// Pseudo-time range in minutes: `[MIN_TIME_MIN, MIN_TIME_MIN + TIME_SPAN)`.
pub const MIN_TIME_MIN: u64 = 10;
pub const TIME_SPAN: u64 = 21;

/// Stable 64-bit hash: the first eight bytes of the SHA-256 digest.
pub fn stable_hash(address: &str) -> u64 {
    let digest = Sha256::digest(address.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Pseudo (distance_km, time_min) for one address.
pub fn pseudo_metrics(address: &str) -> (f64, f64) {
    let hash = stable_hash(address);
    let distance = MIN_DISTANCE_KM + hash % DISTANCE_SPAN;
    let time = MIN_TIME_MIN + hash % TIME_SPAN;
    (distance as f64, time as f64)
}

/// Orders addresses lexicographically and attaches pseudo metrics.
pub fn approximate_route(addresses: &[Address]) -> Vec<RouteStep> {
    let mut ordered = addresses.to_vec();
    ordered.sort();

    ordered
        .into_iter()
        .map(|address| {
            let (distance_km, time_min) = pseudo_metrics(&address);
            RouteStep {
                address,
                distance_km,
                time_min,
            }
        })
        .collect()
}
