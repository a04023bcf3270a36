//! Tucson addresses with approximate coordinates for test fixtures.
//!
//! Coordinates are rounded street-level positions; they only need to be
//! plausible relative to each other.

#![allow(dead_code)]

/// A labeled address with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Stop {
    pub address: &'static str,
    pub lon: f64,
    pub lat: f64,
}

impl Stop {
    pub const fn new(address: &'static str, lon: f64, lat: f64) -> Self {
        Self { address, lon, lat }
    }
}

// ============================================================================
// Depots
// ============================================================================

pub const DEPOTS: &[Stop] = &[
    Stop::new("7300 N Silverbell Rd, Tucson, AZ", -111.0563, 32.3452),
    Stop::new("775 W Silverlake Rd, Tucson, AZ", -110.9839, 32.1954),
    Stop::new("3780 E Valencia Rd, Tucson, AZ", -110.9091, 32.1330),
];

// ============================================================================
// Delivery stops
// ============================================================================

pub const DELIVERIES: &[Stop] = &[
    Stop::new("1200 E University Blvd Ste 100, Tucson, AZ", -110.9525, 32.2319),
    Stop::new("2150 N Oracle Rd, Tucson, AZ", -110.9780, 32.2524),
    Stop::new("4500 E Speedway Blvd, Tucson, AZ", -110.8982, 32.2363),
    Stop::new("330 S Toole Ave, Tucson, AZ", -110.9669, 32.2193),
    Stop::new("6400 N Thornydale Rd, Tucson, AZ", -111.0421, 32.3335),
    Stop::new("5870 E Broadway Blvd, Tucson, AZ", -110.8669, 32.2213),
];

pub fn depot() -> &'static str {
    DEPOTS[0].address
}

/// The first `count` delivery addresses as owned strings.
pub fn delivery_addresses(count: usize) -> Vec<String> {
    DELIVERIES.iter().take(count).map(|stop| stop.address.to_string()).collect()
}

pub fn all_stops() -> Vec<Stop> {
    DEPOTS.iter().chain(DELIVERIES).copied().collect()
}
