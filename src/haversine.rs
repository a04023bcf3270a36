//! Straight-line leg estimates for routes the service did not measure.
//!
//! Distance is great-circle; time assumes a constant average speed.

use crate::model::Coordinate;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineEstimate {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimate {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimate {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in kilometers.
    pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lon - from.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in minutes.
    pub fn km_to_minutes(&self, km: f64) -> f64 {
        if self.speed_kmh <= 0.0 {
            return 0.0;
        }
        km / self.speed_kmh * 60.0
    }

    /// Distance (km) and time (min) for one leg.
    pub fn leg(&self, from: Coordinate, to: Coordinate) -> (f64, f64) {
        let km = Self::haversine_km(from, to);
        (km, self.km_to_minutes(km))
    }
}
