//! Per-session state.
//!
//! One [`Session`] exists per logged-in user. Nothing here is global, so
//! several sessions can share the same injected clients without leaking
//! addresses, routes or gate codes into each other.

use tracing::{info, warn};

use crate::error::{SessionError, StoreError};
use crate::extract::{AddressExtractor, Extraction};
use crate::model::{Address, GateCode, RouteStep};
use crate::planner::{RoutePlan, RoutePlanner};
use crate::present::{directions_url, RouteSummary};
use crate::traits::{Authenticator, GateCodeStore, Geocoder, TextRecognizer, VehicleRouter};

pub const DEFAULT_DEPOTS: &[&str] = &[
    "7300 N Silverbell Rd, Tucson, AZ",
    "775 W Silverlake Rd, Tucson, AZ",
    "3780 E Valencia Rd, Tucson, AZ",
];

#[derive(Debug, Clone)]
pub struct Session {
    depots: Vec<String>,
    pub authenticated: bool,
    pub depot: String,
    pub addresses: Vec<Address>,
    pub optimized_route: Vec<Address>,
    pub route_details: Vec<RouteStep>,
    pub gate_codes: Vec<GateCode>,
}

impl Session {
    /// A logged-out session whose depot defaults to the first in `depots`.
    pub fn new(depots: Vec<String>) -> Self {
        let depots = if depots.is_empty() {
            DEFAULT_DEPOTS.iter().map(|d| d.to_string()).collect()
        } else {
            depots
        };
        let depot = depots[0].clone();
        Self {
            depots,
            authenticated: false,
            depot,
            addresses: Vec::new(),
            optimized_route: Vec::new(),
            route_details: Vec::new(),
            gate_codes: Vec::new(),
        }
    }

    pub fn depots(&self) -> &[String] {
        &self.depots
    }

    pub fn login<A: Authenticator + ?Sized>(&mut self, auth: &A, username: &str, password: &str) -> bool {
        self.authenticated = auth.authenticate(username, password);
        if self.authenticated {
            info!("User '{}' logged in", username);
        }
        self.authenticated
    }

    /// Clears every field together.
    pub fn logout(&mut self) {
        *self = Self::new(std::mem::take(&mut self.depots));
    }

    /// Selects a depot by exact name or by 1-based position.
    pub fn select_depot(&mut self, choice: &str) -> Result<&str, SessionError> {
        let by_name = self.depots.iter().position(|depot| depot == choice);
        let by_number = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|i| *i < self.depots.len());

        let index = by_name
            .or(by_number)
            .ok_or_else(|| SessionError::UnknownDepot(choice.to_string()))?;
        self.depot = self.depots[index].clone();
        Ok(&self.depot)
    }

    /// Extracts addresses from every image.
    ///
    /// Images that yield a sentinel contribute nothing. The stored list is
    /// replaced only when at least one address was found; the found count is
    /// returned either way.
    pub fn ingest_images<R, I, B>(&mut self, extractor: &AddressExtractor<R>, images: I) -> usize
    where
        R: TextRecognizer,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut found = Vec::new();
        for image in images {
            match extractor.extract(image.as_ref()) {
                Extraction::Addresses(addresses) => found.extend(addresses),
                Extraction::EngineUnavailable => warn!("OCR engine not initialized"),
                Extraction::Unreadable => warn!("Skipping unreadable image"),
            }
        }

        let count = found.len();
        if count > 0 {
            info!("Found {} addresses", count);
            self.addresses = found;
        } else {
            warn!("No addresses found in the uploaded images");
        }
        count
    }

    /// Appends manually entered addresses.
    pub fn add_addresses<I: IntoIterator<Item = Address>>(&mut self, addresses: I) {
        self.addresses.extend(
            addresses
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        );
    }

    /// Reloads gate codes; on failure the previous list is kept.
    pub fn refresh_gate_codes<S: GateCodeStore + ?Sized>(&mut self, store: &S) -> Result<usize, StoreError> {
        match store.list_gate_codes() {
            Ok(codes) => {
                self.gate_codes = codes;
                Ok(self.gate_codes.len())
            }
            Err(err) => {
                warn!("Error fetching gate codes: {}", err);
                Err(err)
            }
        }
    }

    pub fn optimize<G, R>(&mut self, planner: &RoutePlanner<G, R>) -> Result<RoutePlan, SessionError>
    where
        G: Geocoder,
        R: VehicleRouter,
    {
        if !self.authenticated {
            return Err(SessionError::NotAuthenticated);
        }

        let plan = planner.plan(&self.addresses, &self.depot);
        self.optimized_route = plan.order.clone();
        self.route_details = plan.steps.clone();
        Ok(plan)
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary::build(&self.route_details, &self.gate_codes)
    }

    pub fn directions_url(&self, maps_base: &str) -> Option<String> {
        directions_url(maps_base, &self.depot, &self.optimized_route)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
