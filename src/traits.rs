//! Capability traits for the external collaborators of the pipeline.
//!
//! The pipeline only depends on these seams; concrete clients (tesseract,
//! openrouteservice, Supabase) implement them, and tests swap in mocks.

use crate::error::{GeocodeError, OcrError, OptimizeError, StoreError};
use crate::model::{Coordinate, GateCode, OptimizationRequest, PlannedStep};

/// Turns image bytes into paragraph-grouped text lines.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError>;
}

/// Forward geocoding: free text to the best-matching coordinate.
///
/// `Ok(None)` means the service answered but found nothing.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, text: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

/// Vehicle-routing optimization for a single vehicle.
///
/// Returns the steps of the optimized route in visiting order.
pub trait VehicleRouter: Send + Sync {
    fn optimize(&self, request: &OptimizationRequest) -> Result<Vec<PlannedStep>, OptimizeError>;
}

/// Read-only bulk access to stored gate codes.
pub trait GateCodeStore: Send + Sync {
    fn list_gate_codes(&self) -> Result<Vec<GateCode>, StoreError>;
}

/// Credential check for the login step.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, text: &str) -> Result<Option<Coordinate>, GeocodeError> {
        (**self).geocode(text)
    }
}

impl<T: VehicleRouter + ?Sized> VehicleRouter for &T {
    fn optimize(&self, request: &OptimizationRequest) -> Result<Vec<PlannedStep>, OptimizeError> {
        (**self).optimize(request)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image)
    }
}
