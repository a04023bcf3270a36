//! routemind core
//!
//! Turns photos of shipping labels into an ordered delivery route:
//! text extraction, geocoding, route optimization and presentation.

pub mod traits;
pub mod error;
pub mod model;
pub mod config;
pub mod extract;
pub mod ocr;
#[cfg(feature = "oar")]
pub mod oar;
pub mod ors;
pub mod haversine;
pub mod optimize;
pub mod approximate;
pub mod planner;
pub mod present;
pub mod store;
pub mod auth;
pub mod session;
