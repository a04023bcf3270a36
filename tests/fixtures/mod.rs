//! Test fixtures for routemind.
//!
//! Provides realistic test data and test doubles:
//! - Tucson depots and delivery addresses with approximate coordinates
//! - Table-driven geocoder and scripted router mocks
//! - A tiny HTTP stub server for the real clients

pub mod mocks;
pub mod stub_server;
pub mod tucson_addresses;

pub use mocks::*;
pub use stub_server::*;
pub use tucson_addresses::*;
