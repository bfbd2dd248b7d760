//! Explorer network client for the zPass SDK.
//!
//! This crate provides the `NetworkClient` seam the SDK orchestrates against
//! (program resolution, import resolution, transaction fetch and broadcast)
//! together with an HTTP implementation over the explorer REST API.

pub mod client;
pub mod error;

pub use client::{parse_import_ids, HttpNetworkClient, NetworkClient};
pub use error::{ClientError, Result};
