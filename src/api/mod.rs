//! Mojira API client and types.
//!
//! This module provides the interface for communicating with the tracker's
//! search endpoint.

mod client;
pub mod error;
pub mod types;

pub use client::{MojiraClient, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use types::{Issue, JqlSearchRequest};
