//! # API Shared
//!
//! Shared definitions for the Odonto APIs.
//!
//! Contains:
//! - Request/response bodies (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `odonto-run` binary.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
