//! HTTP API handlers for lumo-pf
//!
//! The tool-invocation surface: two callable operations (photo
//! search/download and attribution retrieval) plus health.

pub mod attributions;
pub mod health;
pub mod photos;

pub use attributions::attribution_routes;
pub use health::health_routes;
pub use photos::photo_routes;
