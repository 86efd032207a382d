//! Response validation layer
//!
//! Validates decoded upstream payloads before the rest of the system
//! trusts them. A shape mismatch on a 2xx response is a contract
//! violation, not a transient fault, so validation failures are never
//! retried.

pub mod response;

pub use response::{
    validate_photo, validate_search_results, validate_track_download, ValidationIssue,
};
