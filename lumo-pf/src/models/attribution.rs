//! Attribution ledger records
//!
//! The on-disk contract is a single JSON document with camelCase field
//! names; these types serialize to exactly that shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written with every database rewrite
pub const ATTRIBUTION_DB_VERSION: &str = "1.0.0";

/// Durable record of one completed download
///
/// Created once per successful download; overwritten only if the same
/// photo id is downloaded again (last-write-wins).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    /// Upstream photo identifier (equals the ledger key)
    pub id: String,
    /// Photographer display name
    pub photographer: String,
    /// Photographer profile URL
    pub photographer_url: String,
    /// Source service name
    pub source: String,
    /// Source service URL
    pub source_url: String,
    /// License string
    pub license: String,
    /// ISO-8601 timestamp of the download
    pub download_date: String,
    /// Directory the image was saved into
    pub project_path: String,
    /// File name the image was saved as
    pub project_file: String,
}

/// Persisted ledger state: photo id → attribution, plus a version tag
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttributionDatabase {
    pub attributions: BTreeMap<String, Attribution>,
    pub version: String,
}

impl Default for AttributionDatabase {
    fn default() -> Self {
        Self {
            attributions: BTreeMap::new(),
            version: ATTRIBUTION_DB_VERSION.to_string(),
        }
    }
}
