//! Service modules for photo fetch and attribution

pub mod attribution_export;
pub mod attribution_ledger;
pub mod unsplash_client;

pub use attribution_export::{
    generate_attribution_html, generate_react_component, save_attribution_html,
    save_react_component,
};
pub use attribution_ledger::{AttributionLedger, ATTRIBUTION_DB_FILENAME};
pub use unsplash_client::{
    resized_url, RateLimitStatus, TrackOutcome, UnsplashClient, UnsplashError,
};
