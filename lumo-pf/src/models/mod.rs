//! Data models for the photo fetch service

pub mod attribution;
pub mod photo;

pub use attribution::{Attribution, AttributionDatabase, ATTRIBUTION_DB_VERSION};
pub use photo::{Photo, PhotoLinks, PhotoUrls, PhotoUser, SearchResults, TrackDownload, UserLinks};
