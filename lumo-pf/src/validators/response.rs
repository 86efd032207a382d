//! Per-response-type validators
//!
//! Each upstream response shape gets one validator, composed from the
//! primitive field checks below. Validators are pure functions from a
//! decoded payload to either `Ok(())` or a structured issue naming the
//! offending field.

use crate::models::{Photo, SearchResults, TrackDownload};
use std::fmt;
use url::Url;

/// One failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field (e.g. `results[2].urls.full`)
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationIssue {}

// Primitive field checks

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationIssue> {
    if value.trim().is_empty() {
        return Err(ValidationIssue::new(field, "must be a non-empty string"));
    }
    Ok(())
}

fn require_positive(field: &str, value: u32) -> Result<(), ValidationIssue> {
    if value == 0 {
        return Err(ValidationIssue::new(field, "must be a positive integer"));
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<(), ValidationIssue> {
    match Url::parse(value) {
        Ok(url) if url.has_host() => Ok(()),
        Ok(_) => Err(ValidationIssue::new(field, "must be an absolute URL")),
        Err(e) => Err(ValidationIssue::new(field, format!("invalid URL: {}", e))),
    }
}

/// Validate one photo record
pub fn validate_photo(photo: &Photo) -> Result<(), ValidationIssue> {
    validate_photo_at(photo, "")
}

fn validate_photo_at(photo: &Photo, prefix: &str) -> Result<(), ValidationIssue> {
    let field = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };

    require_non_empty(&field("id"), &photo.id)?;
    require_positive(&field("width"), photo.width)?;
    require_positive(&field("height"), photo.height)?;

    require_url(&field("urls.raw"), &photo.urls.raw)?;
    require_url(&field("urls.full"), &photo.urls.full)?;
    require_url(&field("urls.regular"), &photo.urls.regular)?;
    require_url(&field("urls.small"), &photo.urls.small)?;
    require_url(&field("urls.thumb"), &photo.urls.thumb)?;

    require_url(&field("links.self"), &photo.links.self_link)?;
    require_url(&field("links.html"), &photo.links.html)?;
    require_url(&field("links.download"), &photo.links.download)?;
    require_url(
        &field("links.download_location"),
        &photo.links.download_location,
    )?;

    require_non_empty(&field("user.id"), &photo.user.id)?;
    require_non_empty(&field("user.username"), &photo.user.username)?;

    Ok(())
}

/// Validate one page of search results
///
/// `per_page` is the requested page size; the upstream never returns
/// more results than requested.
pub fn validate_search_results(
    results: &SearchResults,
    per_page: u32,
) -> Result<(), ValidationIssue> {
    if results.results.len() > per_page as usize {
        return Err(ValidationIssue::new(
            "results",
            format!(
                "page has {} entries, more than the {} requested",
                results.results.len(),
                per_page
            ),
        ));
    }

    for (index, photo) in results.results.iter().enumerate() {
        validate_photo_at(photo, &format!("results[{}]", index))?;
    }

    Ok(())
}

/// Validate a download-tracking response
///
/// An absent URL is valid (empty-body responses decode to the default);
/// a present URL must be well-formed.
pub fn validate_track_download(track: &TrackDownload) -> Result<(), ValidationIssue> {
    if let Some(url) = &track.url {
        require_url("url", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhotoLinks, PhotoUrls, PhotoUser};

    fn valid_photo() -> Photo {
        Photo {
            id: "abc123".to_string(),
            width: 4000,
            height: 3000,
            description: Some("a mountain".to_string()),
            alt_description: None,
            urls: PhotoUrls {
                raw: "https://images.unsplash.com/photo-abc?raw".to_string(),
                full: "https://images.unsplash.com/photo-abc?full".to_string(),
                regular: "https://images.unsplash.com/photo-abc?regular".to_string(),
                small: "https://images.unsplash.com/photo-abc?small".to_string(),
                thumb: "https://images.unsplash.com/photo-abc?thumb".to_string(),
            },
            links: PhotoLinks {
                self_link: "https://api.unsplash.com/photos/abc123".to_string(),
                html: "https://unsplash.com/photos/abc123".to_string(),
                download: "https://unsplash.com/photos/abc123/download".to_string(),
                download_location: "https://api.unsplash.com/photos/abc123/download".to_string(),
            },
            user: PhotoUser {
                id: "u1".to_string(),
                username: "jdoe".to_string(),
                name: Some("Jane Doe".to_string()),
                links: None,
            },
        }
    }

    #[test]
    fn accepts_conforming_photo() {
        assert!(validate_photo(&valid_photo()).is_ok());
    }

    #[test]
    fn rejects_empty_id() {
        let mut photo = valid_photo();
        photo.id = "  ".to_string();
        let issue = validate_photo(&photo).unwrap_err();
        assert_eq!(issue.field, "id");
    }

    #[test]
    fn rejects_zero_dimensions() {
        let mut photo = valid_photo();
        photo.height = 0;
        let issue = validate_photo(&photo).unwrap_err();
        assert_eq!(issue.field, "height");
    }

    #[test]
    fn rejects_malformed_url() {
        let mut photo = valid_photo();
        photo.urls.full = "not a url".to_string();
        let issue = validate_photo(&photo).unwrap_err();
        assert_eq!(issue.field, "urls.full");
    }

    #[test]
    fn rejects_relative_url() {
        let mut photo = valid_photo();
        photo.links.html = "file:///tmp/x".to_string();
        let issue = validate_photo(&photo).unwrap_err();
        assert_eq!(issue.field, "links.html");
    }

    #[test]
    fn rejects_missing_username() {
        let mut photo = valid_photo();
        photo.user.username = String::new();
        let issue = validate_photo(&photo).unwrap_err();
        assert_eq!(issue.field, "user.username");
    }

    #[test]
    fn search_results_reject_overlong_page() {
        let results = SearchResults {
            total: 2,
            total_pages: 1,
            results: vec![valid_photo(), valid_photo()],
        };
        let issue = validate_search_results(&results, 1).unwrap_err();
        assert_eq!(issue.field, "results");
    }

    #[test]
    fn search_results_name_offending_entry() {
        let mut bad = valid_photo();
        bad.width = 0;
        let results = SearchResults {
            total: 2,
            total_pages: 1,
            results: vec![valid_photo(), bad],
        };
        let issue = validate_search_results(&results, 10).unwrap_err();
        assert_eq!(issue.field, "results[1].width");
    }

    #[test]
    fn empty_search_page_is_valid() {
        let results = SearchResults {
            total: 0,
            total_pages: 0,
            results: vec![],
        };
        assert!(validate_search_results(&results, 10).is_ok());
    }

    #[test]
    fn track_download_accepts_absent_url() {
        assert!(validate_track_download(&TrackDownload { url: None }).is_ok());
    }

    #[test]
    fn track_download_rejects_bad_url() {
        let track = TrackDownload {
            url: Some("nope".to_string()),
        };
        assert!(validate_track_download(&track).is_err());
    }
}
