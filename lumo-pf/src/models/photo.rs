//! Upstream photo record types
//!
//! These mirror the JSON shapes returned by the Unsplash REST API.
//! Instances are only constructed by deserializing upstream responses;
//! the validators in `crate::validators` check them before the rest of
//! the system trusts them.

use serde::{Deserialize, Serialize};

/// One upstream image record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Photo {
    /// Opaque upstream identifier
    pub id: String,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Human-readable description, often absent
    pub description: Option<String>,
    /// Accessibility alt text, often absent
    pub alt_description: Option<String>,
    /// Named URL variants for the image bytes
    pub urls: PhotoUrls,
    /// Named hyperlink references
    pub links: PhotoLinks,
    /// Owning user record
    pub user: PhotoUser,
}

impl Photo {
    /// Best available human-readable description
    pub fn display_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
    }
}

/// Named URL variants for a photo
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// Named hyperlink references for a photo
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub html: String,
    pub download: String,
    /// Download-tracking endpoint; must be hit before serving the image
    pub download_location: String,
}

/// Photographer record embedded in a photo
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoUser {
    pub id: String,
    /// Account handle, always present
    pub username: String,
    /// Display name, nullable upstream
    pub name: Option<String>,
    pub links: Option<UserLinks>,
}

impl PhotoUser {
    /// Display name falling back to the account handle
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// Public profile URL
    pub fn profile_url(&self) -> String {
        if let Some(links) = &self.links {
            if let Some(html) = &links.html {
                return html.clone();
            }
        }
        format!("https://unsplash.com/@{}", self.username)
    }
}

/// Profile links embedded in a user record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub html: Option<String>,
}

/// One page of search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResults {
    /// Total match count across all pages
    pub total: u64,
    /// Total page count
    pub total_pages: u64,
    /// Ordered photos for this page
    pub results: Vec<Photo>,
}

/// Download-tracking endpoint response
///
/// The endpoint normally returns `{"url": "..."}`; an empty body (204 or
/// zero content-length) is treated as a valid empty result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackDownload {
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> PhotoUser {
        PhotoUser {
            id: "u1".to_string(),
            username: "jdoe".to_string(),
            name: name.map(String::from),
            links: None,
        }
    }

    #[test]
    fn display_name_prefers_name() {
        assert_eq!(user(Some("Jane Doe")).display_name(), "Jane Doe");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(user(None).display_name(), "jdoe");
        assert_eq!(user(Some("   ")).display_name(), "jdoe");
    }

    #[test]
    fn profile_url_built_from_username_when_links_absent() {
        assert_eq!(user(None).profile_url(), "https://unsplash.com/@jdoe");
    }

    #[test]
    fn profile_url_uses_html_link_when_present() {
        let mut u = user(None);
        u.links = Some(UserLinks {
            self_link: None,
            html: Some("https://unsplash.com/@janedoe".to_string()),
        });
        assert_eq!(u.profile_url(), "https://unsplash.com/@janedoe");
    }

    #[test]
    fn photo_deserializes_from_upstream_shape() {
        let json = r#"{
            "id": "abc123",
            "width": 4000,
            "height": 3000,
            "description": null,
            "alt_description": "a mountain at dawn",
            "urls": {
                "raw": "https://images.unsplash.com/photo-abc123?raw",
                "full": "https://images.unsplash.com/photo-abc123?full",
                "regular": "https://images.unsplash.com/photo-abc123?regular",
                "small": "https://images.unsplash.com/photo-abc123?small",
                "thumb": "https://images.unsplash.com/photo-abc123?thumb"
            },
            "links": {
                "self": "https://api.unsplash.com/photos/abc123",
                "html": "https://unsplash.com/photos/abc123",
                "download": "https://unsplash.com/photos/abc123/download",
                "download_location": "https://api.unsplash.com/photos/abc123/download"
            },
            "user": {
                "id": "u1",
                "username": "jdoe",
                "name": "Jane Doe",
                "links": {"self": null, "html": "https://unsplash.com/@jdoe"}
            }
        }"#;

        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.id, "abc123");
        assert_eq!(photo.width, 4000);
        assert_eq!(photo.display_description(), Some("a mountain at dawn"));
        assert_eq!(photo.user.display_name(), "Jane Doe");
    }

    #[test]
    fn track_download_accepts_missing_url() {
        let track: TrackDownload = serde_json::from_str("{}").unwrap();
        assert_eq!(track.url, None);
    }
}
